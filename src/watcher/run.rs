//! Watch loop

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};

use crate::error::VigilResult;
use crate::report;
use crate::store::ResultStore;

use super::event::{WatchEvent, WatchOptions, WatcherState};

/// Start watching the results directory for rewritten records.
///
/// Each settled change batch triggers one full scan and aggregation pass;
/// nothing is cached between renders.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> VigilResult<()> {
    let store = ResultStore::new(options.results_dir.clone())
        .with_mysql_marker(options.mysql_marker.clone());

    if !options.results_dir.is_dir() {
        event_callback(WatchEvent::Error {
            message: format!(
                "results directory {} does not exist",
                options.results_dir.display()
            ),
        });
        return Ok(());
    }

    event_callback(WatchEvent::Started {
        dir: options.results_dir.display().to_string(),
    });

    // Initial render; also seeds the content-hash tracker.
    let mut content_hashes: HashMap<PathBuf, String> = HashMap::new();
    rescan(&store, &options, &mut content_hashes, &event_callback);

    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        NotifyConfig::default(),
    )
    .map_err(|e| std::io::Error::other(e.to_string()))?;

    watcher
        .watch(&options.results_dir, RecursiveMode::NonRecursive)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // Startup cooldown: drain any initial events from notify (it sometimes
    // sends events for existing files when the watcher is first registered)
    let cooldown_end = Instant::now() + Duration::from_millis(500);
    while Instant::now() < cooldown_end {
        let _ = rx.recv_timeout(Duration::from_millis(50));
    }

    let mut state = WatcherState::new();

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                // Filter out no-op rewrites: only content changes count.
                match std::fs::read(&path) {
                    Ok(content) => {
                        let new_hash = content_hash(&content);
                        if content_hashes.get(&path) != Some(&new_hash) {
                            content_hashes.insert(path.clone(), new_hash);
                            state.add_change(path);
                        }
                    }
                    // Deleted or mid-replace; the rescan will sort it out.
                    Err(_) => {
                        content_hashes.remove(&path);
                        state.add_change(path);
                    }
                }
            }
        }

        if state.should_rescan() {
            for path in state.take_changes() {
                event_callback(WatchEvent::FileChanged {
                    path: path.display().to_string(),
                });
            }
            rescan(&store, &options, &mut content_hashes, &event_callback);
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

fn rescan(
    store: &ResultStore,
    options: &WatchOptions,
    content_hashes: &mut HashMap<PathBuf, String>,
    event_callback: &impl Fn(WatchEvent),
) {
    let scan = store.load();

    for record in &scan.records {
        if let Ok(content) = std::fs::read(&record.source_file) {
            content_hashes.insert(record.source_file.clone(), content_hash(&content));
        }
    }

    let mut records = report::dedup(scan.records);
    if let Some(target) = &options.target {
        records.retain(|r| &r.target == target);
    }

    event_callback(WatchEvent::Rescanned {
        records,
        diagnostics: scan.diagnostics,
    });
}

fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
