//! Watch event types and options

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde_json::json;

use crate::models::CheckResult;
use crate::store::ScanDiagnostic;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Results directory to watch
    pub results_dir: PathBuf,
    /// Only re-render this target (None = all targets)
    pub target: Option<String>,
    /// Target-name marker for MySQL classification
    pub mysql_marker: String,
}

/// Watch event stream
///
/// `Rescanned` carries the freshly aggregated records so the caller renders
/// without a second directory scan; its NDJSON form reports counts only.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Started {
        dir: String,
    },
    FileChanged {
        path: String,
    },
    Rescanned {
        records: Vec<CheckResult>,
        diagnostics: Vec<ScanDiagnostic>,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        let value = match self {
            WatchEvent::Started { dir } => json!({"event": "started", "dir": dir}),
            WatchEvent::FileChanged { path } => json!({"event": "file_changed", "path": path}),
            WatchEvent::Rescanned {
                records,
                diagnostics,
            } => json!({
                "event": "rescanned",
                "records": records.len(),
                "skipped": diagnostics.len(),
            }),
            WatchEvent::Error { message } => json!({"event": "error", "message": message}),
            WatchEvent::Shutdown => json!({"event": "shutdown"}),
        };
        value.to_string()
    }
}

/// Watcher state for debouncing
pub(crate) struct WatcherState {
    pub(crate) pending_changes: HashSet<PathBuf>,
    pub(crate) last_change: Option<Instant>,
}

impl WatcherState {
    pub(crate) fn new() -> Self {
        Self {
            pending_changes: HashSet::new(),
            last_change: None,
        }
    }

    pub(crate) fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_rescan(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
        } else {
            false
        }
    }

    pub(crate) fn take_changes(&mut self) -> Vec<PathBuf> {
        let mut changes: Vec<_> = self.pending_changes.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }
}
