//! Results-directory watcher for continuous reporting
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms)
//! - Content-hash change filtering (ignores no-op rewrites)
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod run;

pub use event::{WatchEvent, WatchOptions, DEBOUNCE_MS};
pub use run::watch;
