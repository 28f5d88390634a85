//! Vigil - security-compliance results console
//!
//! Vigil ingests the JSON check results written by audit playbooks, merges
//! them into one current record per (target, check) pair, and renders a
//! categorized, scored report. Failing checks can be remediated through an
//! external playbook behind an explicit two-step approval.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod remediate;
pub mod report;
pub mod store;
pub mod ui;
pub mod watcher;

// Re-exports for convenience
pub use config::{Config, ConfigWarning};
pub use error::{VigilError, VigilResult};
pub use models::{CheckId, CheckResult, DbKind, Importance, Status};
pub use remediate::{Approval, ApprovalState, FixOutcome, PlaybookRunner};
pub use report::{dedup, score, Grade, GradeThresholds, Scorecard};
pub use store::{ResultStore, Scan, ScanDiagnostic};
pub use watcher::{watch, WatchEvent, WatchOptions};
