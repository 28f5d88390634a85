//! Error types for Vigil
//!
//! Uses `thiserror` for library errors; the CLI surfaces them through `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Vigil operations
pub type VigilResult<T> = Result<T, VigilError>;

/// Main error type for Vigil operations
#[derive(Error, Debug)]
pub enum VigilError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Target identifier violates the naming contract (must not contain '_')
    #[error("invalid target name '{name}' - target names must not contain '_'")]
    InvalidTarget { name: String },

    /// Remediation was invoked without a confirmed approval
    #[error("remediation for {check_id} on {target} requires a confirmed approval")]
    ApprovalRequired { target: String, check_id: String },

    /// The remediation playbook exited non-zero
    #[error("remediation for {check_id} on {target} failed (exit code {code:?})")]
    RemediationFailed {
        target: String,
        check_id: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The remediation playbook exceeded its time budget
    #[error("remediation for {check_id} on {target} timed out after {secs}s")]
    RemediationTimeout {
        target: String,
        check_id: String,
        secs: u64,
    },
}
