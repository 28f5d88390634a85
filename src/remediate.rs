//! Remediation trigger
//!
//! Wraps the external playbook runner behind a typed interface. The
//! collaborator is opaque: it is invoked with the target, the normalized
//! check id and an action mode, and either rewrites the result file itself
//! or leaves it to the follow-up audit pass. Either way the store is
//! re-read afterwards so the caller sees the post-state.
//!
//! Every invocation is gated by an explicit per-check `Approval` and runs
//! under a uniform time budget; a timeout kills the child and is reported
//! as its own failure, never a hang. No automatic retry.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::config::RemediationConfig;
use crate::error::{VigilError, VigilResult};
use crate::models::{CheckId, CheckResult, Status};
use crate::report;
use crate::store::ResultStore;

/// Poll interval while waiting on the collaborator
const WAIT_TICK: Duration = Duration::from_millis(100);

/// State of a two-step remediation confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalState {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Per-check confirmation object
///
/// Replaces the original dashboard's session-keyed booleans: the approval is
/// created when the operator starts the remediation process and must be
/// explicitly confirmed before any external process is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    target: String,
    check_id: CheckId,
    state: ApprovalState,
}

impl Approval {
    /// Open a pending approval. Validates the target naming contract.
    pub fn request(target: impl Into<String>, check_id: CheckId) -> VigilResult<Self> {
        let target = target.into();
        if target.is_empty() || target.contains('_') {
            return Err(VigilError::InvalidTarget { name: target });
        }
        Ok(Self {
            target,
            check_id,
            state: ApprovalState::Pending,
        })
    }

    pub fn confirm(&mut self) {
        self.state = ApprovalState::Confirmed;
    }

    pub fn cancel(&mut self) {
        self.state = ApprovalState::Cancelled;
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == ApprovalState::Confirmed
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn check_id(&self) -> &CheckId {
        &self.check_id
    }
}

/// Result of one remediation attempt, observed through the result store
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Status of the record before the playbooks ran
    pub status_before: Option<Status>,
    /// Current record after re-reading the store
    pub record: Option<CheckResult>,
    /// Whether the result file's content changed (the collaborator may also
    /// report through its exit code only)
    pub record_rewritten: bool,
}

impl FixOutcome {
    pub fn status_after(&self) -> Option<Status> {
        self.record.as_ref().map(|r| r.status)
    }

    pub fn resolved(&self) -> bool {
        self.status_after() == Some(Status::Pass)
    }
}

/// Synchronous playbook invoker with a bounded time budget
pub struct PlaybookRunner {
    config: RemediationConfig,
    store: ResultStore,
}

impl PlaybookRunner {
    pub fn new(config: RemediationConfig, store: ResultStore) -> Self {
        Self { config, store }
    }

    /// Run the fix playbook for one approved check, re-audit it, then
    /// re-read the result store and report the post-state.
    pub fn fix(&self, approval: &Approval) -> VigilResult<FixOutcome> {
        if !approval.is_confirmed() {
            return Err(VigilError::ApprovalRequired {
                target: approval.target.clone(),
                check_id: approval.check_id.to_string(),
            });
        }

        let before = self.current_record(&approval.target, &approval.check_id);
        let status_before = before.as_ref().map(|r| r.status);
        let hash_before = before.as_ref().and_then(|r| hash_file(&r.source_file));

        let id_arg = format!("target_id={}", approval.check_id);
        self.run_playbook(
            &self.config.fix_playbook,
            &["-e", &id_arg, "--limit", &approval.target],
            &approval.target,
            approval.check_id.as_str(),
        )?;

        // Re-audit the same check so the result file reflects the fix even
        // when the collaborator only reports through its exit code.
        self.run_playbook(
            &self.config.audit_playbook,
            &["-e", &id_arg, "--limit", &approval.target],
            &approval.target,
            approval.check_id.as_str(),
        )?;

        let record = self.current_record(&approval.target, &approval.check_id);
        let hash_after = record.as_ref().and_then(|r| hash_file(&r.source_file));
        let record_rewritten = match (&hash_before, &hash_after) {
            (None, None) => false,
            (before, after) => before != after,
        };

        Ok(FixOutcome {
            status_before,
            record,
            record_rewritten,
        })
    }

    /// Run the audit playbook for one target, or for the whole fleet.
    pub fn audit(&self, target: Option<&str>) -> VigilResult<()> {
        if let Some(target) = target {
            if target.is_empty() || target.contains('_') {
                return Err(VigilError::InvalidTarget {
                    name: target.to_string(),
                });
            }
            self.run_playbook(
                &self.config.audit_playbook,
                &["--limit", target],
                target,
                "audit",
            )
        } else {
            self.run_playbook(&self.config.audit_playbook, &[], "all", "audit")
        }
    }

    /// Current aggregated record for one (target, check_id) key.
    pub fn current_record(&self, target: &str, check_id: &CheckId) -> Option<CheckResult> {
        let scan = self.store.load();
        report::dedup(scan.records)
            .into_iter()
            .find(|r| r.target == target && &r.check_id == check_id)
    }

    fn run_playbook(
        &self,
        playbook: &Path,
        extra_args: &[&str],
        target: &str,
        check_id: &str,
    ) -> VigilResult<()> {
        let mut child = Command::new(&self.config.command)
            .arg("-i")
            .arg(&self.config.inventory)
            .arg(playbook)
            .args(extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    child.kill()?;
                    child.wait()?;
                    return Err(VigilError::RemediationTimeout {
                        target: target.to_string(),
                        check_id: check_id.to_string(),
                        secs: self.config.timeout_secs,
                    });
                }
                None => thread::sleep(WAIT_TICK),
            }
        };

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            return Err(VigilError::RemediationFailed {
                target: target.to_string(),
                check_id: check_id.to_string(),
                code: status.code(),
                stderr: tail(&stderr, 20),
            });
        }

        Ok(())
    }
}

/// Last `lines` lines of a captured stream.
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// sha256 content hash of a file (`sha256:<hex>`).
fn hash_file(path: &Path) -> Option<String> {
    let content = std::fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Some(format!("sha256:{:x}", hasher.finalize()))
}
