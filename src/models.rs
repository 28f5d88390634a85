//! Core data models for Vigil
//!
//! Defines the fundamental data structures used throughout Vigil:
//! - `CheckResult`: one compliance check's outcome for one target
//! - `CheckId`: normalized check identifier with numeric-aware ordering
//! - Supporting enums: `Status`, `Importance`, `DbKind`

use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback category for records that carry none.
pub const DEFAULT_CATEGORY: &str = "Account Management";

/// Fallback guide text for records that carry none.
pub const FALLBACK_GUIDE: &str = "Refer to the security hardening guide.";

/// Fallback evidence text for records that carry none.
pub const FALLBACK_EVIDENCE: &str = "No detailed evidence recorded.";

/// Guide text substituted for passing checks in reports and exports.
pub const PASS_GUIDE: &str = "No action required.";

/// Outcome of a single compliance check
///
/// Anything that is not an explicit PASS or FAIL deserializes to `Unknown`.
/// Unknown never counts as passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Status::from_raw(Some(&raw)))
    }
}

impl Status {
    /// Parse a raw status value; absent and unrecognized values are Unknown.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("PASS") => Status::Pass,
            Some("FAIL") => Status::Fail,
            _ => Status::Unknown,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Status::Pass
    }

    /// Human-facing label used in reports and exports.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pass => "OK",
            Status::Fail => "VULNERABLE",
            Status::Unknown => "UNCHECKED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
            Status::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Importance tier of a check, weighting its score contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    #[default]
    High,
    Medium,
    Low,
}

impl Importance {
    /// Parse a raw importance value.
    ///
    /// Absent values default to High; a present but unrecognized tier folds
    /// into Low so it contributes the minimum weight rather than inflating
    /// the score.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Importance::High,
            Some(s) => match s.trim().to_ascii_lowercase().as_str() {
                "high" | "" => Importance::High,
                "medium" => Importance::Medium,
                _ => Importance::Low,
            },
        }
    }

    /// Score weight: high=5, medium=3, low=1.
    pub fn weight(self) -> u32 {
        match self {
            Importance::High => 5,
            Importance::Medium => 3,
            Importance::Low => 1,
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Importance::High => write!(f, "high"),
            Importance::Medium => write!(f, "medium"),
            Importance::Low => write!(f, "low"),
        }
    }
}

/// Classification of a check: host OS hardening or a database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbKind {
    Os,
    MySql,
    PostgreSql,
}

impl DbKind {
    /// Classify a check from its id prefix and the target name.
    ///
    /// A normalized check id whose alphabetic prefix is `D` marks a database
    /// check; targets whose name contains `mysql_marker` run MySQL, every
    /// other database target runs PostgreSQL. All other ids are OS checks.
    pub fn classify(check_id: &CheckId, target: &str, mysql_marker: &str) -> Self {
        if check_id.prefix().eq_ignore_ascii_case("D") {
            if target.contains(mysql_marker) {
                DbKind::MySql
            } else {
                DbKind::PostgreSql
            }
        } else {
            DbKind::Os
        }
    }

    pub fn is_database(self) -> bool {
        self != DbKind::Os
    }
}

impl std::fmt::Display for DbKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbKind::Os => write!(f, "OS"),
            DbKind::MySql => write!(f, "MySQL"),
            DbKind::PostgreSql => write!(f, "PostgreSQL"),
        }
    }
}

/// Normalized compliance check identifier
///
/// Construction strips the `-` separator so "U-01" and "U01" share one key.
/// Ordering is numeric-aware: the digit run compares as a number, so "U10"
/// sorts after "U2".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CheckId(String);

impl CheckId {
    /// Normalize a raw identifier. Idempotent.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().replace('-', ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading alphabetic portion, e.g. "U" for "U01".
    pub fn prefix(&self) -> &str {
        let end = self
            .0
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// (prefix, digit run, remainder) split used for ordering.
    fn split(&self) -> (&str, &str, &str) {
        let start = self
            .0
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.0.len());
        let digits_len = self.0[start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.0.len() - start);
        (
            &self.0[..start],
            &self.0[start..start + digits_len],
            &self.0[start + digits_len..],
        )
    }
}

/// Compare two digit runs as numbers without parsing (no overflow on
/// pathological inputs): strip leading zeros, then longer run wins, then
/// lexicographic.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for CheckId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ap, ad, ar) = self.split();
        let (bp, bd, br) = other.split();
        ap.cmp(bp)
            .then_with(|| cmp_digit_runs(ad, bd))
            .then_with(|| ar.cmp(br))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CheckId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'de> Deserialize<'de> for CheckId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(CheckId::new(raw))
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One compliance check's outcome for one target at one point in time
///
/// Loaded from a result JSON file and normalized by the store: every record
/// has a non-empty guide and evidence, a classified `db_kind`, and a target
/// derived from the file name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    /// Host/server identifier (text before the first `_` of the file name)
    pub target: String,

    /// Normalized check identifier
    pub check_id: CheckId,

    /// Grouping label, e.g. "Account Management"
    pub category: String,

    /// Human-readable check name
    pub title: String,

    pub importance: Importance,

    pub status: Status,

    /// Free-text justification for the result (never empty after load)
    pub evidence: String,

    /// Remediation instructions (never empty after load)
    pub guide: String,

    /// Check timestamp; None means unparseable/missing and sorts last
    pub check_date: Option<DateTime<Utc>>,

    pub db_kind: DbKind,

    /// Populated only after a remediation attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_log: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,

    /// Result file this record was loaded from
    pub source_file: PathBuf,
}

impl CheckResult {
    /// Natural key: exactly one record per key survives aggregation.
    pub fn key(&self) -> (&str, &CheckId) {
        (&self.target, &self.check_id)
    }

    pub fn weight(&self) -> u32 {
        self.importance.weight()
    }

    /// Text shown for the check outcome. A successful remediation's log takes
    /// precedence over the original evidence.
    pub fn display_text(&self) -> &str {
        if self.action_result.as_deref() == Some("SUCCESS") {
            if let Some(log) = self.action_log.as_deref() {
                if !log.is_empty() {
                    return log;
                }
            }
        }
        &self.evidence
    }
}
