//! Aggregation and scoring
//!
//! Pure transforms over a loaded record set: deduplicate to one current
//! record per (target, check_id), then compute the weighted pass-rate score,
//! grade, vulnerability count and integrity index for a target. No state is
//! carried between renders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{CheckId, CheckResult};

/// Category presentation order for reports and exports. Categories not
/// listed here sort after the known ones, alphabetically.
pub const CATEGORY_ORDER: [&str; 5] = [
    "Account Management",
    "File and Directory Management",
    "Service Management",
    "Patch Management",
    "Log Management",
];

/// Grade cutoffs, configurable via `[grades]` in vigil.toml
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    /// Minimum score for an A
    pub a: f64,
    /// Minimum score for a B
    pub b: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self { a: 90.0, b: 80.0 }
    }
}

impl GradeThresholds {
    pub fn grade(&self, score: f64) -> Grade {
        if score >= self.a {
            Grade::A
        } else if score >= self.b {
            Grade::B
        } else {
            Grade::F
        }
    }
}

/// Security posture grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    F,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Aggregate metrics for one target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    /// Weighted pass rate, 0..=100
    pub score: f64,
    pub grade: Grade,
    /// Checks not proven passing (FAIL and UNKNOWN both count)
    pub vuln_count: usize,
    /// Pass rate over hash-attested checks; falls back to `score` when no
    /// record carries an attestation
    pub integrity: f64,
}

/// True when `candidate` should replace `incumbent` for the same key.
///
/// Newest check_date wins; a missing date loses to any parseable one. Equal
/// or both-missing dates break by the lexicographically greatest source file
/// name, so a `*_remediated` rewrite shadows its base file deterministically.
fn supersedes(candidate: &CheckResult, incumbent: &CheckResult) -> bool {
    match (candidate.check_date, incumbent.check_date) {
        (Some(a), Some(b)) if a != b => a > b,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => candidate.source_file.file_name() > incumbent.source_file.file_name(),
    }
}

/// Deduplicate to one current record per (target, check_id).
///
/// Output is sorted by target, then by check id using numeric-aware
/// comparison ("U10" after "U2", never between "U1" and "U2").
pub fn dedup(records: Vec<CheckResult>) -> Vec<CheckResult> {
    let mut current: HashMap<(String, CheckId), CheckResult> = HashMap::new();

    for record in records {
        let key = (record.target.clone(), record.check_id.clone());
        let replace = match current.get(&key) {
            Some(incumbent) => supersedes(&record, incumbent),
            None => true,
        };
        if replace {
            current.insert(key, record);
        }
    }

    let mut deduped: Vec<CheckResult> = current.into_values().collect();
    deduped.sort_by(|a, b| {
        a.target
            .cmp(&b.target)
            .then_with(|| a.check_id.cmp(&b.check_id))
    });
    deduped
}

/// Keep only the records for one target, preserving order.
pub fn filter_target(records: &[CheckResult], target: &str) -> Vec<CheckResult> {
    records
        .iter()
        .filter(|r| r.target == target)
        .cloned()
        .collect()
}

/// Compute the scorecard for one target's records.
///
/// Pure and idempotent; an empty input scores 0 with no panic.
pub fn score(records: &[CheckResult], thresholds: &GradeThresholds) -> Scorecard {
    let total_weight: u64 = records.iter().map(|r| u64::from(r.weight())).sum();
    let pass_weight: u64 = records
        .iter()
        .filter(|r| r.status.is_pass())
        .map(|r| u64::from(r.weight()))
        .sum();

    let score = if total_weight > 0 {
        pass_weight as f64 / total_weight as f64 * 100.0
    } else {
        0.0
    };

    let vuln_count = records.iter().filter(|r| !r.status.is_pass()).count();

    let attested: Vec<&CheckResult> = records.iter().filter(|r| r.file_hash.is_some()).collect();
    let integrity = if attested.is_empty() {
        score
    } else {
        let attested_pass = attested.iter().filter(|r| r.status.is_pass()).count();
        attested_pass as f64 / attested.len() as f64 * 100.0
    };

    Scorecard {
        score,
        grade: thresholds.grade(score),
        vuln_count,
        integrity,
    }
}

/// Rank used to order categories in reports: known categories first in the
/// documented order, everything else after, alphabetically.
fn category_rank(category: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or(CATEGORY_ORDER.len())
}

/// Group records by category in presentation order. Records keep their
/// relative (check-id) order within each group.
pub fn group_by_category<'a>(records: &'a [CheckResult]) -> Vec<(&'a str, Vec<&'a CheckResult>)> {
    let mut groups: Vec<(&str, Vec<&CheckResult>)> = Vec::new();

    for record in records {
        match groups.iter_mut().find(|(cat, _)| *cat == record.category) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.category.as_str(), vec![record])),
        }
    }

    groups.sort_by(|(a, _), (b, _)| category_rank(a).cmp(&category_rank(b)).then(a.cmp(b)));
    groups
}
