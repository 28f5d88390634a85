//! Result store loader
//!
//! Scans a results directory for per-check JSON records and returns a
//! normalized collection. The scan never fails: a missing directory is "no
//! data" and a malformed file is skipped with a diagnostic, so one bad input
//! can never abort a render.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::models::{
    CheckId, CheckResult, DbKind, Importance, Status, DEFAULT_CATEGORY, FALLBACK_EVIDENCE,
    FALLBACK_GUIDE,
};

/// File suffix for result records
const RESULT_SUFFIX: &str = ".json";

/// Default target-name marker identifying MySQL hosts
pub const DEFAULT_MYSQL_MARKER: &str = "Rocky9";

/// Non-fatal per-file diagnostic surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    pub file: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.reason)
    }
}

/// Result of one directory scan
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub records: Vec<CheckResult>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl Scan {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Distinct targets present in this scan, sorted.
    pub fn targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self.records.iter().map(|r| r.target.clone()).collect();
        targets.sort();
        targets.dedup();
        targets
    }
}

/// On-disk shape of a result record. Everything beyond the id is optional;
/// the loader substitutes documented fallbacks.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "item_id")]
    check_id: Option<CheckId>,
    category: Option<String>,
    title: Option<String>,
    importance: Option<String>,
    status: Option<String>,
    evidence: Option<String>,
    guide: Option<String>,
    check_date: Option<String>,
    action_result: Option<String>,
    action_log: Option<String>,
    impact_level: Option<String>,
    action_impact: Option<String>,
    file_hash: Option<String>,
}

/// Loader over one results directory
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
    mysql_marker: String,
}

impl ResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mysql_marker: DEFAULT_MYSQL_MARKER.to_string(),
        }
    }

    /// Override the target-name marker used to pick the MySQL engine when
    /// classifying database checks.
    pub fn with_mysql_marker(mut self, marker: impl Into<String>) -> Self {
        self.mysql_marker = marker.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the results directory.
    ///
    /// Never raises: a missing directory yields an empty scan, and each
    /// unreadable or malformed file becomes one `ScanDiagnostic`.
    pub fn load(&self) -> Scan {
        let mut scan = Scan::default();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return scan,
        };

        // Sort by file name so enumeration order is stable across platforms.
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| n.ends_with(RESULT_SUFFIX))
                        .unwrap_or(false)
            })
            .collect();
        paths.sort();

        for path in paths {
            match self.load_record(&path) {
                Ok(record) => scan.records.push(record),
                Err(reason) => scan.diagnostics.push(ScanDiagnostic { file: path, reason }),
            }
        }

        scan
    }

    /// Load and normalize a single result file.
    pub fn load_record(&self, path: &Path) -> Result<CheckResult, String> {
        let target = target_from_file_name(path)?;

        let content = fs::read_to_string(path).map_err(|e| format!("read failed: {e}"))?;
        let raw: RawRecord =
            serde_json::from_str(&content).map_err(|e| format!("invalid record: {e}"))?;

        let check_id = raw.check_id.ok_or_else(|| "missing check_id".to_string())?;
        if check_id.as_str().is_empty() {
            return Err("empty check_id".to_string());
        }

        let db_kind = DbKind::classify(&check_id, &target, &self.mysql_marker);
        let status = Status::from_raw(raw.status.as_deref());
        let importance = Importance::from_raw(raw.importance.as_deref());
        let check_date = raw.check_date.as_deref().and_then(parse_check_date);

        Ok(CheckResult {
            target,
            check_id,
            category: non_empty_or(raw.category, DEFAULT_CATEGORY),
            title: raw.title.unwrap_or_default(),
            importance,
            status,
            evidence: non_empty_or(raw.evidence, FALLBACK_EVIDENCE),
            guide: non_empty_or(raw.guide, FALLBACK_GUIDE),
            check_date,
            db_kind,
            action_result: none_if_empty(raw.action_result),
            action_log: none_if_empty(raw.action_log),
            impact_level: none_if_empty(raw.impact_level),
            action_impact: none_if_empty(raw.action_impact),
            file_hash: none_if_empty(raw.file_hash),
            source_file: path.to_path_buf(),
        })
    }
}

/// Derive the target from `<target>_<...>.json`.
///
/// Narrow but documented contract: the target is the text before the first
/// `_`, so target names must never contain the delimiter.
fn target_from_file_name(path: &Path) -> Result<String, String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| "unreadable file name".to_string())?;

    let target = stem.split('_').next().unwrap_or_default();
    if target.is_empty() {
        return Err("file name has no target segment".to_string());
    }
    Ok(target.to_string())
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => fallback.to_string(),
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse a record timestamp. Accepts RFC 3339 plus the plain formats the
/// audit playbooks emit; anything else is "unknown, sorts last".
pub fn parse_check_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}
