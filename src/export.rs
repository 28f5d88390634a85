//! Tabular report export
//!
//! Writes the aggregated table as a CSV spreadsheet: a fixed header block
//! (total count, pass rate, FAIL count, generation timestamp) followed by
//! one row per check, grouped by category. The file lands atomically via
//! write-to-temp-then-rename so a concurrent reader never sees a torn file.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::VigilResult;
use crate::models::{CheckResult, Status, PASS_GUIDE};
use crate::report::group_by_category;

/// Column header for the data table
const COLUMNS: &str = "Category,Check ID,Title,Importance,Status,Evidence,Guide";

/// Render the CSV report for one target's aggregated records.
pub fn render_csv(records: &[CheckResult], generated_at: DateTime<Utc>) -> String {
    let total = records.len();
    let fail = records
        .iter()
        .filter(|r| r.status == Status::Fail)
        .count();
    let pass_rate = if total > 0 {
        (total - fail) as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let mut out = String::new();
    out.push_str("Server Security Audit Report\n");
    out.push_str(&format!("Total checks,{total}\n"));
    out.push_str(&format!("Pass rate,{pass_rate:.1} %\n"));
    out.push_str(&format!("Vulnerable (FAIL),{fail}\n"));
    out.push_str(&format!(
        "Generated,{}\n",
        generated_at.format("%Y-%m-%d %H:%M")
    ));
    out.push('\n');
    out.push_str(COLUMNS);
    out.push('\n');

    for (category, members) in group_by_category(records) {
        for record in members {
            let guide = if record.status.is_pass() {
                PASS_GUIDE
            } else {
                record.guide.as_str()
            };
            let importance = record.importance.to_string();
            let row: [&str; 7] = [
                category,
                record.check_id.as_str(),
                record.title.as_str(),
                importance.as_str(),
                record.status.label(),
                record.evidence.as_str(),
                guide,
            ];
            let row = row.map(csv_field).join(",");
            out.push_str(&row);
            out.push('\n');
        }
    }

    out
}

/// Write the CSV report atomically.
pub fn write_report(
    path: &Path,
    records: &[CheckResult],
    generated_at: DateTime<Utc>,
) -> VigilResult<()> {
    let content = render_csv(records, generated_at);

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
