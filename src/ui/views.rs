//! Report views
//!
//! Renders the scorecard banner and the categorized check report. Views are
//! pure string builders: capability flags decide colors and icon sets, so
//! the same functions serve TTYs, pipes and CI logs.

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthStr;

use crate::models::{CheckResult, DbKind, Status};
use crate::report::{group_by_category, Scorecard};
use crate::store::ScanDiagnostic;
use crate::ui::terminal::TerminalCapabilities;
use crate::ui::theme;

pub(crate) fn paint(text: &str, color: Color, supports_color: bool) -> String {
    if supports_color {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

fn status_icon(status: Status, caps: &TerminalCapabilities) -> (&'static str, Color) {
    match (status, caps.supports_unicode) {
        (Status::Pass, true) => (theme::icons::PASS, theme::colors::SECURE),
        (Status::Pass, false) => (theme::icons_ascii::PASS, theme::colors::SECURE),
        (Status::Fail, true) => (theme::icons::FAIL, theme::colors::VULNERABLE),
        (Status::Fail, false) => (theme::icons_ascii::FAIL, theme::colors::VULNERABLE),
        (Status::Unknown, true) => (theme::icons::UNKNOWN, theme::colors::WARNING),
        (Status::Unknown, false) => (theme::icons_ascii::UNKNOWN, theme::colors::WARNING),
    }
}

fn arrow(caps: &TerminalCapabilities) -> &'static str {
    if caps.supports_unicode {
        theme::icons::ARROW
    } else {
        theme::icons_ascii::ARROW
    }
}

/// Scorecard banner for one target.
pub fn render_metrics(target: &str, card: &Scorecard, caps: &TerminalCapabilities) -> String {
    let lines = vec![
        format!("{target} security posture"),
        String::new(),
        format!(
            "Grade {} ({:.1}%)   vulnerabilities {}   integrity {:.1}%",
            card.grade, card.score, card.vuln_count, card.integrity
        ),
    ];

    let color = if card.vuln_count == 0 {
        theme::colors::SECURE
    } else {
        theme::colors::VULNERABLE
    };
    boxed(&lines, color, caps)
}

/// Categorized report: OS checks first, then one section per database
/// engine present in the record set.
pub fn render_report(records: &[CheckResult], caps: &TerminalCapabilities, verbose: u8) -> String {
    let mut out = String::new();

    let sections: [(DbKind, &str, &str, &str); 3] = [
        (
            DbKind::Os,
            "Linux server security",
            theme::icons::SERVER,
            theme::icons_ascii::SERVER,
        ),
        (
            DbKind::MySql,
            "MySQL security",
            theme::icons::DATABASE,
            theme::icons_ascii::DATABASE,
        ),
        (
            DbKind::PostgreSql,
            "PostgreSQL security",
            theme::icons::DATABASE,
            theme::icons_ascii::DATABASE,
        ),
    ];

    for (kind, label, icon, icon_ascii) in sections {
        let subset: Vec<CheckResult> = records
            .iter()
            .filter(|r| r.db_kind == kind)
            .cloned()
            .collect();
        if subset.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }
        let icon = if caps.supports_unicode { icon } else { icon_ascii };
        out.push_str(&format!("{icon} {label}\n"));
        out.push_str(&render_categories(&subset, caps, verbose));
    }

    if out.is_empty() {
        out.push_str("No check results found.\n");
    }

    out
}

fn render_categories(records: &[CheckResult], caps: &TerminalCapabilities, verbose: u8) -> String {
    let mut out = String::new();

    for (category, members) in group_by_category(records) {
        let fail_count = members.iter().filter(|r| !r.status.is_pass()).count();
        let banner = if fail_count > 0 {
            paint(
                &format!("{fail_count} vulnerable"),
                theme::colors::VULNERABLE,
                caps.supports_color,
            )
        } else {
            paint("secure", theme::colors::SECURE, caps.supports_color)
        };
        out.push_str(&format!("\n{category} ({banner})\n"));

        for record in members {
            out.push_str(&render_check(record, caps, verbose));
        }
    }

    out
}

fn render_check(record: &CheckResult, caps: &TerminalCapabilities, verbose: u8) -> String {
    let mut out = String::new();

    let (icon, color) = status_icon(record.status, caps);
    out.push_str(&format!(
        "  {} {} {} ({})\n",
        paint(icon, color, caps.supports_color),
        record.check_id,
        record.title,
        record.importance,
    ));

    let show_details = !record.status.is_pass() || verbose > 0;
    if show_details {
        for line in numbered_lines(record.display_text()) {
            out.push_str(&format!("      {line}\n"));
        }
    }

    if record.status == Status::Fail {
        out.push_str(&format!(
            "      {} {}\n",
            arrow(caps),
            paint(&record.guide, theme::colors::WARNING, caps.supports_color),
        ));
    } else if record.status.is_pass() && record.action_result.as_deref() == Some("SUCCESS") {
        out.push_str(&format!(
            "      {} remediated: {}\n",
            arrow(caps),
            record.guide
        ));
    }

    out
}

/// Per-file scan problems, shown after the report.
pub fn render_diagnostics(diagnostics: &[ScanDiagnostic], caps: &TerminalCapabilities) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let warn = if caps.supports_unicode {
        theme::icons::WARNING
    } else {
        theme::icons_ascii::WARNING
    };
    let mut out = format!(
        "\n{} skipped {} unreadable result file(s):\n",
        paint(warn, theme::colors::WARNING, caps.supports_color),
        diagnostics.len()
    );
    for diag in diagnostics {
        out.push_str(&format!("  {diag}\n"));
    }
    out
}

/// Break the evidence text into numbered sentences when there is more than
/// one, restoring dropped periods.
fn numbered_lines(text: &str) -> Vec<String> {
    let sentences: Vec<&str> = text
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() <= 1 {
        return vec![text.to_string()];
    }

    sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut line = format!("{}. {}", i + 1, s);
            if !line.ends_with('.') {
                line.push('.');
            }
            line
        })
        .collect()
}

/// Frame lines in a border box, padded by display width.
fn boxed(lines: &[String], color: Color, caps: &TerminalCapabilities) -> String {
    let (tl, tr, bl, br, h, v) = if caps.supports_unicode {
        (
            theme::borders::TOP_LEFT,
            theme::borders::TOP_RIGHT,
            theme::borders::BOTTOM_LEFT,
            theme::borders::BOTTOM_RIGHT,
            theme::borders::HORIZONTAL,
            theme::borders::VERTICAL,
        )
    } else {
        (
            theme::borders_ascii::TOP_LEFT,
            theme::borders_ascii::TOP_RIGHT,
            theme::borders_ascii::BOTTOM_LEFT,
            theme::borders_ascii::BOTTOM_RIGHT,
            theme::borders_ascii::HORIZONTAL,
            theme::borders_ascii::VERTICAL,
        )
    };

    let inner = lines.iter().map(|l| l.as_str().width()).max().unwrap_or(0);
    let mut out = String::new();

    let top = format!("{tl}{}{tr}", h.repeat(inner + 2));
    out.push_str(&paint(&top, color, caps.supports_color));
    out.push('\n');

    for line in lines {
        let pad = inner - line.as_str().width();
        let framed = format!("{v} {line}{} {v}", " ".repeat(pad));
        out.push_str(&paint(&framed, color, caps.supports_color));
        out.push('\n');
    }

    let bottom = format!("{bl}{}{br}", h.repeat(inner + 2));
    out.push_str(&paint(&bottom, color, caps.supports_color));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckId, Importance};
    use crate::report::GradeThresholds;
    use std::path::PathBuf;

    fn plain_caps() -> TerminalCapabilities {
        TerminalCapabilities {
            is_tty: false,
            supports_color: false,
            supports_unicode: false,
            is_ci: true,
            width: 80,
        }
    }

    fn record(id: &str, status: Status, kind: DbKind) -> CheckResult {
        CheckResult {
            target: "Rocky9".to_string(),
            check_id: CheckId::new(id),
            category: "Account Management".to_string(),
            title: format!("check {id}"),
            importance: Importance::High,
            status,
            evidence: "telnet service enabled. root login allowed".to_string(),
            guide: "disable the service".to_string(),
            check_date: None,
            db_kind: kind,
            action_result: None,
            action_log: None,
            impact_level: None,
            action_impact: None,
            file_hash: None,
            source_file: PathBuf::from(format!("Rocky9_{id}.json")),
        }
    }

    #[test]
    fn metrics_banner_shows_grade_and_counts() {
        let card = crate::report::score(
            &[record("U-01", Status::Fail, DbKind::Os)],
            &GradeThresholds::default(),
        );
        let rendered = render_metrics("Rocky9", &card, &plain_caps());
        assert!(rendered.contains("Rocky9 security posture"));
        assert!(rendered.contains("Grade F (0.0%)"));
        assert!(rendered.contains("vulnerabilities 1"));
    }

    #[test]
    fn report_sections_by_db_kind() {
        let records = vec![
            record("U-01", Status::Pass, DbKind::Os),
            record("D-01", Status::Fail, DbKind::MySql),
        ];
        let rendered = render_report(&records, &plain_caps(), 0);
        assert!(rendered.contains("Linux server security"));
        assert!(rendered.contains("MySQL security"));
        assert!(!rendered.contains("PostgreSQL security"));
    }

    #[test]
    fn failing_check_shows_guide() {
        let rendered = render_report(&[record("U-01", Status::Fail, DbKind::Os)], &plain_caps(), 0);
        assert!(rendered.contains("[FAIL] U01"));
        assert!(rendered.contains("disable the service"));
        assert!(rendered.contains("1 vulnerable"));
    }

    #[test]
    fn passing_check_hides_details_without_verbose() {
        let rendered = render_report(&[record("U-01", Status::Pass, DbKind::Os)], &plain_caps(), 0);
        assert!(rendered.contains("[OK] U01"));
        assert!(!rendered.contains("telnet service enabled"));

        let verbose = render_report(&[record("U-01", Status::Pass, DbKind::Os)], &plain_caps(), 1);
        assert!(verbose.contains("telnet service enabled"));
    }

    #[test]
    fn empty_report_has_placeholder() {
        let rendered = render_report(&[], &plain_caps(), 0);
        assert_eq!(rendered, "No check results found.\n");
    }

    #[test]
    fn numbered_lines_splits_sentences() {
        let lines = numbered_lines("first issue. second issue");
        assert_eq!(lines, vec!["1. first issue.", "2. second issue."]);

        let single = numbered_lines("only one finding");
        assert_eq!(single, vec!["only one finding"]);
    }

    #[test]
    fn diagnostics_listed_with_warning() {
        let diags = vec![ScanDiagnostic {
            file: PathBuf::from("results/bad.json"),
            reason: "invalid record: EOF".to_string(),
        }];
        let rendered = render_diagnostics(&diags, &plain_caps());
        assert!(rendered.contains("[WARN] skipped 1 unreadable result file(s):"));
        assert!(rendered.contains("results/bad.json"));
    }

    #[test]
    fn boxed_pads_to_longest_line() {
        let rendered = boxed(
            &["ab".to_string(), "a".to_string()],
            theme::colors::SECURE,
            &plain_caps(),
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "+----+");
        assert_eq!(lines[1], "| ab |");
        assert_eq!(lines[2], "| a  |");
        assert_eq!(lines[3], "+----+");
    }
}
