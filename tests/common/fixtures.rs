//! Test fixtures - reusable result-record JSON for tests.

/// A failing high-importance OS check (first audit pass)
pub const FAILING_U01: &str = r#"{
    "check_id": "U-01",
    "category": "Account Management",
    "title": "Restrict remote root login",
    "importance": "high",
    "status": "FAIL",
    "evidence": "PermitRootLogin is set to yes. Password authentication enabled",
    "guide": "Set PermitRootLogin to no in sshd_config and restart sshd.",
    "check_date": "2025-11-01 09:00:00"
}"#;

/// The same check after remediation (newer check_date, PASS)
pub const REMEDIATED_U01: &str = r#"{
    "check_id": "U-01",
    "category": "Account Management",
    "title": "Restrict remote root login",
    "importance": "high",
    "status": "PASS",
    "evidence": "PermitRootLogin is set to no",
    "guide": "Set PermitRootLogin to no in sshd_config and restart sshd.",
    "check_date": "2025-11-02 10:30:00",
    "action_result": "SUCCESS",
    "action_log": "sshd_config updated and sshd restarted"
}"#;

/// A passing medium-importance check
pub const PASSING_U02: &str = r#"{
    "check_id": "U-02",
    "category": "Account Management",
    "title": "Password complexity policy",
    "importance": "medium",
    "status": "PASS",
    "evidence": "pwquality minlen=12 enforced",
    "guide": "Configure pam_pwquality.",
    "check_date": "2025-11-01 09:00:00"
}"#;

/// A failing database check (classified by the D prefix)
pub const FAILING_D01: &str = r#"{
    "check_id": "D-01",
    "category": "Service Management",
    "title": "Database superuser remote access",
    "importance": "high",
    "status": "FAIL",
    "evidence": "root account reachable from any host",
    "guide": "Restrict superuser connections to localhost.",
    "check_date": "2025-11-01 09:05:00"
}"#;

/// A record with a content-hash attestation
pub const ATTESTED_U03: &str = r#"{
    "check_id": "U-03",
    "category": "File and Directory Management",
    "title": "passwd file ownership",
    "importance": "high",
    "status": "PASS",
    "evidence": "/etc/passwd owned by root, mode 644",
    "guide": "chown root:root /etc/passwd",
    "check_date": "2025-11-01 09:10:00",
    "file_hash": "sha256:4f2a1b"
}"#;

/// Build a minimal record body inline
pub fn result_json(check_id: &str, status: &str, check_date: &str) -> String {
    format!(
        r#"{{"check_id": "{check_id}", "status": "{status}", "check_date": "{check_date}"}}"#
    )
}
