//! Property tests for deduplication and scoring.

use std::collections::HashSet;
use std::path::PathBuf;

use proptest::prelude::*;

use vigil::models::{CheckId, CheckResult, DbKind, Importance, Status};
use vigil::report::{dedup, score, GradeThresholds};
use vigil::store::parse_check_date;

fn make_record(
    target: &str,
    id: u8,
    status: Status,
    importance: Importance,
    date: Option<String>,
    file: String,
) -> CheckResult {
    let check_id = CheckId::new(format!("U-{id}"));
    CheckResult {
        target: target.to_string(),
        check_id,
        category: "Account Management".to_string(),
        title: format!("check {id}"),
        importance,
        status,
        evidence: "evidence".to_string(),
        guide: "guide".to_string(),
        check_date: date.as_deref().and_then(parse_check_date),
        db_kind: DbKind::Os,
        action_result: None,
        action_log: None,
        impact_level: None,
        action_impact: None,
        file_hash: None,
        source_file: PathBuf::from(file),
    }
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Pass),
        Just(Status::Fail),
        Just(Status::Unknown),
    ]
}

fn importance_strategy() -> impl Strategy<Value = Importance> {
    prop_oneof![
        Just(Importance::High),
        Just(Importance::Medium),
        Just(Importance::Low),
    ]
}

fn record_strategy() -> impl Strategy<Value = CheckResult> {
    (
        prop_oneof![Just("Rocky9"), Just("Rocky10")],
        0u8..12,
        status_strategy(),
        importance_strategy(),
        proptest::option::of(1u8..28),
        "[a-z]{1,8}",
    )
        .prop_map(|(target, id, status, importance, day, file)| {
            let date = day.map(|d| format!("2025-11-{d:02} 09:00:00"));
            make_record(target, id, status, importance, date, format!("{file}.json"))
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: after deduplication no two records share (target, check_id).
    #[test]
    fn property_dedup_unique_keys(records in proptest::collection::vec(record_strategy(), 0..32)) {
        let deduped = dedup(records);
        let keys: HashSet<(String, String)> = deduped
            .iter()
            .map(|r| (r.target.clone(), r.check_id.to_string()))
            .collect();
        prop_assert_eq!(keys.len(), deduped.len());
    }

    /// PROPERTY: deduplication is deterministic for a fixed input order.
    #[test]
    fn property_dedup_deterministic(records in proptest::collection::vec(record_strategy(), 0..16)) {
        let first = dedup(records.clone());
        let second = dedup(records);
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: with the same key and distinct parseable dates, the later
    /// record survives.
    #[test]
    fn property_newest_wins(day_a in 1u8..14, day_b in 15u8..28, flip in any::<bool>()) {
        let older = make_record(
            "Rocky9", 1, Status::Fail, Importance::High,
            Some(format!("2025-11-{day_a:02} 09:00:00")), "a.json".to_string(),
        );
        let newer = make_record(
            "Rocky9", 1, Status::Pass, Importance::High,
            Some(format!("2025-11-{day_b:02} 09:00:00")), "b.json".to_string(),
        );

        let input = if flip { vec![older, newer] } else { vec![newer, older] };
        let deduped = dedup(input);
        prop_assert_eq!(deduped.len(), 1);
        prop_assert_eq!(deduped[0].status, Status::Pass);
    }

    /// PROPERTY: score stays within 0..=100 and counts every non-pass as a
    /// vulnerability.
    #[test]
    fn property_score_bounds(records in proptest::collection::vec(record_strategy(), 0..24)) {
        let card = score(&records, &GradeThresholds::default());
        prop_assert!((0.0..=100.0).contains(&card.score));
        prop_assert!((0.0..=100.0).contains(&card.integrity));
        let expected_vulns = records.iter().filter(|r| !r.status.is_pass()).count();
        prop_assert_eq!(card.vuln_count, expected_vulns);
    }

    /// PROPERTY: adding one more PASS record never decreases the score.
    #[test]
    fn property_score_monotonic(
        records in proptest::collection::vec(record_strategy(), 0..24),
        importance in importance_strategy(),
    ) {
        let thresholds = GradeThresholds::default();
        let before = score(&records, &thresholds).score;

        let mut extended = records;
        extended.push(make_record(
            "Rocky9", 200, Status::Pass, importance, None, "extra.json".to_string(),
        ));
        let after = score(&extended, &thresholds).score;

        prop_assert!(after >= before - f64::EPSILON);
    }
}
