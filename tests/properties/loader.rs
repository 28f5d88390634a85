//! Property tests for the result store loader.

use proptest::prelude::*;

use vigil::store::ResultStore;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: whatever one file contains, the scan accounts for it as
    /// exactly one record or one diagnostic - and never panics.
    #[test]
    fn property_load_never_panics(content in "(?s).{0,256}") {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Rocky9_U01.json"), &content).unwrap();

        let scan = ResultStore::new(dir.path()).load();
        prop_assert_eq!(scan.records.len() + scan.diagnostics.len(), 1);
    }

    /// PROPERTY: loaded records always carry non-empty guide and evidence,
    /// regardless of what the file provided.
    #[test]
    fn property_fallbacks_always_fill(
        guide in proptest::option::of("[a-z ]{0,12}"),
        evidence in proptest::option::of("[a-z ]{0,12}"),
    ) {
        let mut record = serde_json::json!({"check_id": "U-01", "status": "FAIL"});
        if let Some(guide) = &guide {
            record["guide"] = serde_json::json!(guide);
        }
        if let Some(evidence) = &evidence {
            record["evidence"] = serde_json::json!(evidence);
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Rocky9_U01.json"), record.to_string()).unwrap();

        let scan = ResultStore::new(dir.path()).load();
        prop_assert_eq!(scan.records.len(), 1);
        prop_assert!(!scan.records[0].guide.trim().is_empty());
        prop_assert!(!scan.records[0].evidence.trim().is_empty());
    }

    /// PROPERTY: unparseable dates become None instead of crashing the scan.
    #[test]
    fn property_bad_dates_coerced(date in "[A-Za-z0-9:/ \\-]{0,20}") {
        let record = serde_json::json!({
            "check_id": "U-01",
            "status": "PASS",
            "check_date": date,
        });

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Rocky9_U01.json"), record.to_string()).unwrap();

        let scan = ResultStore::new(dir.path()).load();
        prop_assert_eq!(scan.records.len(), 1);
    }
}
