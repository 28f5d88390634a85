//! Property tests for check-id normalization and ordering.

use proptest::prelude::*;

use vigil::models::CheckId;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: normalization is idempotent.
    #[test]
    fn property_normalize_idempotent(raw in "[A-Za-z0-9\\- ]{0,24}") {
        let once = CheckId::new(&raw);
        let twice = CheckId::new(once.as_str());
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: `CheckId::new` never panics on arbitrary input.
    #[test]
    fn property_new_never_panics(raw in "(?s).{0,128}") {
        let _ = CheckId::new(&raw);
    }

    /// PROPERTY: normalized ids carry no separator.
    #[test]
    fn property_no_separator_survives(raw in "[A-Za-z0-9\\-]{0,24}") {
        prop_assert!(!CheckId::new(&raw).as_str().contains('-'));
    }

    /// PROPERTY: ids with the same prefix order by their numeric portion.
    #[test]
    fn property_numeric_order(a in 0u32..10_000, b in 0u32..10_000) {
        let id_a = CheckId::new(format!("U-{a}"));
        let id_b = CheckId::new(format!("U-{b}"));
        prop_assert_eq!(id_a.cmp(&id_b), a.cmp(&b));
    }

    /// PROPERTY: sorting any id collection neither panics nor violates the
    /// pairwise order.
    #[test]
    fn property_sort_is_total(raws in proptest::collection::vec("[A-Z]{0,2}-?[0-9]{0,5}", 0..24)) {
        let mut ids: Vec<CheckId> = raws.iter().map(CheckId::new).collect();
        ids.sort();
        for pair in ids.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}

#[test]
fn documented_numeric_order_example() {
    let mut ids = vec![CheckId::new("U-1"), CheckId::new("U-10"), CheckId::new("U-2")];
    ids.sort();
    let order: Vec<&str> = ids.iter().map(CheckId::as_str).collect();
    assert_eq!(order, vec!["U1", "U2", "U10"]);
}
