use super::*;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn raw_spec_with_single_selector_converts() {
    let spec: ColumnSpec = serde_json::from_value(json!({
        "representation": "cost_price",
        "filter": ["A", "B"],
        "aggregate": "sum",
        "key": "cost",
    }))
    .expect("valid column spec");

    assert_eq!(
        spec.selector(),
        &ScopeSelector::Representation("cost_price".into())
    );
    assert_eq!(
        spec.filter().map(ColumnFilter::values),
        Some([json!("A"), json!("B")].as_slice())
    );
    assert_eq!(spec.aggregate(), Some("sum"));
    assert_eq!(spec.key(), Some("cost"));
}

#[test]
fn raw_spec_without_selector_is_rejected() {
    let err = serde_json::from_value::<ColumnSpec>(json!({ "key": "rev" }))
        .expect_err("zero selectors must fail");

    assert!(err.to_string().contains("found 0"));
}

#[test]
fn raw_spec_with_two_selectors_is_rejected() {
    let err = serde_json::from_value::<ColumnSpec>(json!({
        "scope_id": 4,
        "name_dataset": "region",
    }))
    .expect_err("two selectors must fail");

    assert!(err.to_string().contains("found 2"));
}

#[test]
fn scalar_filter_normalizes_to_single_value_slice() {
    let spec: ColumnSpec = serde_json::from_value(json!({
        "scope_id": 2,
        "filter": "north",
    }))
    .expect("valid column spec");

    assert_eq!(
        spec.filter().map(ColumnFilter::values),
        Some([json!("north")].as_slice())
    );
}

#[test]
fn builder_mirrors_the_raw_form() {
    let built = ColumnSpec::by_representation("cost_price")
        .with_filter(vec!["A", "B"])
        .with_aggregate("sum")
        .with_key("cost");

    let parsed: ColumnSpec = serde_json::from_value(json!({
        "representation": "cost_price",
        "filter": ["A", "B"],
        "aggregate": "sum",
        "key": "cost",
    }))
    .expect("valid column spec");

    assert_eq!(built, parsed);
}

proptest! {
    #[test]
    fn conversion_succeeds_iff_exactly_one_selector(
        by_id in any::<bool>(),
        by_repr in any::<bool>(),
        by_name in any::<bool>(),
    ) {
        let raw = RawColumnSpec {
            scope_id: by_id.then_some(1u64.into()),
            representation: by_repr.then(|| "repr".to_string()),
            name_dataset: by_name.then(|| "name".to_string()),
            ..RawColumnSpec::default()
        };

        let selectors = usize::from(by_id) + usize::from(by_repr) + usize::from(by_name);
        prop_assert_eq!(ColumnSpec::try_from(raw).is_ok(), selectors == 1);
    }
}
