use super::*;
use crate::{
    catalog::{ResolvedColumn, ScopeValueCollection},
    column::ColumnSpec,
    test_support::{scope, scope_value},
};
use serde_json::json;

fn resolved(spec: ColumnSpec, scope_id: u64) -> ResolvedColumn {
    ResolvedColumn::new(spec, scope(scope_id, None, "col"))
}

#[test]
fn key_map_defaults_and_respects_explicit_keys() {
    let columns = vec![
        resolved(ColumnSpec::by_id(1u64).with_key("rev"), 1),
        resolved(ColumnSpec::by_id(2u64), 2),
    ];

    let keys = ScopeKeyMap::from_columns(&columns);
    assert_eq!(keys.key_of(ScopeId(1)), Some("rev"));
    assert_eq!(keys.key_of(ScopeId(2)), Some("scope_2"));
    assert_eq!(keys.column_names(), vec!["rev", "scope_2"]);
}

#[test]
fn duplicate_scope_takes_the_later_key_and_first_position() {
    let columns = vec![
        resolved(ColumnSpec::by_id(1u64).with_key("first"), 1),
        resolved(ColumnSpec::by_id(2u64).with_key("other"), 2),
        resolved(ColumnSpec::by_id(1u64).with_key("second"), 1),
    ];

    let keys = ScopeKeyMap::from_columns(&columns);
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.key_of(ScopeId(1)), Some("second"));
    assert_eq!(keys.column_names(), vec!["second", "other"]);
}

#[test]
fn payload_always_carries_aggregate_and_select_scopes_only() {
    let columns = vec![resolved(ColumnSpec::by_id(1u64), 1)];
    let query = QueryBuilder::new(false, &columns).build().expect("build");

    let encoded = serde_json::to_value(&query).expect("serialize");
    assert_eq!(
        encoded,
        json!({ "aggregate": false, "select_scopes": [1] })
    );
}

#[test]
fn payload_includes_flattened_scope_value_filters() {
    let values = ScopeValueCollection::new(vec![
        scope_value(10, 2, "A"),
        scope_value(11, 2, "B"),
        scope_value(12, 2, "C"),
    ]);
    let columns = vec![
        resolved(ColumnSpec::by_id(1u64), 1),
        resolved(ColumnSpec::by_id(2u64).with_filter(vec!["A", "B"]), 2).with_values(values),
    ];

    let query = QueryBuilder::new(false, &columns).build().expect("build");
    assert_eq!(
        query.filter_scope_values,
        Some(vec![ScopeValueId(10), ScopeValueId(11)])
    );
}

#[test]
fn filter_without_resolved_values_contributes_nothing() {
    // Filter declared but no scope values attached: nothing to send.
    let columns = vec![resolved(ColumnSpec::by_id(2u64).with_filter("A"), 2)];

    let query = QueryBuilder::new(false, &columns).build().expect("build");
    assert_eq!(query.filter_scope_values, None);
}

#[test]
fn aggregation_methods_present_only_when_declared() {
    let plain = vec![resolved(ColumnSpec::by_id(1u64), 1)];
    let query = QueryBuilder::new(true, &plain).build().expect("build");
    assert_eq!(query.aggregation_methods, None);

    let with_method = vec![resolved(ColumnSpec::by_id(2u64).with_aggregate("sum"), 2)];
    let query = QueryBuilder::new(true, &with_method).build().expect("build");
    assert_eq!(
        query.aggregation_methods,
        Some(vec![AggregationMethod {
            scope_id: ScopeId(2),
            method: "sum".into(),
        }])
    );
}

#[test]
fn malformed_time_bound_fails_the_build() {
    let columns = vec![resolved(ColumnSpec::by_id(1u64), 1)];

    let err = QueryBuilder::new(false, &columns)
        .start_date_time(Some("not-a-timestamp".into()))
        .build()
        .expect_err("malformed start bound");

    assert_eq!(
        err,
        SpecError::MalformedTimestamp {
            field: "start_date_time",
            value: "not-a-timestamp".into(),
        }
    );
}

#[test]
fn well_formed_time_bounds_encode_as_rfc3339() {
    let columns = vec![resolved(ColumnSpec::by_id(1u64), 1)];

    let query = QueryBuilder::new(false, &columns)
        .start_date_time(Some("2024-01-01T00:00:00Z".into()))
        .end_date_time(Some("2024-06-30T23:59:59Z".into()))
        .build()
        .expect("build");

    let encoded = serde_json::to_value(&query).expect("serialize");
    assert_eq!(encoded["start_date_time"], json!("2024-01-01T00:00:00Z"));
    assert_eq!(encoded["end_date_time"], json!("2024-06-30T23:59:59Z"));
}

#[test]
fn optional_directives_are_independent() {
    let columns = vec![resolved(ColumnSpec::by_id(1u64), 1)];

    let query = QueryBuilder::new(true, &columns)
        .intake_status(Some("validated".into()))
        .filter_transaction_ids(Some(vec![TransactionId(7), TransactionId(9)]))
        .build()
        .expect("build");

    let encoded = serde_json::to_value(&query).expect("serialize");
    assert_eq!(encoded["intake_status"], json!("validated"));
    assert_eq!(encoded["filter_transaction_ids"], json!([7, 9]));
    assert!(encoded.get("filter_scope_values").is_none());
    assert!(encoded.get("aggregation_methods").is_none());
}
