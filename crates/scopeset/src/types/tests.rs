use super::*;
use serde_json::json;

#[test]
fn business_cell_round_trips_sentinel_and_id() {
    assert_eq!(BusinessCell::from("all"), BusinessCell::All);
    assert_eq!(BusinessCell::from("emea"), BusinessCell::Id("emea".into()));
    assert_eq!(BusinessCell::All.as_str(), "all");
    assert_eq!(BusinessCell::Id("emea".into()).to_string(), "emea");

    let encoded = serde_json::to_value(BusinessCell::All).expect("serialize");
    assert_eq!(encoded, json!("all"));
}

#[test]
fn transaction_deserializes_without_id() {
    let tx: Transaction = serde_json::from_value(json!({
        "scope_values": [
            { "scope_id": 7, "value": "north" },
            { "scope_id": 9, "value": 12.5 },
        ],
    }))
    .expect("deserialize");

    assert_eq!(tx.id, None);
    assert_eq!(tx.value_of(ScopeId(7)), Some(&json!("north")));
    assert_eq!(tx.value_of(ScopeId(9)), Some(&json!(12.5)));
    assert_eq!(tx.value_of(ScopeId(1)), None);
}

#[test]
fn scope_deserializes_optional_fields() {
    let scope: Scope = serde_json::from_value(json!({
        "id": 3,
        "name_dataset": "cost_price",
        "type": "numerical",
    }))
    .expect("deserialize");

    assert_eq!(scope.id, ScopeId(3));
    assert_eq!(scope.representation, None);
    assert_eq!(scope.scope_type.as_deref(), Some("numerical"));
}
