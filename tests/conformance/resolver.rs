use fieldcheck::Value;
use fieldcheck::primitives::{Target, filter_fields, resolve_selector, resolve_simple_path};
use serde_json::json;

fn data(value: serde_json::Value) -> Value {
    Value::from(value)
}

fn paths(targets: &[Target<'_>]) -> Vec<(String, bool)> {
    targets.iter().map(|t| (t.path.clone(), t.exists())).collect()
}

fn owned(items: &[(&str, bool)]) -> Vec<(String, bool)> {
    items.iter().map(|(p, e)| (p.to_string(), *e)).collect()
}

#[test]
fn plain_selector_yields_one_target() {
    let d = data(json!({"user": {"email": "a@b.co"}}));
    let targets = resolve_selector("user.email", &d);
    assert_eq!(paths(&targets), owned(&[("user.email", true)]));
    assert_eq!(targets[0].value, Some(&Value::from("a@b.co")));
}

#[test]
fn missing_plain_selector_keeps_its_path() {
    let d = data(json!({"user": {}}));
    assert_eq!(paths(&resolve_selector("user.email", &d)), owned(&[("user.email", false)]));
    assert_eq!(paths(&resolve_selector("nope.deeper", &d)), owned(&[("nope.deeper", false)]));
}

#[test]
fn null_values_exist() {
    let d = data(json!({"a": null}));
    let targets = resolve_selector("a", &d);
    assert_eq!(targets[0].value, Some(&Value::Null));
}

#[test]
fn wildcard_over_list_uses_indices() {
    let d = data(json!({"items": [{"qty": 1}, {"qty": 2}, {}]}));
    assert_eq!(
        paths(&resolve_selector("items.*.qty", &d)),
        owned(&[("items.0.qty", true), ("items.1.qty", true), ("items.2.qty", false)])
    );
}

#[test]
fn wildcard_over_map_uses_keys_in_order() {
    let d = data(json!({"values": {"foo": 5, "bar": 10}}));
    assert_eq!(
        paths(&resolve_selector("values.*", &d)),
        owned(&[("values.foo", true), ("values.bar", true)])
    );
}

#[test]
fn nested_wildcards() {
    let d = data(json!({"w": [{"s": [{"t": 1}]}, {"s": [{"t": 2}, {"t": 3}]}]}));
    assert_eq!(
        paths(&resolve_selector("w.*.s.*.t", &d)),
        owned(&[("w.0.s.0.t", true), ("w.1.s.0.t", true), ("w.1.s.1.t", true)])
    );
}

#[test]
fn wildcard_over_empty_container_yields_nothing() {
    let d = data(json!({"items": [], "map": {}}));
    assert!(resolve_selector("items.*.qty", &d).is_empty());
    assert!(resolve_selector("map.*", &d).is_empty());
}

#[test]
fn wildcard_over_scalar_yields_one_missing_target() {
    let d = data(json!({"name": "bob"}));
    assert_eq!(paths(&resolve_selector("name.*.red", &d)), owned(&[("name.*.red", false)]));
}

#[test]
fn wildcard_under_missing_key_yields_one_missing_target() {
    let d = data(json!({}));
    assert_eq!(paths(&resolve_selector("items.*.qty", &d)), owned(&[("items.*.qty", false)]));
}

#[test]
fn numeric_segments_index_lists() {
    let d = data(json!({"list": ["a", "b"]}));
    assert_eq!(resolve_selector("list.1", &d)[0].value, Some(&Value::from("b")));
    assert!(!resolve_selector("list.5", &d)[0].exists());
}

#[test]
fn simple_path_lookup() {
    let d = data(json!({"a": {"b": [10, 20]}}));
    assert_eq!(resolve_simple_path("a.b.1", &d), Some(&Value::Int(20)));
    assert_eq!(resolve_simple_path("a.c", &d), None);
    assert_eq!(resolve_simple_path("a.b.x", &d), None);
}

#[test]
fn filter_fields_keeps_data_order() {
    let d = data(json!({"c": 3, "a": 1, "b": 2}));
    let filtered = filter_fields(d, &["b".to_string(), "c".to_string()]);
    assert_eq!(filtered, data(json!({"c": 3, "b": 2})));
    let keys: Vec<&String> = filtered.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["c", "b"]);
}
