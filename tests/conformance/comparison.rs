use super::common::{messages, passes};
use fieldcheck::{Validator, params};
use serde_json::json;

// ─── equals ─────────────────────────────────────────────────────────────────

#[test]
fn equals_same_values_pass() {
    assert!(passes(json!({"foo": "bar", "bar": "bar"}), "equals", "foo", params!["bar"]));
}

#[test]
fn equals_different_values_fail() {
    let mut v = Validator::new(json!({"foo": "foo", "bar": "bar"}));
    v.rule_with("equals", "foo", params!["bar"]);
    assert!(!v.validate());
    assert_eq!(messages(&v, "foo"), ["Foo must be the same as 'bar'"]);
}

#[test]
fn equals_compares_loosely() {
    assert!(passes(json!({"a": "1", "b": 1}), "equals", "a", params!["b"]));
    assert!(passes(json!({"a": 0, "b": false}), "equals", "a", params!["b"]));
}

#[test]
fn equals_fails_when_other_field_missing() {
    assert!(!passes(json!({"foo": "bar"}), "equals", "foo", params!["bar"]));
}

#[test]
fn equals_both_null_passes_unless_required() {
    let data = json!({"foo": null, "bar": null});
    assert!(passes(data.clone(), "equals", "foo", params!["bar"]));

    let mut v = Validator::new(data);
    v.rule_with("equals", "foo", params!["bar"]);
    v.rule("required", ["foo", "bar"]);
    assert!(!v.validate());
}

#[test]
fn equals_both_unset_passes_unless_required() {
    assert!(passes(json!({}), "equals", "foo", params!["bar"]));

    let mut v = Validator::new(json!({}));
    v.rule_with("equals", "foo", params!["bar"]);
    v.rule("required", ["foo", "bar"]);
    assert!(!v.validate());
}

#[test]
fn equals_uses_labels_for_the_other_field() {
    let mut v = Validator::new(json!({"password": "foo", "passwordConfirm": "bar"}));
    v.rule_with("equals", "password", params!["passwordConfirm"]);
    v.labels([("password", "Password"), ("passwordConfirm", "Password Confirm")]);
    v.validate();
    assert_eq!(
        messages(&v, "password"),
        ["Password must be the same as 'Password Confirm'"]
    );
}

#[test]
fn nested_equals() {
    let data = json!({"outer": {"a": "x", "b": "x", "c": "y"}});
    assert!(passes(data.clone(), "equals", "outer.a", params!["outer.b"]));
    assert!(!passes(data, "equals", "outer.a", params!["outer.c"]));
}

#[test]
fn nested_equals_both_null_and_unset() {
    let nulls = json!({"outer": {"a": null, "b": null}});
    assert!(passes(nulls.clone(), "equals", "outer.a", params!["outer.b"]));
    assert!(passes(json!({"outer": {}}), "equals", "outer.a", params!["outer.b"]));

    let mut v = Validator::new(nulls);
    v.rule_with("equals", "outer.a", params!["outer.b"]);
    v.rule("required", ["outer.a", "outer.b"]);
    assert!(!v.validate());
}

// ─── different ──────────────────────────────────────────────────────────────

#[test]
fn different_values_pass() {
    assert!(passes(json!({"foo": "bar", "bar": "baz"}), "different", "foo", params!["bar"]));
}

#[test]
fn different_same_values_fail() {
    let mut v = Validator::new(json!({"foo": "baz", "bar": "baz"}));
    v.rule_with("different", "foo", params!["bar"]);
    assert!(!v.validate());
    assert_eq!(messages(&v, "foo"), ["Foo must be different than 'bar'"]);
}

#[test]
fn different_both_null_fails() {
    assert!(!passes(json!({"foo": null, "bar": null}), "different", "foo", params!["bar"]));
}

#[test]
fn different_both_unset_fails() {
    assert!(!passes(json!({}), "different", "foo", params!["bar"]));
}

#[test]
fn nested_different() {
    let data = json!({"outer": {"a": "x", "b": "y"}});
    assert!(passes(data, "different", "outer.a", params!["outer.b"]));
    assert!(!passes(json!({"outer": {}}), "different", "outer.a", params!["outer.b"]));
    assert!(!passes(
        json!({"outer": {"a": null, "b": null}}),
        "different",
        "outer.a",
        params!["outer.b"]
    ));
}
