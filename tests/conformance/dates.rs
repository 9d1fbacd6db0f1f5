use super::common::{messages, passes, passes_value};
use chrono::{NaiveDate, Utc};
use fieldcheck::{Validator, Value, params};
use serde_json::json;

fn ymd(y: i32, m: u32, d: u32) -> Value {
    Value::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn single(key: &str, value: Value) -> Value {
    [(key, value)].into_iter().collect()
}

// ─── date ───────────────────────────────────────────────────────────────────

#[test]
fn date_accepts_common_forms() {
    for value in [
        "2013-01-27",
        "2013-01-27 14:05:00",
        "2013-01-27T14:05:00+02:00",
        "2013/01/27",
        "01/27/2013",
        "27.01.2013",
        "27 January 2013",
        "January 27, 2013",
        "Sun, 27 Jan 2013 14:05:00 +0000",
        "today",
    ] {
        assert!(passes(json!({"date": value}), "date", "date", params![]), "{value}");
    }
}

#[test]
fn date_accepts_date_time_values() {
    assert!(passes_value(single("date", Value::from(Utc::now())), "date", "date", params![]));
}

#[test]
fn date_rejects_garbage() {
    assert!(!passes(json!({"date": "no thanks"}), "date", "date", params![]));
    assert!(!passes(json!({"date": "2013-13-45"}), "date", "date", params![]));
    assert!(!passes(json!({"date": 20130127}), "date", "date", params![]));
}

#[test]
fn date_empty_passes_when_not_required() {
    assert!(passes(json!({"date": ""}), "date", "date", params![]));

    let mut v = Validator::new(json!({"date": ""}));
    v.rule("required", "date");
    v.rule("date", "date");
    assert!(!v.validate());
    assert_eq!(
        messages(&v, "date"),
        ["Date is required", "Date is not a valid date"]
    );
}

#[test]
fn optional_array_parts_are_ignored() {
    assert!(passes(
        json!({"data": [{"foo": "2018-01-01"}, {"bar": 1}]}),
        "date",
        "data.*.foo",
        params![]
    ));
}

// ─── dateFormat ─────────────────────────────────────────────────────────────

#[test]
fn date_format_matches_exactly() {
    assert!(passes(json!({"date": "2013-01-27"}), "dateFormat", "date", params!["Y-m-d"]));
    assert!(passes(json!({"date": "27/01/2013 14:05"}), "dateFormat", "date", params!["d/m/Y H:i"]));
    assert!(passes(json!({"date": "14:05:59"}), "dateFormat", "date", params!["H:i:s"]));
}

#[test]
fn date_format_rejects_mismatches() {
    assert!(!passes(json!({"date": "no thanks"}), "dateFormat", "date", params!["Y-m-d"]));
    assert!(!passes(json!({"date": "2013-27-01"}), "dateFormat", "date", params!["Y-m-d"]));
    assert!(!passes(json!({"date": "2013-01-27 10:00"}), "dateFormat", "date", params!["Y-m-d"]));
    assert!(!passes(json!({"date": "2013-01-27"}), "dateFormat", "date", params![]));
}

#[test]
fn date_format_message() {
    let mut v = Validator::new(json!({"date": "27-01-2013"}));
    v.rule_with("dateFormat", "date", params!["Y-m-d"]);
    v.validate();
    assert_eq!(messages(&v, "date"), ["Date must be date with format 'Y-m-d'"]);
}

// ─── dateBefore / dateAfter ─────────────────────────────────────────────────

#[test]
fn date_before() {
    assert!(passes(json!({"date": "2013-01-27"}), "dateBefore", "date", vec![ymd(2013, 1, 28)]));
    assert!(passes(json!({"d": "2018-09-01"}), "dateBefore", "d", params!["2018-10-13"]));
    assert!(!passes(json!({"date": "2013-01-27"}), "dateBefore", "date", params!["2013-01-26"]));
    assert!(!passes(json!({"date": "2013-01-27"}), "dateBefore", "date", params!["2013-01-27"]));
}

#[test]
fn date_after() {
    assert!(passes(json!({"date": "2013-01-27"}), "dateAfter", "date", vec![ymd(2013, 1, 26)]));
    assert!(passes(json!({"d": "2018-09-01"}), "dateAfter", "d", params!["2018-01-01"]));
    assert!(!passes(json!({"date": "2013-01-27"}), "dateAfter", "date", params!["2013-01-28"]));
}

#[test]
fn date_comparisons_fail_on_unparseable_input() {
    assert!(!passes(json!({"date": "soon"}), "dateBefore", "date", params!["2013-01-26"]));
    assert!(!passes(json!({"date": "2013-01-27"}), "dateAfter", "date", params!["whenever"]));
    assert!(!passes(json!({"date": "2013-01-27"}), "dateAfter", "date", params![]));
}

#[test]
fn date_bound_objects_render_as_dates_in_messages() {
    let mut v = Validator::new(json!({"startDate": "2013-01-27", "endDate": "2013-05-08"}));
    v.rule("date", ["startDate", "endDate"]);
    v.rule_with("dateBefore", "endDate", vec![ymd(2013, 1, 27)]);
    v.rule_with("dateAfter", "startDate", vec![ymd(2013, 2, 27)]);
    assert!(!v.validate());
    assert_eq!(
        messages(&v, "endDate"),
        ["EndDate must be date before '2013-01-27'"]
    );
    assert_eq!(
        messages(&v, "startDate"),
        ["StartDate must be date after '2013-02-27'"]
    );
}

// ─── instanceOf ─────────────────────────────────────────────────────────────

struct Widget;
struct Gadget;

#[test]
fn instance_of_by_name() {
    let data = single("attributeName", Value::object(Widget));
    assert!(passes_value(data.clone(), "instanceOf", "attributeName", params!["Widget"]));
    assert!(passes_value(
        data.clone(),
        "instanceOf",
        "attributeName",
        params![std::any::type_name::<Widget>()]
    ));
    assert!(!passes_value(data, "instanceOf", "attributeName", params!["SomeOtherClass"]));
}

#[test]
fn instance_of_by_reference_instance() {
    let data = single("attributeName", Value::object(Widget));
    assert!(passes_value(data.clone(), "instanceOf", "attributeName", vec![Value::object(Widget)]));
    assert!(!passes_value(data, "instanceOf", "attributeName", vec![Value::object(Gadget)]));
}

#[test]
fn instance_of_date_time() {
    let data = single("date", Value::from(Utc::now()));
    let mut v = Validator::new(data);
    v.rule_with("instanceOf", "date", params!["DateTime"]);
    v.rule_with("instanceOf", "date", vec![Value::from(Utc::now())]);
    assert!(v.validate());
}

#[test]
fn instance_of_rejects_plain_values() {
    assert!(!passes(json!({"attributeName": "Widget"}), "instanceOf", "attributeName", params!["string"]));
}

#[test]
fn instance_of_message_names_the_expected_type() {
    let mut v = Validator::new(single("attributeName", Value::object(Gadget)));
    v.rule_with("instanceOf", "attributeName", vec![Value::object(Widget)]);
    v.validate();
    assert_eq!(
        messages(&v, "attributeName"),
        ["AttributeName must be an instance of 'Widget'"]
    );
}
