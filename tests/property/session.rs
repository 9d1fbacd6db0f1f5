use super::common::arb_json;
use fieldcheck::{RuleSet, Validator, Value};
use indexmap::IndexMap;
use proptest::prelude::*;

const RULES: &[&str] = &["required", "integer", "numeric", "alpha", "email", "boolean", "array", "date"];

fn arb_data() -> impl Strategy<Value = serde_json::Value> {
    prop::collection::vec(("[a-e]", arb_json(1)), 0..6)
        .prop_map(|pairs| serde_json::Value::Object(pairs.into_iter().collect()))
}

fn arb_bindings() -> impl Strategy<Value = Vec<(&'static str, Vec<String>)>> {
    prop::collection::vec(
        (
            prop::sample::select(RULES),
            prop::collection::vec("[a-f]", 1..3),
        ),
        0..6,
    )
}

/// Groups bindings by rule name in first-seen order, the shape of the bulk
/// form.
fn grouped(bindings: &[(&'static str, Vec<String>)]) -> IndexMap<&'static str, Vec<Vec<String>>> {
    let mut groups: IndexMap<&'static str, Vec<Vec<String>>> = IndexMap::new();
    for (rule, fields) in bindings {
        groups.entry(*rule).or_default().push(fields.clone());
    }
    groups
}

fn session(data: &serde_json::Value, bindings: &[(&'static str, Vec<String>)]) -> Validator {
    let mut v = Validator::new(data.clone());
    for (rule, fields) in bindings {
        v.rule(rule, fields.clone());
    }
    v
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn validate_is_idempotent(data in arb_data(), bindings in arb_bindings()) {
        let mut v = session(&data, &bindings);
        let first = v.validate();
        let report = v.errors().clone();
        prop_assert_eq!(v.validate(), first);
        prop_assert_eq!(v.errors(), &report);
    }

    #[test]
    fn result_matches_error_report(data in arb_data(), bindings in arb_bindings()) {
        let mut v = session(&data, &bindings);
        let passed = v.validate();
        prop_assert_eq!(passed, v.errors().is_empty());
        prop_assert!(v.is_well_configured());
    }

    #[test]
    fn bulk_form_matches_individual_bindings(data in arb_data(), bindings in arb_bindings()) {
        let groups = grouped(&bindings);

        let bulk: serde_json::Map<String, serde_json::Value> = groups
            .iter()
            .map(|(rule, entries)| {
                let entries: Vec<serde_json::Value> =
                    entries.iter().map(|fields| serde_json::json!([fields])).collect();
                (rule.to_string(), serde_json::Value::Array(entries))
            })
            .collect();
        let rules = RuleSet::from_value(&Value::from(serde_json::Value::Object(bulk))).unwrap();
        let mut from_bulk = Validator::new(data.clone());
        from_bulk.rules(&rules);

        let mut individual = Validator::new(data);
        for (rule, entries) in &groups {
            for fields in entries {
                individual.rule(rule, fields.clone());
            }
        }

        prop_assert_eq!(from_bulk.validate(), individual.validate());
        prop_assert_eq!(from_bulk.errors(), individual.errors());
    }

    #[test]
    fn with_data_matches_a_fresh_session(
        first in arb_data(),
        second in arb_data(),
        bindings in arb_bindings(),
    ) {
        let mut original = session(&first, &bindings);
        original.validate();
        let mut copied = original.with_data(second.clone());
        let mut fresh = session(&second, &bindings);
        prop_assert_eq!(copied.validate(), fresh.validate());
        prop_assert_eq!(copied.errors(), fresh.errors());
    }
}
