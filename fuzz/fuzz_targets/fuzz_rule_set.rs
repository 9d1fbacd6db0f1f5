#![no_main]

use arbitrary::Arbitrary;
use fieldcheck::{RuleSet, Validator};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    rules: &'a str,
    data: &'a str,
    yaml: bool,
}

fuzz_target!(|input: Input<'_>| {
    let rules = if input.yaml {
        RuleSet::from_yaml(input.rules)
    } else {
        RuleSet::from_json(input.rules)
    };
    let Ok(rules) = rules else {
        return;
    };
    let Ok(data) = serde_json::from_str::<serde_json::Value>(input.data) else {
        return;
    };

    let mut v = Validator::new(data).with_resolver(fieldcheck::StaticResolver::default());
    v.rules(&rules);
    let passed = v.validate();
    assert_eq!(passed, v.errors().is_empty());
});
