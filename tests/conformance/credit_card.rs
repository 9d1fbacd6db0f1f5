use super::common::{messages, passes};
use fieldcheck::{Value, Validator, params};
use serde_json::json;

const VALID: &[(&str, &[i64])] = &[
    ("visa", &[4539511619543489, 4532949059629052, 4024007171194938, 4929646403373269, 4539135861690622]),
    (
        "mastercard",
        &[
            5162057048081965,
            5382687859049349,
            5484388880142230,
            5464941521226434,
            5473481232685965,
            2223000048400011,
            2223520043560014,
        ],
    ),
    ("amex", &[371442067262027, 340743030537918, 345509167493596, 343665795576848, 346087552944316]),
    ("dinersclub", &[30363194756249, 30160097740704, 38186521192206, 38977384214552, 38563220301454]),
    ("discover", &[6011712400392605, 6011536340491809, 6011785775263015, 6011984124619056, 6011320958064251]),
];

const INVALID: &[(&str, &[i64])] = &[
    ("visa", &[3539511619543489, 3532949059629052, 3024007171194938, 3929646403373269, 3539135861690622]),
    (
        "mastercard",
        &[4162057048081965, 4382687859049349, 4484388880142230, 4464941521226434, 4473481232685965],
    ),
    ("amex", &[271442067262027, 240743030537918, 245509167493596, 243665795576848, 246087552944316]),
    ("dinersclub", &[20363194756249, 20160097740704, 28186521192206, 28977384214552, 28563220301454]),
    ("discover", &[5011712400392605, 5011536340491809, 5011785775263015, 5011984124619056, 5011320958064251]),
];

/// The parameter shapes a `creditCard` binding accepts.
fn param_variants(issuer: &str) -> Vec<Vec<Value>> {
    let allowed = vec![issuer, "mastercard", "visa"];
    vec![
        params![],
        params![allowed.clone()],
        params![issuer],
        params![issuer, allowed],
    ]
}

#[test]
fn known_issuers_pass_in_every_param_form() {
    for (issuer, numbers) in VALID {
        for number in *numbers {
            for params in param_variants(issuer) {
                assert!(
                    passes(json!({"test": number}), "creditCard", "test", params.clone()),
                    "{issuer} {number} {params:?}"
                );
            }
        }
    }
}

#[test]
fn invalid_numbers_fail_in_every_param_form() {
    for (issuer, numbers) in INVALID {
        for number in *numbers {
            for params in param_variants(issuer) {
                assert!(
                    !passes(json!({"test": number}), "creditCard", "test", params.clone()),
                    "{issuer} {number} {params:?}"
                );
            }
        }
    }
}

#[test]
fn unknown_issuer_name_fails() {
    let number = 4539511619543489i64;
    assert!(!passes(json!({"test": number}), "creditCard", "test", params!["invalidCardName"]));
    assert!(!passes(
        json!({"test": number}),
        "creditCard",
        "test",
        params!["invalidCardName", vec!["invalidCardName", "mastercard", "visa"]]
    ));
}

#[test]
fn issuer_must_be_in_the_allowed_list() {
    assert!(!passes(
        json!({"test": 4539511619543489i64}),
        "creditCard",
        "test",
        params!["visa", vec!["mastercard", "amex"]]
    ));
}

#[test]
fn number_must_match_the_named_issuer() {
    assert!(!passes(json!({"test": 4539511619543489i64}), "creditCard", "test", params!["amex"]));
}

#[test]
fn separators_are_ignored_in_string_input() {
    assert!(passes(json!({"test": "4539 5116 1954 3489"}), "creditCard", "test", params![]));
    assert!(passes(json!({"test": "4539-5116-1954-3489"}), "creditCard", "test", params![]));
}

#[test]
fn short_or_non_numeric_input_fails() {
    assert!(!passes(json!({"test": "4111"}), "creditCard", "test", params![]));
    assert!(!passes(json!({"test": "not a card"}), "creditCard", "test", params![]));
    assert!(!passes(json!({"test": [4539511619543489i64]}), "creditCard", "test", params![]));
}

#[test]
fn credit_card_message() {
    let mut v = Validator::new(json!({"card": "1234"}));
    v.rule("creditCard", "card");
    v.validate();
    assert_eq!(messages(&v, "card"), ["Card must be a valid credit card number"]);
}
