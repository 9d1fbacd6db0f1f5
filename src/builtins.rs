//! Built-in rules.
//!
//! Every rule is a plain function over a [`RuleInput`]; [`BUILTIN_RULES`] binds
//! each one to its name, its default message, and the two evaluation flags
//! the session needs.

use crate::error::RuleError;
use crate::primitives::{
    as_datetime, as_f64, compare_numeric, is_empty, is_numeric, loose_equals,
    matches_date_format, parse_datetime, string_form_equals, strict_equals, text_of, truthy,
};
use crate::registry::{Rule, RuleInput};
use crate::value::Value;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::cell::RefCell;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

/// How a rule's parameters become message arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageArgs {
    /// Parameters as given.
    Params,
    /// The elements of the first (list) parameter.
    SpreadFirst,
    /// The type name each parameter denotes.
    TypeNames,
}

/// A built-in registry entry.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinRule {
    pub name: &'static str,
    pub message: &'static str,
    pub check: fn(&RuleInput<'_>) -> bool,
    /// Evaluated even when the target is absent, null or `""`.
    pub checks_absent: bool,
    pub args: MessageArgs,
    /// Parameters a binding must supply for the rule to be evaluated.
    pub min_params: usize,
}

impl Rule for BuiltinRule {
    fn evaluate(&self, input: &RuleInput<'_>) -> Result<bool, RuleError> {
        Ok((self.check)(input))
    }

    fn checks_absent(&self) -> bool {
        self.checks_absent
    }

    fn min_params(&self) -> usize {
        self.min_params
    }

    fn message_params(&self, params: &[Value]) -> Vec<Value> {
        match self.args {
            MessageArgs::Params => params.to_vec(),
            MessageArgs::SpreadFirst => match params.first() {
                Some(Value::List(items)) => items.clone(),
                _ => params.to_vec(),
            },
            MessageArgs::TypeNames => params
                .iter()
                .map(|p| match p {
                    Value::DateTime(_) | Value::Object(_) => Value::from(p.type_name()),
                    other => other.clone(),
                })
                .collect(),
        }
    }
}

const fn rule(name: &'static str, message: &'static str, check: fn(&RuleInput<'_>) -> bool) -> BuiltinRule {
    BuiltinRule {
        name,
        message,
        check,
        checks_absent: false,
        args: MessageArgs::Params,
        min_params: 0,
    }
}

/// Same as [`rule`] for rules that read `n` parameters.
const fn takes(n: usize, name: &'static str, message: &'static str, check: fn(&RuleInput<'_>) -> bool) -> BuiltinRule {
    BuiltinRule {
        min_params: n,
        ..rule(name, message, check)
    }
}

const fn presence(name: &'static str, message: &'static str, check: fn(&RuleInput<'_>) -> bool) -> BuiltinRule {
    BuiltinRule {
        checks_absent: true,
        ..rule(name, message, check)
    }
}

/// The built-in rule set as a compile-time table.
pub static BUILTIN_RULES: &[BuiltinRule] = &[
    // Presence
    presence("required", "{field} is required", required),
    presence("requiredWith", "{field} is required", required_with),
    presence("requiredWithout", "{field} is required", required_without),
    presence("accepted", "{field} must be accepted", accepted),
    rule("optional", "{field} is optional", |_| true),
    // Comparison
    takes(1, "equals", "{field} must be the same as '%s'", equals),
    BuiltinRule {
        min_params: 1,
        ..presence("different", "{field} must be different than '%s'", different)
    },
    // Types and numbers
    rule("numeric", "{field} must be numeric", |i| is_numeric(i.value())),
    rule("integer", "{field} must be an integer", integer),
    rule("boolean", "{field} must be a boolean", |i| matches!(i.value(), Value::Bool(_))),
    rule("array", "{field} must be an array", |i| i.value().is_container()),
    takes(1, "min", "{field} must be at least %s", min),
    takes(1, "max", "{field} must be no more than %s", max),
    BuiltinRule {
        args: MessageArgs::SpreadFirst,
        ..takes(1, "between", "{field} must be between %s and %s", between)
    },
    // Lengths
    takes(1, "length", "{field} must be %d characters long", length),
    takes(2, "lengthBetween", "{field} must be between %d and %d characters", length_between),
    takes(1, "lengthMin", "{field} must be at least %d characters long", length_min),
    takes(1, "lengthMax", "{field} must not exceed %d characters", length_max),
    // Membership
    takes(1, "in", "{field} contains invalid value", in_list),
    takes(1, "notIn", "{field} contains invalid value", not_in_list),
    takes(1, "listContains", "{field} contains invalid value", list_contains),
    takes(1, "contains", "{field} must contain %s", contains),
    takes(1, "subset", "{field} contains an item that is not in the list", subset),
    rule("containsUnique", "{field} must contain unique elements only", contains_unique),
    takes(1, "arrayHasKeys", "{field} does not contain all required keys", array_has_keys),
    // Text
    rule("alpha", "{field} must contain only letters a-z", |i| matches_text(i, &ALPHA_RE)),
    rule("alphaNum", "{field} must contain only letters a-z and/or numbers 0-9", |i| {
        matches_text(i, &ALPHA_NUM_RE)
    }),
    rule("slug", "{field} must contain only letters a-z, numbers 0-9, dashes and underscores", |i| {
        matches_text(i, &SLUG_RE)
    }),
    rule("ascii", "{field} must contain only ASCII characters", |i| {
        text_of(i.value()).is_some_and(|s| s.is_ascii())
    }),
    takes(1, "regex", "{field} contains invalid characters", regex_rule),
    // Network
    rule("ip", "{field} is not a valid IP address", |i| parses_as::<IpAddr>(i)),
    rule("ipv4", "{field} is not a valid IPv4 address", |i| parses_as::<Ipv4Addr>(i)),
    rule("ipv6", "{field} is not a valid IPv6 address", |i| parses_as::<Ipv6Addr>(i)),
    rule("email", "{field} is not a valid email address", |i| {
        i.value().as_str().is_some_and(is_email)
    }),
    rule("emailDNS", "{field} is not a valid email address", email_dns),
    rule("url", "{field} is not a valid URL", |i| i.value().as_str().is_some_and(is_url)),
    rule("urlActive", "{field} must be an active domain", url_active),
    // Dates
    rule("date", "{field} is not a valid date", date),
    takes(1, "dateFormat", "{field} must be date with format '%s'", date_format),
    takes(1, "dateBefore", "{field} must be date before '%s'", |i| {
        compare_dates(i) == Some(Ordering::Less)
    }),
    takes(1, "dateAfter", "{field} must be date after '%s'", |i| {
        compare_dates(i) == Some(Ordering::Greater)
    }),
    // Misc
    rule("creditCard", "{field} must be a valid credit card number", credit_card),
    BuiltinRule {
        args: MessageArgs::TypeNames,
        ..takes(1, "instanceOf", "{field} must be an instance of '%s'", instance_of)
    },
];

/// Looks up a built-in by name.
pub fn builtin(name: &str) -> Option<&'static BuiltinRule> {
    BUILTIN_RULES.iter().find(|r| r.name == name)
}

// ─── Presence ───────────────────────────────────────────────────────────────

fn is_filled(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !is_empty(v))
}

fn required(input: &RuleInput<'_>) -> bool {
    let allow_empty = input.param(0).is_some_and(truthy);
    match input.value {
        None => false,
        Some(_) if allow_empty => true,
        value => is_filled(value),
    }
}

/// Field names named by a `requiredWith`/`requiredWithout` parameter.
fn dependent_fields<'a>(param: Option<&'a Value>) -> Vec<&'a str> {
    match param {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::List(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn required_with(input: &RuleInput<'_>) -> bool {
    let fields = dependent_fields(input.param(0));
    let all = input.param(1).is_some_and(truthy);
    let filled = |f: &&str| is_filled(input.lookup(f));
    let triggered = if all {
        !fields.is_empty() && fields.iter().all(filled)
    } else {
        fields.iter().any(filled)
    };
    !triggered || is_filled(input.value)
}

fn required_without(input: &RuleInput<'_>) -> bool {
    let fields = dependent_fields(input.param(0));
    let all = input.param(1).is_some_and(truthy);
    let missing = |f: &&str| !is_filled(input.lookup(f));
    let triggered = if all {
        !fields.is_empty() && fields.iter().all(missing)
    } else {
        fields.iter().any(missing)
    };
    !triggered || is_filled(input.value)
}

fn accepted(input: &RuleInput<'_>) -> bool {
    match input.value {
        Some(Value::String(s)) => matches!(s.as_str(), "yes" | "on" | "1"),
        Some(Value::Int(1)) | Some(Value::Bool(true)) => true,
        _ => false,
    }
}

// ─── Comparison ─────────────────────────────────────────────────────────────

/// Value of the field named by the first parameter, when it is set.
fn other_field<'a>(input: &RuleInput<'a>) -> Option<&'a Value> {
    let name = input.param(0)?.as_str()?;
    input.lookup(name).filter(|v| !v.is_null())
}

fn equals(input: &RuleInput<'_>) -> bool {
    other_field(input).is_some_and(|other| loose_equals(input.value(), other))
}

fn different(input: &RuleInput<'_>) -> bool {
    other_field(input).is_some_and(|other| !loose_equals(input.value(), other))
}

// ─── Numbers ────────────────────────────────────────────────────────────────

static STRICT_INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|-?[1-9][0-9]*)$").unwrap());

static LOOSE_INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(0|[1-9][0-9]*)$").unwrap());

fn integer(input: &RuleInput<'_>) -> bool {
    let strict = input.param(0).is_some_and(truthy);
    let value = input.value();
    if strict {
        return match value {
            Value::Int(_) => true,
            Value::String(s) => STRICT_INTEGER_RE.is_match(s) && s.parse::<i64>().is_ok(),
            _ => false,
        };
    }
    match value {
        Value::Int(_) => true,
        Value::Float(f) => f.is_finite() && f.fract() == 0.0,
        Value::String(s) => {
            let s = s.trim();
            LOOSE_INTEGER_RE.is_match(s) && s.parse::<i64>().is_ok()
        }
        _ => false,
    }
}

fn min(input: &RuleInput<'_>) -> bool {
    input
        .param(0)
        .and_then(|bound| compare_numeric(input.value(), bound))
        .is_some_and(Ordering::is_ge)
}

fn max(input: &RuleInput<'_>) -> bool {
    input
        .param(0)
        .and_then(|bound| compare_numeric(input.value(), bound))
        .is_some_and(Ordering::is_le)
}

fn between(input: &RuleInput<'_>) -> bool {
    let Some(Value::List(bounds)) = input.param(0) else {
        return false;
    };
    let [low, high] = bounds.as_slice() else {
        return false;
    };
    let value = input.value();
    compare_numeric(value, low).is_some_and(Ordering::is_ge)
        && compare_numeric(value, high).is_some_and(Ordering::is_le)
}

// ─── Lengths ────────────────────────────────────────────────────────────────

fn char_len(input: &RuleInput<'_>) -> Option<f64> {
    input.value().as_str().map(|s| s.chars().count() as f64)
}

fn bound(input: &RuleInput<'_>, index: usize) -> Option<f64> {
    input.param(index).and_then(as_f64)
}

fn length(input: &RuleInput<'_>) -> bool {
    let (Some(len), Some(first)) = (char_len(input), bound(input, 0)) else {
        return false;
    };
    match input.param(1) {
        Some(_) => bound(input, 1).is_some_and(|second| len >= first && len <= second),
        None => len == first,
    }
}

fn length_between(input: &RuleInput<'_>) -> bool {
    match (char_len(input), bound(input, 0), bound(input, 1)) {
        (Some(len), Some(low), Some(high)) => len >= low && len <= high,
        _ => false,
    }
}

fn length_min(input: &RuleInput<'_>) -> bool {
    matches!((char_len(input), bound(input, 0)), (Some(len), Some(low)) if len >= low)
}

fn length_max(input: &RuleInput<'_>) -> bool {
    matches!((char_len(input), bound(input, 0)), (Some(len), Some(high)) if len <= high)
}

// ─── Membership ─────────────────────────────────────────────────────────────

/// Candidates of an `in`/`notIn` reference: list elements or map keys.
fn reference_candidates(reference: Option<&Value>) -> Option<Vec<Value>> {
    match reference? {
        Value::List(items) => Some(items.clone()),
        Value::Map(map) => Some(map.keys().map(|k| Value::from(k.as_str())).collect()),
        _ => None,
    }
}

fn equality(strict: bool) -> fn(&Value, &Value) -> bool {
    if strict { strict_equals } else { loose_equals }
}

fn is_member(input: &RuleInput<'_>) -> Option<bool> {
    let candidates = reference_candidates(input.param(0))?;
    let eq = equality(input.param(1).is_some_and(truthy));
    let value = input.value();
    Some(candidates.iter().any(|c| eq(value, c)))
}

fn in_list(input: &RuleInput<'_>) -> bool {
    is_member(input) == Some(true)
}

fn not_in_list(input: &RuleInput<'_>) -> bool {
    is_member(input) == Some(false)
}

fn list_contains(input: &RuleInput<'_>) -> bool {
    let Some(needle) = input.param(0) else {
        return false;
    };
    let eq = equality(input.param(1).is_some_and(truthy));
    match input.value() {
        Value::List(items) => items.iter().any(|item| eq(item, needle)),
        Value::Map(map) => map.keys().any(|k| eq(&Value::from(k.as_str()), needle)),
        _ => false,
    }
}

fn contains(input: &RuleInput<'_>) -> bool {
    let (Some(haystack), Some(needle)) = (input.value().as_str(), input.param(0).and_then(Value::as_str))
    else {
        return false;
    };
    let case_sensitive = input.param(1).is_some_and(truthy);
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

fn subset(input: &RuleInput<'_>) -> bool {
    let reference: Vec<&Value> = match input.param(0) {
        Some(reference @ (Value::List(_) | Value::Map(_))) => reference.elements(),
        _ => return false,
    };
    let value = input.value();
    let items: Vec<&Value> = if value.is_container() {
        value.elements()
    } else {
        vec![value]
    };
    items
        .iter()
        .all(|item| reference.iter().any(|r| string_form_equals(item, r)))
}

fn contains_unique(input: &RuleInput<'_>) -> bool {
    let value = input.value();
    if !value.is_container() {
        return false;
    }
    let items = value.elements();
    items
        .iter()
        .enumerate()
        .all(|(i, a)| items[i + 1..].iter().all(|b| !loose_equals(a, b)))
}

fn array_has_keys(input: &RuleInput<'_>) -> bool {
    let value = input.value();
    let Some(Value::List(keys)) = input.param(0) else {
        return false;
    };
    if keys.is_empty() || !value.is_container() {
        return false;
    }
    keys.iter().all(|key| {
        crate::primitives::scalar_string(key).is_some_and(|k| value.child(&k).is_some())
    })
}

// ─── Text ───────────────────────────────────────────────────────────────────

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHA_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

fn matches_text(input: &RuleInput<'_>, re: &Regex) -> bool {
    text_of(input.value()).is_some_and(|s| re.is_match(&s))
}

/// Patterns compiled during one `validate()` call, keyed by source text.
#[derive(Debug, Default)]
pub struct PatternCache(RefCell<HashMap<String, Option<Regex>>>);

impl PatternCache {
    /// Whether `text` matches `pattern`. An invalid pattern never matches.
    pub fn is_match(&self, pattern: &str, text: &str) -> bool {
        let mut compiled = self.0.borrow_mut();
        if !compiled.contains_key(pattern) {
            compiled.insert(pattern.to_string(), compile_pattern(pattern));
        }
        compiled
            .get(pattern)
            .and_then(Option::as_ref)
            .is_some_and(|re| re.is_match(text))
    }

    /// Number of distinct patterns seen so far.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

fn regex_rule(input: &RuleInput<'_>) -> bool {
    let Some(pattern) = input.param(0).and_then(Value::as_str) else {
        return false;
    };
    let Some(text) = text_of(input.value()) else {
        return false;
    };
    input.patterns.is_match(pattern, &text)
}

/// Characters that open a delimited pattern. Anything else starts a bare one.
const PATTERN_DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|', '+', ',', ';', '`', '{', '<'];

/// Compiles a pattern written either bare (`^[a-z]+$`) or in delimiter form
/// (`/body/flags`, `#body#i`, `{body}x`). Returns `None` when it is invalid.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    let open = match pattern.chars().next() {
        Some(c) if PATTERN_DELIMITERS.contains(&c) => c,
        _ => return Regex::new(pattern).ok(),
    };
    let close = match open {
        '{' => '}',
        '<' => '>',
        c => c,
    };
    let rest = &pattern[open.len_utf8()..];
    let end = rest.rfind(close)?;
    let body = unescape_delimiter(&rest[..end], close);
    let mut builder = RegexBuilder::new(&body);
    for flag in rest[end + close.len_utf8()..].chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'u' => builder.unicode(true),
            'U' => builder.swap_greed(true),
            _ => return None,
        };
    }
    match builder.build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "invalid regex pattern");
            None
        }
    }
}

fn unescape_delimiter(body: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next) if next == delimiter && !is_regex_meta(next) => {
                    out.push(next);
                    chars.next();
                }
                Some(&next) => {
                    out.push(c);
                    out.push(next);
                    chars.next();
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_regex_meta(c: char) -> bool {
    regex::escape(&c.to_string()).len() > c.len_utf8()
}

// ─── Network ────────────────────────────────────────────────────────────────

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

const URL_PREFIXES: &[&str] = &["http://", "https://", "ftp://"];

fn parses_as<T: std::str::FromStr>(input: &RuleInput<'_>) -> bool {
    input.value().as_str().is_some_and(|s| s.parse::<T>().is_ok())
}

pub fn is_email(s: &str) -> bool {
    s.len() <= 254 && EMAIL_RE.is_match(s)
}

fn email_dns(input: &RuleInput<'_>) -> bool {
    let Some(address) = input.value().as_str().filter(|s| is_email(s)) else {
        return false;
    };
    match address.rsplit_once('@') {
        Some((_, domain)) => input.resolver.domain_exists(domain),
        None => false,
    }
}

fn url_host(s: &str) -> Option<String> {
    if !URL_PREFIXES.iter().any(|p| s.starts_with(p)) {
        return None;
    }
    let parsed = url::Url::parse(s).ok()?;
    parsed.host_str().map(str::to_string)
}

pub fn is_url(s: &str) -> bool {
    url_host(s).is_some()
}

fn url_active(input: &RuleInput<'_>) -> bool {
    input
        .value()
        .as_str()
        .and_then(url_host)
        .is_some_and(|host| input.resolver.host_exists(&host))
}

// ─── Dates ──────────────────────────────────────────────────────────────────

fn date(input: &RuleInput<'_>) -> bool {
    match input.value() {
        Value::DateTime(_) => true,
        Value::String(s) => parse_datetime(s).is_some(),
        _ => false,
    }
}

fn date_format(input: &RuleInput<'_>) -> bool {
    match (input.value().as_str(), input.param(0).and_then(Value::as_str)) {
        (Some(s), Some(format)) => matches_date_format(s, format),
        _ => false,
    }
}

fn compare_dates(input: &RuleInput<'_>) -> Option<Ordering> {
    let value = as_datetime(input.value())?;
    let bound = as_datetime(input.param(0)?)?;
    Some(value.cmp(&bound))
}

// ─── Credit cards ───────────────────────────────────────────────────────────

static CARD_ISSUERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("visa", r"^4[0-9]{12}(?:[0-9]{3})?$"),
        ("mastercard", r"^(5[1-5]|2[2-7])[0-9]{14}$"),
        ("amex", r"^3[47][0-9]{13}$"),
        ("dinersclub", r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$"),
        ("discover", r"^6(?:011|5[0-9]{2})[0-9]{12}$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

fn card_digits(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Int(i) if *i >= 0 => i.to_string(),
        Value::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f < 1e19 => format!("{:.0}", f),
        _ => return None,
    };
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Luhn checksum over a string of ASCII digits.
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

fn credit_card(input: &RuleInput<'_>) -> bool {
    let Some(digits) = card_digits(input.value()) else {
        return false;
    };
    if digits.len() < 13 || !luhn_valid(&digits) {
        return false;
    }

    let allowed: Vec<&str> = match (input.param(0), input.param(1)) {
        (None, _) => CARD_ISSUERS.iter().map(|(name, _)| *name).collect(),
        (Some(Value::List(names)), _) => names.iter().filter_map(Value::as_str).collect(),
        (Some(Value::String(name)), restriction) => {
            if let Some(Value::List(names)) = restriction
                && !names.iter().any(|n| n.as_str() == Some(name.as_str()))
            {
                return false;
            }
            vec![name.as_str()]
        }
        _ => return false,
    };

    CARD_ISSUERS
        .iter()
        .filter(|(name, _)| allowed.contains(name))
        .any(|(_, re)| re.is_match(&digits))
}

// ─── Types ──────────────────────────────────────────────────────────────────

fn instance_of(input: &RuleInput<'_>) -> bool {
    let value = input.value();
    match (value, input.param(0)) {
        (Value::DateTime(_), Some(Value::DateTime(_))) => true,
        (Value::Object(a), Some(Value::Object(b))) => a.same_type(b),
        (Value::DateTime(_), Some(Value::String(name))) => name == "DateTime",
        (Value::Object(instance), Some(Value::String(name))) => {
            name == instance.short_name() || name == instance.type_name()
        }
        _ => false,
    }
}
