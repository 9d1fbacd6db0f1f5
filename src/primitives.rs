//! Shared primitives used by the session and the built-in rules: selector
//! resolution, the "empty" and equality predicates, and the numeric and
//! date coercions.

use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Selector segment that fans out over every entry of a container.
pub const WILDCARD: &str = "*";

// ─── Selector resolution ────────────────────────────────────────────────────

/// One concrete location denoted by a selector.
#[derive(Clone, Debug, PartialEq)]
pub struct Target<'a> {
    /// Concrete dotted path, wildcards replaced by the matched keys.
    pub path: String,
    /// The value at `path`, or `None` when the path does not exist.
    pub value: Option<&'a Value>,
}

impl<'a> Target<'a> {
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    fn missing(path: String) -> Self {
        Target { path, value: None }
    }
}

/// Resolves a dotted selector, optionally containing `*` segments, against a
/// value tree.
///
/// A selector without wildcards always yields exactly one target. Each
/// wildcard yields one branch per entry of the container it meets (in
/// natural order), none for an empty container, and a single missing target
/// when it meets a scalar. A literal segment that does not exist ends its
/// branch with a missing target whose path is the concrete prefix followed by
/// the unresolved remainder of the selector.
pub fn resolve_selector<'a>(selector: &str, data: &'a Value) -> Vec<Target<'a>> {
    let segments: Vec<&str> = selector.split('.').collect();
    let mut out = Vec::new();
    walk(&segments, 0, data, String::new(), &mut out);
    out
}

fn walk<'a>(
    segments: &[&str],
    index: usize,
    current: &'a Value,
    prefix: String,
    out: &mut Vec<Target<'a>>,
) {
    let Some(segment) = segments.get(index) else {
        out.push(Target {
            path: prefix,
            value: Some(current),
        });
        return;
    };

    if *segment == WILDCARD {
        if !current.is_container() {
            out.push(Target::missing(missing_path(&prefix, index, &segments[index..])));
            return;
        }
        for (key, child) in current.entries() {
            walk(segments, index + 1, child, child_path(&prefix, index, &key), out);
        }
        return;
    }

    match current.child(segment) {
        Some(child) => walk(segments, index + 1, child, child_path(&prefix, index, segment), out),
        None => out.push(Target::missing(missing_path(&prefix, index, &segments[index..]))),
    }
}

fn child_path(prefix: &str, index: usize, segment: &str) -> String {
    if index == 0 {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn missing_path(prefix: &str, index: usize, rest: &[&str]) -> String {
    child_path(prefix, index, &rest.join("."))
}

/// Resolves a wildcard-free dotted path. Returns `None` if any segment is
/// missing.
pub fn resolve_simple_path<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.child(segment)?;
    }
    Some(current)
}

/// Keeps only the listed top-level keys of a map, preserving data order.
/// Non-map data is returned unchanged.
pub fn filter_fields(data: Value, fields: &[String]) -> Value {
    match data {
        Value::Map(map) => Value::Map(
            map.into_iter()
                .filter(|(k, _)| fields.iter().any(|f| f == k))
                .collect(),
        ),
        other => other,
    }
}

// ─── Emptiness and truthiness ───────────────────────────────────────────────

/// `null`, `""`, or an empty list/map. `0`, `false` and `"0"` are not empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        _ => false,
    }
}

/// Absent, `null` or `""`: values the non-presence rules have nothing to
/// check on.
pub fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::List(items) => !items.is_empty(),
        Value::Map(map) => !map.is_empty(),
        Value::DateTime(_) | Value::Object(_) => true,
    }
}

// ─── Equality ───────────────────────────────────────────────────────────────

/// Type-coercing equality (`0 == "0" == false`).
///
/// * a bool compares against the other side's truthiness;
/// * `null` against a string compares with `""`, against anything else it
///   equals every non-truthy value;
/// * numbers and numeric strings compare numerically, a number against a
///   non-numeric string compares by string form;
/// * lists compare element-wise and maps key-wise, both loosely;
/// * date-times compare by instant, objects by identity.
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Null, Null) => true,
        (Bool(x), other) | (other, Bool(x)) => *x == truthy(other),
        (Null, String(s)) | (String(s), Null) => s.is_empty(),
        (Null, other) | (other, Null) => !truthy(other),
        (Int(x), Int(y)) => x == y,
        (Int(_) | Float(_), Int(_) | Float(_)) => as_f64(a) == as_f64(b),
        (Int(_) | Float(_), String(s)) | (String(s), Int(_) | Float(_)) => {
            let number = if matches!(a, String(_)) { b } else { a };
            if is_numeric_str(s) {
                as_f64(number) == parse_f64(s)
            } else {
                scalar_string(number).as_deref() == Some(s.as_str())
            }
        }
        (String(x), String(y)) => {
            if is_numeric_str(x) && is_numeric_str(y) {
                parse_f64(x) == parse_f64(y)
            } else {
                x == y
            }
        }
        (List(x), List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| loose_equals(a, b))
        }
        (Map(x), Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| loose_equals(v, w)))
        }
        (DateTime(x), DateTime(y)) => x == y,
        (Object(x), Object(y)) => x == y,
        _ => false,
    }
}

/// Equality that also requires both sides to have the same type.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    a == b
}

/// Compares the scalar string forms of two values: `null` and `false` render
/// as `""`, `true` as `"1"`. Containers never match.
pub fn string_form_equals(a: &Value, b: &Value) -> bool {
    match (scalar_string(a), scalar_string(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Natural string form of a scalar. Containers, date-times and objects have
/// none.
pub fn scalar_string(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => Some(Cow::Borrowed("")),
        Value::Bool(true) => Some(Cow::Borrowed("1")),
        Value::Bool(false) => Some(Cow::Borrowed("")),
        Value::Int(i) => Some(Cow::Owned(i.to_string())),
        Value::Float(f) => Some(Cow::Owned(format_float(*f))),
        Value::String(s) => Some(Cow::Borrowed(s)),
        _ => None,
    }
}

/// Text of a string or number; the input accepted by the character-class
/// rules.
pub fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Int(_) | Value::Float(_) => scalar_string(value),
        _ => None,
    }
}

pub fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

// ─── Numbers ────────────────────────────────────────────────────────────────

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").unwrap()
});

pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC_RE.is_match(s)
}

/// Integers, finite floats, and numeric strings.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Int(_) => true,
        Value::Float(f) => f.is_finite(),
        Value::String(s) => is_numeric_str(s),
        _ => false,
    }
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Numeric reading of an integer, float or numeric string.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::String(s) if is_numeric_str(s) => parse_f64(s),
        _ => None,
    }
}

/// Orders two numeric values. Returns `None` when either side is not
/// numeric.
///
/// With the `decimal` feature both sides are compared as decimals truncated
/// to 14 fractional digits, floats first rounded to 14 significant digits,
/// so `1 - 0.81` compares equal to `0.19`. Values that do not fit a decimal
/// fall back to `f64` comparison.
pub fn compare_numeric(a: &Value, b: &Value) -> Option<Ordering> {
    if !is_numeric(a) || !is_numeric(b) {
        return None;
    }
    #[cfg(feature = "decimal")]
    if let (Some(x), Some(y)) = (decimal::to_decimal(a), decimal::to_decimal(b)) {
        return Some(x.cmp(&y));
    }
    as_f64(a)?.partial_cmp(&as_f64(b)?)
}

#[cfg(feature = "decimal")]
mod decimal {
    use crate::value::Value;
    use rust_decimal::{Decimal, RoundingStrategy};
    use std::str::FromStr;

    const SCALE: u32 = 14;

    pub(super) fn to_decimal(value: &Value) -> Option<Decimal> {
        let raw = match value {
            Value::Int(i) => Decimal::from(*i),
            Value::Float(f) => Decimal::from_scientific(&format!("{:.13e}", f)).ok()?,
            Value::String(s) => {
                let s = s.trim();
                if s.contains(['e', 'E']) {
                    Decimal::from_scientific(s).ok()?
                } else {
                    Decimal::from_str(s).ok()?
                }
            }
            _ => return None,
        };
        Some(raw.round_dp_with_strategy(SCALE, RoundingStrategy::ToZero))
    }
}

// ─── Dates ──────────────────────────────────────────────────────────────────

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%A, %d %B %Y",
];

/// Parses a date or date-time written in one of the common textual forms.
/// Naive values are taken as UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<FixedOffset>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    let today = Utc::now().date_naive();
    let keyword_date = match s.to_ascii_lowercase().as_str() {
        "now" => return Some(Utc::now().fixed_offset()),
        "today" | "midnight" => Some(today),
        "tomorrow" => today.succ_opt(),
        "yesterday" => today.pred_opt(),
        _ => None,
    };
    if let Some(date) = keyword_date {
        return Some(midnight_utc(date));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().fixed_offset());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(midnight_utc(date));
        }
    }
    None
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// Date-time reading of a value: a date-time as is, a string through
/// [`parse_datetime`].
pub fn as_datetime(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::String(s) => parse_datetime(s),
        _ => None,
    }
}

/// Translates a classic date-format string (`Y-m-d H:i:s`) into a chrono
/// strftime pattern. Returns `None` for letters with no strict equivalent.
pub fn translate_date_format(format: &str) -> Option<String> {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        let piece = match c {
            'Y' => "%Y",
            'y' => "%y",
            'm' | 'n' => "%m",
            'd' | 'j' => "%d",
            'H' | 'G' => "%H",
            'h' | 'g' => "%I",
            'i' => "%M",
            's' => "%S",
            'A' | 'a' => "%p",
            'D' => "%a",
            'l' => "%A",
            'M' => "%b",
            'F' => "%B",
            'U' => "%s",
            'O' => "%z",
            'P' => "%:z",
            'T' => "%Z",
            '%' => "%%",
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, escaped);
                }
                continue;
            }
            c if c.is_ascii_alphabetic() => return None,
            c => {
                push_literal(&mut out, c);
                continue;
            }
        };
        out.push_str(piece);
    }
    Some(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// True when `input` matches the classic date `format` exactly and denotes a
/// real calendar date/time.
pub fn matches_date_format(input: &str, format: &str) -> bool {
    let Some(pattern) = translate_date_format(format) else {
        return false;
    };
    DateTime::parse_from_str(input, &pattern).is_ok()
        || NaiveDateTime::parse_from_str(input, &pattern).is_ok()
        || NaiveDate::parse_from_str(input, &pattern).is_ok()
        || NaiveTime::parse_from_str(input, &pattern).is_ok()
}
