//! Error-message synthesis: label lookup and placeholder substitution.

use crate::primitives::{format_float, scalar_string};
use crate::value::Value;
use indexmap::IndexMap;

/// Human-readable form of a field path: `_` and `.` become spaces and each
/// word starts with a capital letter (`user_name` → `User Name`).
pub fn humanize(path: &str) -> String {
    path.replace(['_', '.'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders one message argument in its natural string form.
///
/// A string naming a field that has a registered label renders as that
/// label, so `equals(password, confirm)` reads "must be the same as
/// 'Confirm Password'".
pub fn render_param(value: &Value, labels: &IndexMap<String, String>) -> String {
    match value {
        Value::String(s) => labels.get(s).cloned().unwrap_or_else(|| s.clone()),
        Value::Bool(b) => b.to_string(),
        Value::Float(f) => format_float(*f),
        Value::List(_) | Value::Map(_) => {
            let items: Vec<String> = value
                .elements()
                .into_iter()
                .map(|v| render_param(v, labels))
                .collect();
            format!("['{}']", items.join("', '"))
        }
        Value::DateTime(dt) => dt.format("%Y-%m-%d").to_string(),
        Value::Object(instance) => instance.short_name().to_string(),
        other => scalar_string(other).map(|s| s.into_owned()).unwrap_or_default(),
    }
}

/// Expands a message template.
///
/// * `{field}` becomes `label`; when `label` is `None` the placeholder and
///   the whitespace after it are dropped.
/// * `{fieldN}` (N ≥ 1) becomes the N-th argument.
/// * `%s` and `%d` consume the next argument in order, `%N$s`/`%N$d` take the
///   N-th one; `%d` renders the integer part of a numeric argument and `0`
///   otherwise. `%%` is a literal percent sign.
///
/// Missing arguments render as the empty string.
pub fn format_message(template: &str, label: Option<&str>, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut next_arg = 0usize;
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '%']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(after) = rest.strip_prefix("{field") {
            let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
            if let Some(tail) = after[digits.len()..].strip_prefix('}') {
                if digits.is_empty() {
                    match label {
                        Some(label) => out.push_str(label),
                        None => {
                            rest = tail.trim_start();
                            continue;
                        }
                    }
                } else if let Ok(n) = digits.parse::<usize>() {
                    out.push_str(n.checked_sub(1).and_then(|i| args.get(i)).map_or("", String::as_str));
                }
                rest = tail;
                continue;
            }
            out.push('{');
            rest = &rest[1..];
            continue;
        }

        if let Some(after) = rest.strip_prefix('%') {
            if let Some(tail) = after.strip_prefix('%') {
                out.push('%');
                rest = tail;
                continue;
            }
            let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
            let (index, conv_at) = match after[digits.len()..].strip_prefix('$') {
                Some(_) if !digits.is_empty() => (digits.parse::<usize>().ok().and_then(|n| n.checked_sub(1)), digits.len() + 1),
                _ => (None, 0),
            };
            let conversion = after[conv_at..].chars().next();
            if let Some(kind @ ('s' | 'd')) = conversion {
                let index = match index {
                    Some(i) => Some(i),
                    None if conv_at == 0 => {
                        next_arg += 1;
                        Some(next_arg - 1)
                    }
                    None => None,
                };
                let arg = index.and_then(|i| args.get(i)).map_or("", String::as_str);
                if kind == 'd' {
                    out.push_str(&integer_part(arg));
                } else {
                    out.push_str(arg);
                }
                rest = &after[conv_at + 1..];
                continue;
            }
        }

        out.push_str(&rest[..1]);
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

fn integer_part(arg: &str) -> String {
    match arg.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => format!("{}", n.trunc() as i64),
        _ => "0".to_string(),
    }
}
