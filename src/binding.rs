//! Rule bindings and the bulk rule-set syntaxes.
//!
//! The rule-centric bulk form maps each rule name to its entries:
//!
//! ```yaml
//! required: [name, email]          # bare selectors
//! length:
//!   - [[first, last], 5]           # selector list, then parameters
//!   - [nick, 3]
//! accepted: terms                  # a single bare selector
//! ```
//!
//! The field-centric form ([`map_field_rules`]) maps one field to a list of
//! rules, each either a bare rule name or `[rule, params...]`.

use crate::error::ConfigError;
use crate::value::{Map, Value};

/// One configured check: a rule applied to one or more selectors.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleBinding {
    pub rule: String,
    pub fields: Vec<String>,
    pub params: Vec<Value>,
    pub message: Option<String>,
    pub label: Option<String>,
    pub(crate) defect: Option<ConfigError>,
}

impl RuleBinding {
    pub fn new(rule: impl Into<String>, fields: impl Into<Fields>, params: Vec<Value>) -> Self {
        Self {
            rule: rule.into(),
            fields: fields.into().0,
            params,
            message: None,
            label: None,
            defect: None,
        }
    }

    /// A binding that always fails because its bulk entry could not be read.
    pub(crate) fn malformed(rule: &str, fields: Vec<String>, reason: impl Into<String>) -> Self {
        Self {
            defect: Some(ConfigError::MalformedEntry {
                rule: rule.to_string(),
                reason: reason.into(),
            }),
            ..Self::new(rule, Fields(fields), Vec::new())
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The configuration problem recorded when this binding was parsed.
    pub fn defect(&self) -> Option<&ConfigError> {
        self.defect.as_ref()
    }
}

/// The selector(s) a binding targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(pub Vec<String>);

impl From<&str> for Fields {
    fn from(s: &str) -> Self {
        Fields(vec![s.to_string()])
    }
}

impl From<String> for Fields {
    fn from(s: String) -> Self {
        Fields(vec![s])
    }
}

impl From<&String> for Fields {
    fn from(s: &String) -> Self {
        Fields(vec![s.clone()])
    }
}

impl From<Vec<String>> for Fields {
    fn from(v: Vec<String>) -> Self {
        Fields(v)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(v: Vec<&str>) -> Self {
        Fields(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Fields {
    fn from(v: &[&str]) -> Self {
        Fields(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(v: [&str; N]) -> Self {
        Fields(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Builds a `Vec<Value>` of rule parameters.
///
/// ```
/// use fieldcheck::{params, Value};
/// let p = params![5, "x", vec!["a", "b"]];
/// assert_eq!(p[0], Value::Int(5));
/// ```
#[macro_export]
macro_rules! params {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($p:expr),+ $(,)?) => { vec![$($crate::Value::from($p)),+] };
}

// ─── Rule-centric bulk form ─────────────────────────────────────────────────

/// An ordered list of bindings built from one of the bulk syntaxes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    bindings: Vec<RuleBinding>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a binding.
    pub fn add(mut self, binding: RuleBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Expands a `{rule: entries}` map. Entries that cannot be read become
    /// bindings that fail when evaluated.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let Value::Map(rules) = value else {
            return Err(ConfigError::InvalidRuleSet(format!(
                "expected a mapping of rule names, found {}",
                value.type_name()
            )));
        };
        let mut set = RuleSet::new();
        for (rule, declared) in rules {
            expand_rule(rule, declared, &mut set.bindings);
        }
        Ok(set)
    }

    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_saphyr::from_str(input).map_err(|e| ConfigError::InvalidRuleSet(e.to_string()))?;
        Self::from_value(&Value::from(value))
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| ConfigError::InvalidRuleSet(e.to_string()))?;
        Self::from_value(&Value::from(value))
    }

    pub fn bindings(&self) -> &[RuleBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_bindings(self) -> Vec<RuleBinding> {
        self.bindings
    }
}

impl IntoIterator for RuleSet {
    type Item = RuleBinding;
    type IntoIter = std::vec::IntoIter<RuleBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

impl FromIterator<RuleBinding> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleBinding>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

fn expand_rule(rule: &str, declared: &Value, out: &mut Vec<RuleBinding>) {
    match declared {
        Value::String(field) => out.push(RuleBinding::new(rule, field, Vec::new())),
        Value::List(entries) if !entries.is_empty() => {
            for entry in entries {
                out.push(expand_entry(rule, entry));
            }
        }
        other => out.push(RuleBinding::malformed(
            rule,
            Vec::new(),
            format!("expected a selector or a list of entries, found {}", other.type_name()),
        )),
    }
}

fn expand_entry(rule: &str, entry: &Value) -> RuleBinding {
    match entry {
        Value::String(field) => RuleBinding::new(rule, field, Vec::new()),
        Value::List(tuple) => match tuple.split_first() {
            Some((selector, params)) => match selectors(selector) {
                Some(fields) => RuleBinding::new(rule, fields, params.to_vec()),
                None => RuleBinding::malformed(
                    rule,
                    Vec::new(),
                    format!("selector must be a string or list of strings, found {}", selector.type_name()),
                ),
            },
            None => RuleBinding::malformed(rule, Vec::new(), "empty entry"),
        },
        other => RuleBinding::malformed(
            rule,
            Vec::new(),
            format!("entry must be a selector or a list, found {}", other.type_name()),
        ),
    }
}

fn selectors(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::List(items) if !items.is_empty() => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

// ─── Field-centric form ─────────────────────────────────────────────────────

/// Expands the rules listed for one field. Each rule is a bare name or a
/// list `[name, params...]`.
pub fn map_field_rules(field: &str, rules: &[Value]) -> RuleSet {
    rules
        .iter()
        .map(|entry| match entry {
            Value::String(rule) => RuleBinding::new(rule, field, Vec::new()),
            Value::List(items) => match items.split_first() {
                Some((Value::String(rule), params)) => RuleBinding::new(rule, field, params.to_vec()),
                _ => RuleBinding::malformed("", vec![field.to_string()], "rule name must be a string"),
            },
            other => RuleBinding::malformed(
                "",
                vec![field.to_string()],
                format!("rule must be a name or a list, found {}", other.type_name()),
            ),
        })
        .collect()
}

/// [`map_field_rules`] for every `field: [rules]` entry of a map.
pub fn map_fields_rules(rules: &Map) -> RuleSet {
    rules
        .iter()
        .flat_map(|(field, declared)| {
            let list = match declared {
                Value::List(items) => items.clone(),
                other => vec![other.clone()],
            };
            map_field_rules(field, &list)
        })
        .collect()
}
