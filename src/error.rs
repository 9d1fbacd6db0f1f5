use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A structured note about the validator's own configuration, produced
/// alongside (never instead of) the ordinary error report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn from_config(error: &ConfigError, path: Option<&str>) -> Self {
        Diagnostic {
            severity: DiagnosticSeverity::Error,
            code: error.code().to_string(),
            path: path.map(str::to_string),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at {}: {}", self.code, path, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Caller misuse: unknown rules, malformed rule sets, unreadable options.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    #[error("malformed entry for rule '{rule}': {reason}")]
    MalformedEntry { rule: String, reason: String },

    #[error("rule '{rule}' raised an error: {message}")]
    RuleFailed { rule: String, message: String },

    #[error("invalid rule set: {0}")]
    InvalidRuleSet(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ConfigError {
    /// Stable diagnostic code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::UnknownRule { .. } => "C-001",
            ConfigError::MalformedEntry { .. } => "C-002",
            ConfigError::RuleFailed { .. } => "C-003",
            ConfigError::InvalidRuleSet(_) => "C-004",
            ConfigError::InvalidOptions(_) => "C-005",
        }
    }
}

/// Error returned by fallible user rules. Evaluation treats it as a failed
/// check.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validation failures grouped by field key, in the order fields first
/// failed. Each field keeps its messages in the order they were produced;
/// duplicates are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorReport {
    fields: IndexMap<String, Vec<String>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Messages recorded for one field key, or `None` when it has none.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All messages, flattened in report order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.fields.values().flatten().map(String::as_str)
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.fields
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, messages) in &self.fields {
            for message in messages {
                writeln!(f, "{}: {}", field, message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}
