//! The rule catalog: name → rule implementation + default message.
//!
//! A [`RuleCatalog`] is a plain value. Every [`Validator`](crate::Validator)
//! owns an `Arc` snapshot of one; session-scoped registrations clone it on
//! write. The process-wide catalog returned by [`RuleCatalog::shared`] is
//! itself an immutable snapshot swapped atomically by
//! [`RuleCatalog::register_shared`], so registering never affects sessions
//! that already exist.

use crate::builtins::PatternCache;
use crate::error::{ConfigError, RuleError};
use crate::network::HostResolver;
use crate::primitives::resolve_simple_path;
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Everything a rule sees when checking one resolved target.
pub struct RuleInput<'a> {
    /// Concrete path of the target.
    pub field: &'a str,
    /// The target's value, or `None` when it does not exist.
    pub value: Option<&'a Value>,
    /// Extra parameters of the binding, in declaration order.
    pub params: &'a [Value],
    /// The session's full (filtered) data.
    pub data: &'a Value,
    pub resolver: &'a dyn HostResolver,
    /// Regexes compiled so far in the current `validate()` call.
    pub patterns: &'a PatternCache,
}

impl<'a> RuleInput<'a> {
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// The target's value, `Null` when absent.
    pub fn value(&self) -> &'a Value {
        static NULL: Value = Value::Null;
        self.value.unwrap_or(&NULL)
    }

    pub fn param(&self, index: usize) -> Option<&'a Value> {
        self.params.get(index)
    }

    /// Resolves another field of the data by wildcard-free path.
    pub fn lookup(&self, path: &str) -> Option<&'a Value> {
        resolve_simple_path(path, self.data)
    }
}

/// A named check applied to one target at a time.
pub trait Rule: Send + Sync {
    /// Returns whether the target satisfies the rule. An `Err` counts as a
    /// failed check.
    fn evaluate(&self, input: &RuleInput<'_>) -> Result<bool, RuleError>;

    /// Whether the rule must run even when the target is absent or blank.
    fn checks_absent(&self) -> bool {
        false
    }

    /// Bindings with fewer parameters than this fail as misconfigured
    /// without the rule being called.
    fn min_params(&self) -> usize {
        0
    }

    /// Arguments substituted into the message's positional placeholders.
    fn message_params(&self, params: &[Value]) -> Vec<Value> {
        params.to_vec()
    }
}

/// Adapts an infallible closure into a [`Rule`].
pub struct FnRule<F>(pub F);

impl<F> Rule for FnRule<F>
where
    F: Fn(&RuleInput<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, input: &RuleInput<'_>) -> Result<bool, RuleError> {
        Ok((self.0)(input))
    }
}

/// Adapts a closure returning `Result<bool, RuleError>` into a [`Rule`].
pub struct FallibleFnRule<F>(pub F);

impl<F> Rule for FallibleFnRule<F>
where
    F: Fn(&RuleInput<'_>) -> Result<bool, RuleError> + Send + Sync,
{
    fn evaluate(&self, input: &RuleInput<'_>) -> Result<bool, RuleError> {
        (self.0)(input)
    }
}

/// A registered rule together with its default message template.
#[derive(Clone)]
pub struct RuleEntry {
    pub name: String,
    pub rule: Arc<dyn Rule>,
    pub message: String,
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Lookup table from rule name to [`RuleEntry`]. Registering a name that
/// already exists replaces the previous entry.
#[derive(Clone, Debug)]
pub struct RuleCatalog {
    entries: HashMap<String, RuleEntry>,
}

static SHARED: LazyLock<RwLock<Arc<RuleCatalog>>> =
    LazyLock::new(|| RwLock::new(Arc::new(RuleCatalog::new())));

impl RuleCatalog {
    /// A catalog holding every built-in rule.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        for builtin in crate::builtins::BUILTIN_RULES {
            catalog.register(builtin.name, *builtin, builtin.message);
        }
        catalog
    }

    /// A catalog with no rules at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, rule: impl Rule + 'static, message: &str) -> &mut Self {
        self.entries.insert(
            name.to_string(),
            RuleEntry {
                name: name.to_string(),
                rule: Arc::new(rule),
                message: message.to_string(),
            },
        );
        self
    }

    pub fn register_fn<F>(&mut self, name: &str, f: F, message: &str) -> &mut Self
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        self.register(name, FnRule(f), message)
    }

    pub fn register_fallible_fn<F>(&mut self, name: &str, f: F, message: &str) -> &mut Self
    where
        F: Fn(&RuleInput<'_>) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        self.register(name, FallibleFnRule(f), message)
    }

    pub fn lookup(&self, name: &str) -> Result<&RuleEntry, ConfigError> {
        self.entries.get(name).ok_or_else(|| ConfigError::UnknownRule {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Snapshot of the process-wide catalog.
    pub fn shared() -> Arc<RuleCatalog> {
        Arc::clone(&SHARED.read())
    }

    /// Adds or replaces a rule in the process-wide catalog. Sessions created
    /// afterwards see it; existing sessions keep their snapshot.
    pub fn register_shared(name: &str, rule: impl Rule + 'static, message: &str) {
        let mut guard = SHARED.write();
        let mut next = RuleCatalog::clone(&guard);
        next.register(name, rule, message);
        *guard = Arc::new(next);
        tracing::debug!(rule = name, "registered shared rule");
    }

    pub fn register_shared_fn<F>(name: &str, f: F, message: &str)
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        Self::register_shared(name, FnRule(f), message)
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}
