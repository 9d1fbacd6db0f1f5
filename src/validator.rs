//! The validation session.

use crate::binding::{Fields, RuleBinding, RuleSet, map_field_rules, map_fields_rules};
use crate::builtins::PatternCache;
use crate::config::Options;
use crate::error::{ConfigError, Diagnostic, DiagnosticSeverity, ErrorReport, RuleError};
use crate::message::{format_message, humanize, render_param};
use crate::network::{HostResolver, SystemResolver};
use crate::primitives::{filter_fields, is_empty, is_unset, resolve_selector};
use crate::registry::{Rule, RuleCatalog, RuleEntry, RuleInput};
use crate::value::{Map, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

const OPTIONAL: &str = "optional";
const REQUIRED: &str = "required";
const FALLBACK_MESSAGE: &str = "{field} Invalid";

/// Validates one data tree against an ordered list of rule bindings.
///
/// ```
/// use fieldcheck::Validator;
/// use serde_json::json;
///
/// let mut v = Validator::new(json!({"name": "", "age": 17}));
/// v.rule("required", "name");
/// v.rule_with("min", "age", fieldcheck::params![18]);
/// assert!(!v.validate());
/// assert_eq!(v.errors_for("name"), Some(&["Name is required".to_string()][..]));
/// assert_eq!(v.errors_for("age"), Some(&["Age must be at least 18".to_string()][..]));
/// ```
#[derive(Clone)]
pub struct Validator {
    data: Value,
    catalog: Arc<RuleCatalog>,
    bindings: Arc<Vec<RuleBinding>>,
    labels: IndexMap<String, String>,
    errors: ErrorReport,
    diagnostics: Vec<Diagnostic>,
    options: Options,
    resolver: Option<Arc<dyn HostResolver>>,
}

/// Sets evaluated once per `validate()` call.
struct Markers<'a> {
    optional: HashSet<&'a str>,
    required: HashSet<&'a str>,
}

impl Markers<'_> {
    fn is_optional(&self, selector: &str) -> bool {
        let top = selector.split('.').next().unwrap_or(selector);
        self.optional.contains(selector) || self.optional.contains(top)
    }
}

/// Failures and diagnostics produced by one binding.
#[derive(Default)]
struct Outcome {
    failures: Vec<(String, String)>,
    diagnostics: Vec<Diagnostic>,
}

impl Validator {
    /// A session over `data` using the current process-wide catalog.
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: data.into(),
            catalog: RuleCatalog::shared(),
            bindings: Arc::new(Vec::new()),
            labels: IndexMap::new(),
            errors: ErrorReport::new(),
            diagnostics: Vec::new(),
            options: Options::default(),
            resolver: None,
        }
    }

    /// A session that only keeps the listed top-level keys of `data`. Rules
    /// targeting other keys see them as absent. An empty list keeps
    /// everything.
    pub fn with_fields<S: AsRef<str>>(data: impl Into<Value>, fields: &[S]) -> Self {
        if fields.is_empty() {
            return Self::new(data);
        }
        let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();
        Self::new(filter_fields(data.into(), &fields))
    }

    /// Replaces the rule catalog this session looks rules up in.
    pub fn with_catalog(mut self, catalog: impl Into<Arc<RuleCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replaces the host resolver used by `emailDNS` and `urlActive`.
    pub fn with_resolver(mut self, resolver: impl HostResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    // ─── Configuration ──────────────────────────────────────────────────────

    /// Attaches `name` to `fields` with no extra parameters.
    pub fn rule(&mut self, name: &str, fields: impl Into<Fields>) -> BindingHandle<'_> {
        self.rule_with(name, fields, Vec::new())
    }

    /// Attaches `name` to `fields` with the given parameters.
    pub fn rule_with(&mut self, name: &str, fields: impl Into<Fields>, params: Vec<Value>) -> BindingHandle<'_> {
        self.push_binding(RuleBinding::new(name, fields, params))
    }

    /// Attaches a prepared binding.
    pub fn push_binding(&mut self, binding: RuleBinding) -> BindingHandle<'_> {
        let bindings = Arc::make_mut(&mut self.bindings);
        bindings.push(binding);
        let index = bindings.len() - 1;
        BindingHandle { validator: self, index }
    }

    /// Attaches every binding of a bulk rule set, in order.
    pub fn rules(&mut self, rules: &RuleSet) -> &mut Self {
        Arc::make_mut(&mut self.bindings).extend(rules.bindings().iter().cloned());
        self
    }

    /// Attaches rules listed for a single field (see [`map_field_rules`]).
    pub fn map_field_rules(&mut self, field: &str, rules: &[Value]) -> &mut Self {
        self.rules(&map_field_rules(field, rules))
    }

    /// Attaches rules from a `{field: [rules]}` map (see [`map_fields_rules`]).
    pub fn map_fields_rules(&mut self, rules: &Map) -> &mut Self {
        self.rules(&map_fields_rules(rules))
    }

    pub fn bindings(&self) -> &[RuleBinding] {
        &self.bindings
    }

    /// Registers labels for field keys, used wherever no binding label is set.
    pub fn labels<I, K, V>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn label_for(&mut self, field: &str, label: &str) -> &mut Self {
        self.labels.insert(field.to_string(), label.to_string());
        self
    }

    /// Registers a rule for this session only. The session's catalog is
    /// copied on first write; other sessions are unaffected.
    pub fn add_rule<F>(&mut self, name: &str, rule: F, message: &str) -> &mut Self
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.catalog).register_fn(name, rule, message);
        self
    }

    /// Like [`add_rule`](Self::add_rule) for rules that can fail outright.
    pub fn add_fallible_rule<F>(&mut self, name: &str, rule: F, message: &str) -> &mut Self
    where
        F: Fn(&RuleInput<'_>) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.catalog).register_fallible_fn(name, rule, message);
        self
    }

    /// Registers any [`Rule`] implementation for this session only.
    pub fn add_rule_impl(&mut self, name: &str, rule: impl Rule + 'static, message: &str) -> &mut Self {
        Arc::make_mut(&mut self.catalog).register(name, rule, message);
        self
    }

    // ─── Evaluation ─────────────────────────────────────────────────────────

    /// Evaluates every binding against the data, replacing any previous
    /// errors. Returns true when no error was recorded.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        self.diagnostics.clear();

        let bindings = Arc::clone(&self.bindings);
        let markers = Markers {
            optional: marked(&bindings, OPTIONAL),
            required: marked(&bindings, REQUIRED),
        };
        let resolver = self.resolver();
        let patterns = PatternCache::default();

        for binding in bindings.iter().filter(|b| b.rule != OPTIONAL) {
            let outcome = self.check_binding(binding, &markers, resolver.as_ref(), &patterns);
            let failed = !outcome.failures.is_empty();
            for (field, message) in outcome.failures {
                self.errors.push(field, message);
            }
            self.diagnostics.extend(outcome.diagnostics);
            if failed && self.options.stop_on_first_fail {
                tracing::debug!(rule = %binding.rule, "stopping after first failed binding");
                break;
            }
        }

        let passed = self.errors.is_empty();
        tracing::debug!(
            bindings = bindings.len(),
            passed,
            errors = self.errors.len(),
            "validation finished"
        );
        passed
    }

    fn resolver(&self) -> Arc<dyn HostResolver> {
        match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(SystemResolver::new(self.options.dns_timeout())),
        }
    }

    fn check_binding(
        &self,
        binding: &RuleBinding,
        markers: &Markers<'_>,
        resolver: &dyn HostResolver,
        patterns: &PatternCache,
    ) -> Outcome {
        if let Some(defect) = &binding.defect {
            return self.config_failure(binding, defect);
        }
        let entry = match self.catalog.lookup(&binding.rule) {
            Ok(entry) => entry,
            Err(error) => return self.config_failure(binding, &error),
        };
        let expected = entry.rule.min_params();
        if binding.params.len() < expected {
            let error = ConfigError::MalformedEntry {
                rule: binding.rule.clone(),
                reason: format!("expected at least {expected} parameter(s), found {}", binding.params.len()),
            };
            return self.config_failure(binding, &error);
        }

        let mut outcome = Outcome::default();
        let checks_absent = entry.rule.checks_absent();

        for selector in &binding.fields {
            let optional = binding.rule != REQUIRED && markers.is_optional(selector);
            let required = markers.required.contains(selector.as_str());

            for target in resolve_selector(selector, &self.data) {
                if optional && target.value.is_none_or(is_empty) {
                    tracing::trace!(rule = %binding.rule, path = %target.path, "skipped optional target");
                    continue;
                }
                if !checks_absent && !required && is_unset(target.value) {
                    tracing::trace!(rule = %binding.rule, path = %target.path, "skipped unset target");
                    continue;
                }

                let input = RuleInput {
                    field: &target.path,
                    value: target.value,
                    params: &binding.params,
                    data: &self.data,
                    resolver,
                    patterns,
                };
                let passed = match entry.rule.evaluate(&input) {
                    Ok(passed) => passed,
                    Err(error) => {
                        tracing::warn!(
                            rule = %binding.rule,
                            path = %target.path,
                            error = %error,
                            "rule raised an error"
                        );
                        let failure = ConfigError::RuleFailed {
                            rule: binding.rule.clone(),
                            message: error.message,
                        };
                        outcome
                            .diagnostics
                            .push(Diagnostic::from_config(&failure, Some(&target.path)));
                        false
                    }
                };
                tracing::trace!(rule = %binding.rule, path = %target.path, passed, "evaluated target");

                if !passed {
                    let message = self.binding_message(binding, entry, &target.path, selector);
                    outcome.failures.push((target.path, message));
                }
            }
        }
        outcome
    }

    /// Fails every declared selector of a binding that cannot be evaluated.
    fn config_failure(&self, binding: &RuleBinding, error: &ConfigError) -> Outcome {
        tracing::warn!(rule = %binding.rule, error = %error, "rule binding cannot be evaluated");
        let keys: Vec<&str> = if binding.fields.is_empty() {
            vec![binding.rule.as_str()]
        } else {
            binding.fields.iter().map(String::as_str).collect()
        };
        let template = binding.message.as_deref().unwrap_or(FALLBACK_MESSAGE);

        let mut outcome = Outcome::default();
        for key in keys {
            let label = self.label(binding.label.as_deref(), key, key);
            let message = format_message(template, label.as_deref(), &[]);
            outcome.failures.push((key.to_string(), message));
            outcome.diagnostics.push(Diagnostic::from_config(error, Some(key)));
        }
        outcome
    }

    fn binding_message(&self, binding: &RuleBinding, entry: &RuleEntry, path: &str, selector: &str) -> String {
        let template = binding.message.as_deref().unwrap_or(&entry.message);
        let label = self.label(binding.label.as_deref(), path, selector);
        let args = self.render_args(&entry.rule.message_params(&binding.params));
        format_message(template, label.as_deref(), &args)
    }

    /// Label substituted for `{field}`, or `None` when labels are disabled.
    fn label(&self, explicit: Option<&str>, path: &str, selector: &str) -> Option<String> {
        if !self.options.prepend_labels {
            return None;
        }
        let label = explicit
            .or_else(|| self.labels.get(path).map(String::as_str))
            .or_else(|| self.labels.get(selector).map(String::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| humanize(path));
        Some(label)
    }

    fn render_args(&self, params: &[Value]) -> Vec<String> {
        params.iter().map(|p| render_param(p, &self.labels)).collect()
    }

    // ─── Results ────────────────────────────────────────────────────────────

    pub fn errors(&self) -> &ErrorReport {
        &self.errors
    }

    /// Messages recorded for one field key, `None` when it has none.
    pub fn errors_for(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field)
    }

    /// Records an error directly, bypassing rule dispatch. `message` is a
    /// template like those of rules: `{field}` and `%s`/`%d` placeholders are
    /// filled from the field's label and `params`.
    pub fn error(&mut self, field: &str, message: &str, params: &[Value]) -> &mut Self {
        let label = self.label(None, field, field);
        let args = self.render_args(params);
        let message = format_message(message, label.as_deref(), &args);
        self.errors.push(field, message);
        self
    }

    /// Configuration problems met during the last `validate()` call.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when the last `validate()` call met no error-level diagnostic.
    pub fn is_well_configured(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// A session with the same bindings, labels, catalog and options over new
    /// data. Errors are not carried over.
    pub fn with_data(&self, data: impl Into<Value>) -> Validator {
        Validator {
            data: data.into(),
            catalog: Arc::clone(&self.catalog),
            bindings: Arc::clone(&self.bindings),
            labels: self.labels.clone(),
            errors: ErrorReport::new(),
            diagnostics: Vec::new(),
            options: self.options.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

fn marked<'a>(bindings: &'a [RuleBinding], rule: &str) -> HashSet<&'a str> {
    bindings
        .iter()
        .filter(|b| b.rule == rule && b.defect.is_none())
        .flat_map(|b| b.fields.iter().map(String::as_str))
        .collect()
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("data", &self.data)
            .field("bindings", &self.bindings)
            .field("labels", &self.labels)
            .field("errors", &self.errors)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Returned by [`Validator::rule`]; adjusts the binding just attached.
pub struct BindingHandle<'a> {
    validator: &'a mut Validator,
    index: usize,
}

impl<'a> BindingHandle<'a> {
    fn binding(&mut self) -> &mut RuleBinding {
        &mut Arc::make_mut(&mut self.validator.bindings)[self.index]
    }

    /// Replaces the binding's message template.
    pub fn message(mut self, message: &str) -> Self {
        self.binding().message = Some(message.to_string());
        self
    }

    /// Sets the label used for `{field}` in this binding's messages.
    pub fn label(mut self, label: &str) -> Self {
        self.binding().label = Some(label.to_string());
        self
    }

    /// Attaches another rule to the same session.
    pub fn rule(self, name: &str, fields: impl Into<Fields>) -> BindingHandle<'a> {
        let validator = self.validator;
        validator.rule(name, fields)
    }

    pub fn rule_with(self, name: &str, fields: impl Into<Fields>, params: Vec<Value>) -> BindingHandle<'a> {
        let validator = self.validator;
        validator.rule_with(name, fields, params)
    }
}
