//! Declarative, rule-based validation for nested, loosely typed data.
//!
//! Rules are bound to dotted field selectors (`user.email`, `items.*.qty`)
//! and evaluated against a [`Value`] tree. Failures are collected per field
//! into an [`ErrorReport`] with human-readable messages:
//!
//! ```text
//! data + bindings → Validator::validate() → bool + ErrorReport
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use fieldcheck::{params, Validator};
//! use serde_json::json;
//!
//! let data = json!({
//!     "email": "not-an-email",
//!     "items": [{"qty": 2}, {"qty": 0}],
//! });
//!
//! let mut v = Validator::new(data);
//! v.rule("required", ["email", "items"]);
//! v.rule("email", "email");
//! v.rule_with("min", "items.*.qty", params![1]).label("Quantity");
//!
//! assert!(!v.validate());
//! assert_eq!(
//!     v.errors_for("email").unwrap(),
//!     ["Email is not a valid email address"]
//! );
//! assert_eq!(v.errors_for("items.1.qty").unwrap(), ["Quantity must be at least 1"]);
//! ```
//!
//! Rule sets can also be loaded in bulk:
//!
//! ```rust
//! let rules = fieldcheck::RuleSet::from_yaml(r#"
//! required: [name]
//! lengthBetween:
//!   - [name, 2, 20]
//! "#).expect("valid rule set");
//!
//! let data = serde_json::json!({"name": "Al"});
//! assert!(fieldcheck::check(data, &rules).is_ok());
//! ```
//!
//! # Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `decimal` | yes     | Decimal comparison for `min`/`max`/`between` via [`rust_decimal`]. |

pub mod binding;
pub mod builtins;
pub mod config;
pub mod error;
pub mod message;
pub mod network;
pub mod primitives;
pub mod registry;
pub mod validator;
pub mod value;

pub use binding::{Fields, RuleBinding, RuleSet, map_field_rules, map_fields_rules};
pub use config::Options;
pub use error::*;
pub use network::{HostResolver, StaticResolver, SystemResolver};
pub use registry::{Rule, RuleCatalog, RuleEntry, RuleInput};
pub use validator::{BindingHandle, Validator};
pub use value::{Instance, Map, Value};

/// Validates `data` against a rule set in one call.
///
/// # Errors
///
/// Returns the full [`ErrorReport`] when any rule fails.
///
/// # Example
///
/// ```rust
/// use fieldcheck::{RuleSet, RuleBinding, params};
///
/// let rules = RuleSet::new()
///     .add(RuleBinding::new("required", "age", vec![]))
///     .add(RuleBinding::new("between", "age", params![vec![18, 99]]));
///
/// let report = fieldcheck::check(serde_json::json!({"age": 12}), &rules).unwrap_err();
/// assert_eq!(report.get("age").unwrap(), ["Age must be between 18 and 99"]);
/// ```
pub fn check(data: impl Into<Value>, rules: &RuleSet) -> Result<(), ErrorReport> {
    let mut validator = Validator::new(data);
    validator.rules(rules);
    if validator.validate() {
        Ok(())
    } else {
        Err(validator.errors().clone())
    }
}
