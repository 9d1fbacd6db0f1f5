//! Session options.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DNS_TIMEOUT_MS: u64 = 2000;

/// Behavior switches of a [`Validator`](crate::Validator). Every field has a
/// default, so a partial YAML document is enough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Replace `{field}` with the field label. When false the placeholder is
    /// dropped ("is required" instead of "Name is required").
    pub prepend_labels: bool,
    /// Stop evaluating further bindings once one has failed.
    pub stop_on_first_fail: bool,
    /// Timeout of the system host lookups done by `emailDNS` and `urlActive`.
    pub dns_timeout_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prepend_labels: true,
            stop_on_first_fail: false,
            dns_timeout_ms: DEFAULT_DNS_TIMEOUT_MS,
        }
    }
}

impl Options {
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(input).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }
}
