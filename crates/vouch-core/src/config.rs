//! # Configuration
//!
//! Naming knobs for generated rule-definer entry points. A process-wide
//! default lives behind a lock; each namespace snapshots it when created,
//! and a single declaration may override it.

use std::borrow::Cow;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Rule-definer naming configuration.
///
/// The rule definer for field definer `input` is named
/// `[rule_prefix_]input[_rule_suffix]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Prepended to the field-definer name. Absent by default.
    pub rule_prefix: Option<Cow<'static, str>>,
    /// Appended to the field-definer name. `"rule"` by default.
    pub rule_suffix: Option<Cow<'static, str>>,
}

impl Configuration {
    /// The built-in defaults: no prefix, suffix `"rule"`.
    pub const DEFAULT: Configuration = Configuration {
        rule_prefix: None,
        rule_suffix: Some(Cow::Borrowed("rule")),
    };

    /// Snapshot of the process-wide configuration.
    pub fn current() -> Configuration {
        GLOBAL.read().clone()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static GLOBAL: RwLock<Configuration> = parking_lot::const_rwlock(Configuration::DEFAULT);

/// Mutate the process-wide configuration.
///
/// Namespaces created before the call keep the snapshot they took.
pub fn configure(f: impl FnOnce(&mut Configuration)) {
    f(&mut GLOBAL.write());
}

/// Restore the process-wide configuration to [`Configuration::DEFAULT`].
pub fn reset_configuration() {
    *GLOBAL.write() = Configuration::DEFAULT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Configuration::default();
        assert_eq!(config.rule_prefix, None);
        assert_eq!(config.rule_suffix.as_deref(), Some("rule"));
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: Configuration =
            serde_json::from_str(r#"{"rule_prefix": "validate", "rule_suffix": null}"#).unwrap();
        assert_eq!(config.rule_prefix.as_deref(), Some("validate"));
        assert_eq!(config.rule_suffix, None);

        let config: Configuration = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Configuration::DEFAULT);
    }
}
