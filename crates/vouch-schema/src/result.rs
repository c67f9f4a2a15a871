//! # Validation Results
//!
//! A failing [`ValidationResult`] is a normal return value, not an error.

use std::collections::BTreeMap;

use serde::Serialize;
use vouch_core::{Data, Value};

/// Outcome of running a contract against a data map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Coerced values for every field that passed type-level validation.
    pub(crate) values: Data,
    /// Per-field messages. Only failing fields have an entry.
    pub(crate) errors: BTreeMap<String, Vec<String>>,
    /// Messages not attached to a field (reported by global rules).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) base_errors: Vec<String>,
}

impl ValidationResult {
    /// Whether no field or base error was reported.
    pub fn success(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Whether any error was reported.
    pub fn failure(&self) -> bool {
        !self.success()
    }

    /// Messages for one field, empty if the field passed.
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All per-field messages.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Messages not attached to a field.
    pub fn base_errors(&self) -> &[String] {
        &self.base_errors
    }

    /// Total number of messages.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum::<usize>() + self.base_errors.len()
    }

    /// The coerced value of one field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// All coerced values.
    pub fn values(&self) -> &Data {
        &self.values
    }

    /// A copy of the coerced values.
    pub fn to_map(&self) -> Data {
        self.values.clone()
    }

    /// Consume the result, keeping the coerced values.
    pub fn into_values(self) -> Data {
        self.values
    }

    pub(crate) fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub(crate) fn add_base_error(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub(crate) fn has_errors_for(&self, field: &str) -> bool {
        self.errors.get(field).is_some_and(|e| !e.is_empty())
    }
}
