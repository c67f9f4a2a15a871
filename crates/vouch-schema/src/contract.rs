//! # Contracts — Compiled Validators
//!
//! A [`Contract`] binds a schema's fields and rules into one executable
//! validator. It is derived data: [`Schema::contract`](crate::Schema::contract)
//! builds it on first use and caches it until the schema changes.
//!
//! ## Execution
//!
//! 1. Every field, in declaration order, is checked against its resolved
//!    type. Required fields must be present. Non-required fields may be
//!    absent or explicitly `Null`. A field with an immediate default is
//!    filled from it when absent.
//! 2. Rules run in declaration order against the coerced values. A field or
//!    multi-field rule is skipped if any of its fields failed step 1. Global
//!    rules always run.

use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

use vouch_core::{Context, Data, Value, VouchError, VouchResult};

use crate::expectation::Expectation;
use crate::result::ValidationResult;
use crate::rule::{Failure, Rule};

/// Message for a required field absent from the input.
pub const MISSING: &str = "is missing";

/// A compiled schema.
#[derive(Debug, Clone)]
pub struct Contract {
    schema: String,
    fields: Vec<Arc<Expectation>>,
    rules: Vec<Rule>,
}

impl Contract {
    /// Compile fields and rules.
    ///
    /// # Errors
    ///
    /// [`VouchError::InvalidRuleScope`] if a rule names a field that is not
    /// declared.
    pub fn compile(schema: &str, fields: &[Arc<Expectation>], rules: &[Rule]) -> VouchResult<Self> {
        for rule in rules {
            if let Some(unknown) = rule
                .keys()
                .iter()
                .find(|key| !fields.iter().any(|f| f.name() == key.as_str()))
            {
                return Err(VouchError::InvalidRuleScope {
                    schema: schema.to_owned(),
                    field: unknown.clone(),
                });
            }
        }
        Ok(Self {
            schema: schema.to_owned(),
            fields: fields.to_vec(),
            rules: rules.to_vec(),
        })
    }

    /// Name of the schema this contract was compiled from.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Arc<Expectation>] {
        &self.fields
    }

    /// Attached rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Names of the fields that must be present.
    pub fn required_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name())
            .collect()
    }

    /// Names of the fields that may be absent.
    pub fn optional_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.is_required())
            .map(|f| f.name())
            .collect()
    }

    /// Run the contract once.
    pub fn call(&self, data: &Data, context: &Context, owner: Option<&dyn Any>) -> ValidationResult {
        let mut result = ValidationResult::default();

        for field in &self.fields {
            let coercer = field.coercer();
            let coerced = match data.get(field.name()) {
                Some(Value::Null) if !field.is_required() => Ok(Value::Null),
                Some(raw) => coercer.coerce(raw),
                None => match coercer.default_value() {
                    Some(default) => coercer.coerce(default),
                    None if field.is_required() => {
                        result.add_error(field.name(), MISSING);
                        continue;
                    }
                    None => continue,
                },
            };
            match coerced {
                Ok(value) => {
                    result.values.insert(field.name().to_owned(), value);
                }
                Err(e) => result.add_error(field.name(), e.message()),
            }
        }

        let failed: BTreeSet<String> = result.errors.keys().cloned().collect();
        for rule in &self.rules {
            if rule.keys().iter().any(|key| failed.contains(key)) {
                continue;
            }
            for failure in rule.apply(&result.values, context, owner) {
                match failure {
                    Failure::Field { field, message } => result.add_error(field, message),
                    Failure::Base(message) => result.add_base_error(message),
                }
            }
        }

        result
    }
}
