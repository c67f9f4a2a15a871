//! # Declarative Checks
//!
//! Rules in a declaration file name a scope and one check:
//!
//! | Check         | Scope         | Fails when                                   |
//! |---------------|---------------|----------------------------------------------|
//! | `range`       | `field`       | a number is below `min` or above `max`       |
//! | `one_of`      | `field`       | the value is not in the list                 |
//! | `length`      | `field`       | string/array/hash size is outside the bounds |
//! | `context_max` | `field`       | a number exceeds `context[key]`              |
//! | `distinct`    | `fields`      | two of the fields hold equal values          |
//! | `any_present` | none (global) | every listed field is absent or `null`       |
//!
//! An optional `message` replaces the default failure message.

use serde::Deserialize;
use vouch_core::Value;
use vouch_schema::{Rule, RuleContext};

use crate::declaration::{DeclarationError, FieldDecl};

/// A rule as written in a declaration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDecl {
    /// Single-field scope.
    #[serde(default)]
    pub field: Option<String>,
    /// Multi-field scope.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    /// Replaces the default failure message.
    #[serde(default)]
    pub message: Option<String>,
    /// The check to run.
    #[serde(flatten)]
    pub check: Check,
}

/// The built-in checks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Inclusive numeric bounds.
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// Allowed values.
    OneOf(Vec<serde_json::Value>),
    /// Inclusive size bounds.
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    /// Upper bound read from the validation context.
    ContextMax { key: String },
    /// Scoped fields must hold pairwise different values.
    Distinct(bool),
    /// At least one of these fields must be present.
    AnyPresent(Vec<String>),
}

impl RuleDecl {
    /// Turn the declaration into a [`Rule`].
    ///
    /// # Errors
    ///
    /// [`DeclarationError::InvalidRule`] when the scope does not suit the
    /// check, or a global check names an undeclared field.
    pub fn compile(&self, schema: &str, fields: &[FieldDecl]) -> Result<Rule, DeclarationError> {
        let invalid = |message: String| DeclarationError::InvalidRule {
            schema: schema.to_owned(),
            message,
        };
        let custom = self.message.clone();

        match (&self.check, &self.field, &self.fields) {
            (Check::Range { min, max }, Some(field), None) => {
                let (min, max) = (*min, *max);
                Ok(Rule::field(field, move |ctx| {
                    let Some(n) = ctx.value().as_f64() else { return };
                    if let Some(min) = min.filter(|min| n < *min) {
                        report(ctx, &custom, || format!("must be greater than or equal to {min}"));
                    } else if let Some(max) = max.filter(|max| n > *max) {
                        report(ctx, &custom, || format!("must be less than or equal to {max}"));
                    }
                }))
            }
            (Check::OneOf(allowed), Some(field), None) => {
                let allowed: Vec<Value> = allowed.iter().map(Value::from_json).collect();
                Ok(Rule::field(field, move |ctx| {
                    let value = ctx.value();
                    if value.is_null() || allowed.contains(value) {
                        return;
                    }
                    report(ctx, &custom, || format!("must be one of: {}", join(&allowed)));
                }))
            }
            (Check::Length { min, max }, Some(field), None) => {
                let (min, max) = (*min, *max);
                Ok(Rule::field(field, move |ctx| {
                    let Some(size) = size_of(ctx.value()) else { return };
                    if let Some(min) = min.filter(|min| size < *min) {
                        report(ctx, &custom, || format!("size cannot be less than {min}"));
                    } else if let Some(max) = max.filter(|max| size > *max) {
                        report(ctx, &custom, || format!("size cannot be greater than {max}"));
                    }
                }))
            }
            (Check::ContextMax { key }, Some(field), None) => {
                let key = key.clone();
                Ok(Rule::field(field, move |ctx| {
                    let limit = ctx.context_value(&key).and_then(Value::as_f64);
                    let (Some(limit), Some(n)) = (limit, ctx.value().as_f64()) else { return };
                    if n > limit {
                        report(ctx, &custom, || format!("must be less than or equal to {limit}"));
                    }
                }))
            }
            (Check::Distinct(enabled), None, Some(names)) if names.len() >= 2 => {
                let enabled = *enabled;
                let keys = names.clone();
                Ok(Rule::fields(names.clone(), move |ctx| {
                    if !enabled {
                        return;
                    }
                    let values: Vec<&Value> = keys
                        .iter()
                        .map(|k| ctx.value_of(k))
                        .filter(|v| !v.is_null())
                        .collect();
                    let clash = values.iter().enumerate().any(|(i, a)| values[i + 1..].contains(a));
                    if clash {
                        report(ctx, &custom, || "must all be different".to_owned());
                    }
                }))
            }
            (Check::AnyPresent(names), None, None) => {
                if let Some(unknown) = names.iter().find(|n| !fields.iter().any(|f| &f.name == *n)) {
                    return Err(invalid(format!("any_present names undeclared field {unknown:?}")));
                }
                let names = names.clone();
                Ok(Rule::global(move |ctx| {
                    if names.iter().all(|n| ctx.value_of(n).is_null()) {
                        report(ctx, &custom, || {
                            format!("at least one of {} must be present", names.join(", "))
                        });
                    }
                }))
            }
            (Check::Distinct(_), _, _) => Err(invalid("distinct needs `fields` with two or more names".into())),
            (Check::AnyPresent(_), _, _) => Err(invalid("any_present takes no `field` or `fields`".into())),
            _ => Err(invalid("this check needs exactly one `field`".into())),
        }
    }
}

fn report(ctx: &mut RuleContext<'_>, custom: &Option<String>, default: impl FnOnce() -> String) {
    let message = custom.clone().unwrap_or_else(default);
    ctx.failure(message);
}

fn size_of(value: &Value) -> Option<usize> {
    match value {
        Value::Str(s) | Value::Symbol(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Hash(map) => Some(map.len()),
        _ => None,
    }
}

fn join(values: &[Value]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
