//! # Validation Orchestrator
//!
//! Runs the validate-then-repair pipeline for one call:
//!
//! 1. **Default injection.** Copy the input. Every absent field with a
//!    deferred default gets the provider's value. Immediate defaults are
//!    left to the field's type. Supplied values, falsy ones included, are
//!    never overwritten.
//! 2. **First pass.** Run the contract on the defaulted copy.
//! 3. **Fallback patch.** On failure, overwrite every field that has both
//!    an error and a fallback.
//! 4. **Retry.** If the patched copy differs from the defaulted one, run
//!    the contract exactly once more and return that result, even if it
//!    still fails. Otherwise return the first result.
//!
//! A failing result is a normal return value. Only a failing provider
//! aborts the call.

use std::any::Any;

use vouch_core::{Context, Data, VouchError, VouchResult};

use crate::contract::Contract;
use crate::result::ValidationResult;

/// Validate `data` against `contract`.
///
/// `owner` is handed to deferred providers and rule predicates.
///
/// # Errors
///
/// [`VouchError::Provider`] if a deferred default or fallback fails.
pub fn validate(
    contract: &Contract,
    data: &Data,
    owner: Option<&dyn Any>,
    context: &Context,
) -> VouchResult<ValidationResult> {
    let defaulted = inject_defaults(contract, data, owner)?;
    let result = contract.call(&defaulted, context, owner);
    if result.success() {
        return Ok(result);
    }

    let (patched, overwritten) = apply_fallbacks(contract, &defaulted, &result, owner)?;
    if !overwritten {
        return Ok(result);
    }

    tracing::debug!(
        schema = contract.schema_name(),
        errors = result.error_count(),
        "fallbacks applied, re-validating"
    );
    Ok(contract.call(&patched, context, owner))
}

fn inject_defaults(contract: &Contract, data: &Data, owner: Option<&dyn Any>) -> VouchResult<Data> {
    let mut defaulted = data.clone();
    for field in contract.fields() {
        if defaulted.contains_key(field.name()) {
            continue;
        }
        if let Some(provider) = field.deferred_default() {
            let value = provider.evaluate(owner).map_err(|source| VouchError::Provider {
                field: field.name().to_owned(),
                source,
            })?;
            tracing::debug!(schema = contract.schema_name(), field = field.name(), "injected default");
            defaulted.insert(field.name().to_owned(), value);
        }
    }
    Ok(defaulted)
}

fn apply_fallbacks(
    contract: &Contract,
    defaulted: &Data,
    result: &ValidationResult,
    owner: Option<&dyn Any>,
) -> VouchResult<(Data, bool)> {
    let mut patched = defaulted.clone();
    let mut overwritten = false;
    for field in contract.fields() {
        if !result.has_errors_for(field.name()) {
            continue;
        }
        if let Some(value) = field.fallback_value(owner) {
            let value = value.map_err(|source| VouchError::Provider {
                field: field.name().to_owned(),
                source,
            })?;
            if patched.get(field.name()) != Some(&value) {
                patched.insert(field.name().to_owned(), value);
                overwritten = true;
            }
        }
    }
    Ok((patched, overwritten))
}
