//! # Owner-Bound Schemas
//!
//! [`BoundSchema`] pairs a schema with the object that owns it, so deferred
//! providers and rule predicates can read the owner. [`Expects`] gives an
//! owner type the instance-level entry points.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use vouch_core::{Context, Data, VouchResult};

use crate::contract::Contract;
use crate::registry::Namespace;
use crate::result::ValidationResult;
use crate::schema::Schema;

/// A schema bound to an owner instance.
#[derive(Clone, Copy)]
pub struct BoundSchema<'a> {
    owner: &'a dyn Any,
    schema: &'a Schema,
}

impl<'a> BoundSchema<'a> {
    /// Bind `schema` to `owner`.
    pub fn new(owner: &'a dyn Any, schema: &'a Schema) -> Self {
        Self { owner, schema }
    }

    /// Run the validation pipeline with the owner bound.
    ///
    /// # Errors
    ///
    /// Compilation or provider failures.
    pub fn validate(&self, data: &Data, context: &Context) -> VouchResult<ValidationResult> {
        self.schema.validate_with(self.owner, data, context)
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> Vec<&'a str> {
        self.schema.keys()
    }

    /// The schema's compiled contract.
    ///
    /// # Errors
    ///
    /// Compilation failures.
    pub fn contract(&self) -> VouchResult<Arc<Contract>> {
        self.schema.contract()
    }

    /// The underlying schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// The bound owner.
    pub fn owner(&self) -> &'a dyn Any {
        self.owner
    }
}

impl fmt::Debug for BoundSchema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundSchema").field("schema", &self.schema.name()).finish_non_exhaustive()
    }
}

/// Implemented by types that own a [`Namespace`].
///
/// ```ignore
/// static SEARCH: OnceLock<Namespace> = OnceLock::new();
///
/// impl Expects for Search {
///     fn namespace(&self) -> &Namespace {
///         SEARCH.get_or_init(build_search_namespace)
///     }
/// }
///
/// let result = search.validate("inputs", &data, &Context::new())?;
/// ```
pub trait Expects: Any + Sized {
    /// The namespace holding this type's schemas.
    fn namespace(&self) -> &Namespace;

    /// The instance-level accessor: `accessor` bound to `self`.
    ///
    /// # Errors
    ///
    /// [`vouch_core::VouchError::UnknownEntryPoint`] if no such accessor exists.
    fn bound(&self, accessor: &str) -> VouchResult<BoundSchema<'_>> {
        self.namespace().bind(accessor, self)
    }

    /// Validate `data` against `schema` with `self` as the owner.
    ///
    /// # Errors
    ///
    /// [`vouch_core::VouchError::UnknownSchema`], compilation or provider
    /// failures.
    fn validate(&self, schema: &str, data: &Data, context: &Context) -> VouchResult<ValidationResult> {
        self.namespace().schema(schema)?.validate_with(self, data, context)
    }
}
