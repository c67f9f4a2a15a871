//! # Expectations — Field Descriptors
//!
//! An [`Expectation`] describes one field: its name, declared type,
//! optionality, default and fallback. It is immutable once built.
//!
//! The declared type is resolved eagerly, so an unknown tag or malformed
//! descriptor fails at declaration time. Optionality and an immediate
//! default are folded into the resolved coercer; a deferred default is
//! left to the validation pipeline, which evaluates it per call.
//!
//! A default fills an *absent* field before validation. A fallback
//! repairs a field that *failed* validation, even one supplied explicitly.
//! The two are independent and a field may carry both.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use vouch_core::{resolve, Coercer, Defaulted, Optional, TypeDescriptor, Value, VouchResult};

use crate::provider::{Provided, Provider};

/// A single field's descriptor.
#[derive(Clone)]
pub struct Expectation {
    name: String,
    descriptor: TypeDescriptor,
    coercer: Arc<dyn Coercer>,
    optional: bool,
    default: Option<Provided>,
    fallback: Option<Provided>,
}

impl Expectation {
    /// Start describing field `name`. The type defaults to "any".
    pub fn builder(name: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            name: name.into(),
            descriptor: TypeDescriptor::Any,
            optional: false,
            default: None,
            fallback: None,
        }
    }

    /// Shorthand for a required field of the given type.
    pub fn new(name: impl Into<String>, descriptor: impl Into<TypeDescriptor>) -> VouchResult<Self> {
        Self::builder(name).typed(descriptor).build()
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type as declared.
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The resolved coercer, including optional/default wrappers.
    pub fn coercer(&self) -> &Arc<dyn Coercer> {
        &self.coercer
    }

    /// Whether the field was declared optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The declared default, if any.
    pub fn default(&self) -> Option<&Provided> {
        self.default.as_ref()
    }

    /// The declared fallback, if any.
    pub fn fallback(&self) -> Option<&Provided> {
        self.fallback.as_ref()
    }

    /// A field is required when it accepts no `Null` and has no default.
    pub fn is_required(&self) -> bool {
        !self.coercer.is_optional() && !self.has_default()
    }

    /// Whether a default is declared, either here or by a pre-resolved type.
    pub fn has_default(&self) -> bool {
        self.coercer.default_value().is_some() || self.default.is_some()
    }

    /// Whether a fallback is declared.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// The deferred default provider, if the default is deferred.
    pub fn deferred_default(&self) -> Option<&Provider> {
        match &self.default {
            Some(Provided::Deferred(p)) => Some(p),
            _ => None,
        }
    }

    /// Compute the fallback value for this field, if one is declared.
    pub(crate) fn fallback_value(
        &self,
        owner: Option<&dyn Any>,
    ) -> Option<Result<Value, vouch_core::BoxError>> {
        self.fallback.as_ref().map(|f| f.resolve(owner))
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("name", &self.name)
            .field("type", &self.coercer.name())
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Builder for [`Expectation`].
#[derive(Debug, Clone)]
pub struct ExpectationBuilder {
    name: String,
    descriptor: TypeDescriptor,
    optional: bool,
    default: Option<Provided>,
    fallback: Option<Provided>,
}

impl ExpectationBuilder {
    /// Declare the field's type.
    pub fn typed(mut self, descriptor: impl Into<TypeDescriptor>) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    /// Accept `Null` and absence.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// An immediate default. `Null` means "no default".
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = non_null(value.into());
        self
    }

    /// A deferred default.
    pub fn default_with(mut self, provider: Provider) -> Self {
        self.default = Some(Provided::Deferred(provider));
        self
    }

    /// An immediate fallback. `Null` means "no fallback".
    pub fn fallback_value(mut self, value: impl Into<Value>) -> Self {
        self.fallback = non_null(value.into());
        self
    }

    /// A deferred fallback.
    pub fn fallback_with(mut self, provider: Provider) -> Self {
        self.fallback = Some(Provided::Deferred(provider));
        self
    }

    /// Resolve the type and build the expectation.
    ///
    /// # Errors
    ///
    /// Propagates [`vouch_core::VouchError::UnknownTypeTag`] and
    /// [`vouch_core::VouchError::InvalidTypeDescriptor`] from resolution.
    pub fn build(self) -> VouchResult<Expectation> {
        let mut coercer = resolve(&self.descriptor)?;
        if self.optional {
            coercer = Arc::new(Optional(coercer));
        }
        if let Some(Provided::Value(default)) = &self.default {
            coercer = Arc::new(Defaulted::new(coercer, default.clone()));
        }
        Ok(Expectation {
            name: self.name,
            descriptor: self.descriptor,
            coercer,
            optional: self.optional,
            default: self.default,
            fallback: self.fallback,
        })
    }
}

fn non_null(value: Value) -> Option<Provided> {
    (!value.is_null()).then_some(Provided::Value(value))
}
