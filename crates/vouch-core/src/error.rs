//! # Error Types — Declaration-Time Error Taxonomy
//!
//! Defines the error types used throughout vouch. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every variant is a local, configuration-time failure surfaced to the
//!   code that declared the schema. None of them is retried.
//! - Invalid *input data* is never a `VouchError`: it is a normal
//!   validation result with `success() == false`.
//! - A failing deferred provider is reported with the field it was
//!   computing and its original error as the source.

use thiserror::Error;

/// Boxed error produced by user-supplied provider logic.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for vouch.
#[derive(Error, Debug)]
pub enum VouchError {
    /// A type descriptor has none of the recognised shapes, or a nested
    /// array descriptor is malformed.
    #[error("invalid type descriptor: {0}")]
    InvalidTypeDescriptor(String),

    /// A primitive type tag is not in the supported set.
    #[error("unknown type tag: {0:?}")]
    UnknownTypeTag(String),

    /// The schema name is already registered in this namespace.
    #[error("schema {schema:?} is already defined in namespace {namespace:?}")]
    SchemaAlreadyDefined {
        /// Namespace that owns the registry.
        namespace: String,
        /// Schema name that was re-declared.
        schema: String,
    },

    /// A declaration option is unusable (e.g. a singular-name override that
    /// is not a valid identifier).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A generated entry-point name is already taken and the collision
    /// policy is `error`.
    #[error("entry point {name:?} is already defined at {level} level")]
    MethodCollision {
        /// The colliding entry-point name.
        name: String,
        /// `namespace` or `instance`.
        level: String,
    },

    /// A collision policy other than `error` or `force` was requested.
    #[error("unknown collision policy: {0:?}")]
    UnknownCollisionPolicy(String),

    /// Attempted to mutate a frozen schema.
    #[error("can't modify frozen schema {0:?}")]
    FrozenMutation(String),

    /// A field with the same name already exists in the schema.
    #[error("field {field:?} is already declared in schema {schema:?}")]
    DuplicateField {
        /// Schema being extended.
        schema: String,
        /// Field name that was declared twice.
        field: String,
    },

    /// No schema with this name is registered.
    #[error("unknown schema {0:?}")]
    UnknownSchema(String),

    /// No generated entry point with this name exists.
    #[error("unknown entry point {0:?}")]
    UnknownEntryPoint(String),

    /// A rule is scoped to a field the schema does not declare.
    #[error("rule in schema {schema:?} refers to undeclared field {field:?}")]
    InvalidRuleScope {
        /// Schema whose contract was being compiled.
        schema: String,
        /// The undeclared field name.
        field: String,
    },

    /// A deferred default or fallback provider failed.
    #[error("provider for field {field:?} failed: {source}")]
    Provider {
        /// Field whose value was being computed.
        field: String,
        /// The provider's own error.
        #[source]
        source: BoxError,
    },
}

/// Convenience alias used across the workspace.
pub type VouchResult<T> = Result<T, VouchError>;

/// Failure to coerce a raw value into the shape a type demands.
///
/// This is a *data* error: the contract turns it into a per-field message
/// rather than propagating it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CoercionError {
    message: String,
}

impl CoercionError {
    /// Create a coercion error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message, e.g. `"must be an integer"`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the message with an array index, keeping the rest intact.
    pub fn at_index(self, index: usize) -> Self {
        Self {
            message: format!("[{index}] {}", self.message),
        }
    }
}
