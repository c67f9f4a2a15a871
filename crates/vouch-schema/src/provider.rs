//! # Value Providers
//!
//! Defaults and fallbacks are either an immediate [`Value`] or a deferred
//! [`Provider`] evaluated at validation time. A provider receives the
//! owning object explicitly (if the validation is bound to one) instead of
//! having its scope rebound.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use vouch_core::{BoxError, Value};

type ProviderFn = dyn Fn(Option<&dyn Any>) -> Result<Value, BoxError> + Send + Sync;

fn provider_fn<F>(f: F) -> Arc<ProviderFn>
where
    F: Fn(Option<&dyn Any>) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A lazily evaluated value source.
#[derive(Clone)]
pub struct Provider(Arc<ProviderFn>);

impl Provider {
    /// A provider that ignores the owner.
    pub fn new<V, F>(f: F) -> Self
    where
        V: Into<Value>,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self(provider_fn(move |_| Ok(f().into())))
    }

    /// A fallible provider that ignores the owner.
    pub fn try_new<V, E, F>(f: F) -> Self
    where
        V: Into<Value>,
        E: Into<BoxError>,
        F: Fn() -> Result<V, E> + Send + Sync + 'static,
    {
        Self(provider_fn(move |_| f().map(Into::into).map_err(Into::into)))
    }

    /// A provider computed from an owner of type `T`.
    ///
    /// Evaluating it without an owner, or with an owner of another type,
    /// is an error.
    pub fn scoped<T, V, F>(f: F) -> Self
    where
        T: Any,
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self(provider_fn(move |owner| {
            let owner = owner.and_then(|o| o.downcast_ref::<T>()).ok_or_else(|| {
                BoxError::from(format!(
                    "provider requires an owner of type {}",
                    std::any::type_name::<T>()
                ))
            })?;
            Ok(f(owner).into())
        }))
    }

    /// Run the provider.
    pub fn evaluate(&self, owner: Option<&dyn Any>) -> Result<Value, BoxError> {
        (self.0)(owner)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Provider(..)")
    }
}

/// A default or fallback: immediate or deferred.
#[derive(Debug, Clone)]
pub enum Provided {
    /// Used as is.
    Value(Value),
    /// Evaluated at validation time.
    Deferred(Provider),
}

impl Provided {
    /// Whether this is a deferred provider.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Provided::Deferred(_))
    }

    /// Produce the value, evaluating a deferred provider against `owner`.
    pub fn resolve(&self, owner: Option<&dyn Any>) -> Result<Value, BoxError> {
        match self {
            Provided::Value(v) => Ok(v.clone()),
            Provided::Deferred(p) => p.evaluate(owner),
        }
    }
}

impl From<Provider> for Provided {
    fn from(p: Provider) -> Self {
        Provided::Deferred(p)
    }
}
