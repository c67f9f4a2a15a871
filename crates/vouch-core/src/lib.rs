//! # vouch-core — Foundational Types for vouch
//!
//! This crate is the leaf of the vouch workspace. It defines the value
//! model that data flows through, the type descriptors fields are declared
//! with, and the built-in coercion engine that resolves them. Every other
//! crate depends on `vouch-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One value model.** Input data, coerced output, defaults, fallbacks
//!    and rule context all share [`Value`]. Data maps are ordered
//!    ([`Data`] is a `BTreeMap`) so results compare and print
//!    deterministically.
//!
//! 2. **Resolution is a pure mapping.** [`resolve`] turns a
//!    [`TypeDescriptor`] into an `Arc<dyn Coercer>` without side effects.
//!    Caller-built coercers pass through unchanged.
//!
//! 3. **Data problems are not errors.** [`CoercionError`] describes why a
//!    value does not fit; it is reported per field, never propagated.
//!    [`VouchError`] is reserved for declaration-time mistakes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vouch-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod naming;
pub mod types;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use config::{configure, reset_configuration, Configuration};
pub use error::{BoxError, CoercionError, VouchError, VouchResult};
pub use naming::{is_identifier, reset_method_name, rule_method_name, singularize};
pub use types::{
    resolve, ArrayOf, Coercer, Constrained, Defaulted, InstanceOf, InstanceTag, Optional,
    Primitive, TypeDescriptor,
};
pub use value::{data_from_json, Context, Data, Opaque, Value};
