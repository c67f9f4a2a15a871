//! # vouch-schema — Schemas, Contracts and the Validate-Then-Repair Pipeline
//!
//! Builds on `vouch-core` to let an owner type declare named schemas
//! (`inputs`, `outputs`, `params`, ...) and validate data maps against them.
//!
//! ## Architecture
//!
//! ```text
//! Namespace ──declare──▶ Schema ──contract()──▶ Contract
//!     │                    ▲                       │
//!     │ define/define_rule │                       ▼
//!     └────────────────────┘        validate(): defaults ─▶ call ─▶
//!                                   fallbacks ─▶ (one) retry ─▶ ValidationResult
//! ```
//!
//! - [`Expectation`] describes one field (type, optionality, default,
//!   fallback). Defaults and fallbacks are immediate values or
//!   [`Provider`]s evaluated per call, optionally against an owner.
//! - [`Rule`] attaches a predicate to one field, several fields, or the
//!   whole value map.
//! - [`Schema`] holds fields and rules and caches its compiled
//!   [`Contract`].
//! - [`validate()`] is the orchestrator.
//! - [`Namespace`] is the per-owner registry with generated entry points,
//!   collision policy and copy-on-inherit.
//!
//! ## Crate Policy
//!
//! - Invalid data is a failing [`ValidationResult`], never an `Err`.
//! - Declaration mistakes surface immediately as [`vouch_core::VouchError`].
//! - No `unsafe` code. No `.unwrap()` outside tests.

pub mod bound;
pub mod contract;
pub mod expectation;
pub mod provider;
pub mod registry;
pub mod result;
pub mod rule;
pub mod schema;
pub mod validate;

pub use bound::{BoundSchema, Expects};
pub use contract::{Contract, MISSING};
pub use expectation::{Expectation, ExpectationBuilder};
pub use provider::{Provided, Provider};
pub use registry::{CollisionPolicy, DeclareOptions, EntryNames, EntryPoint, Level, Namespace};
pub use result::ValidationResult;
pub use rule::{Rule, RuleContext, RuleScope};
pub use schema::Schema;
pub use validate::validate;
