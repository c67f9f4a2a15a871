//! # vouch-cli — Command-Line Front End for vouch
//!
//! Loads a declarative schema file, builds a [`vouch_schema::Namespace`]
//! from it and validates JSON/YAML documents against its schemas.
//!
//! ## Subcommands
//!
//! - `validate`: run the validate-then-repair pipeline on a document
//! - `keys`: list a schema's fields
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the subcommand modules; handlers return an
//!   exit status and delegate to `vouch-schema`.
//! - Library errors are typed ([`declaration::DeclarationError`]); only the
//!   handlers use `anyhow`.

pub mod checks;
pub mod declaration;
pub mod document;
pub mod keys;
pub mod validate;
