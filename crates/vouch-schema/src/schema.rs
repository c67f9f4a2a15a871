//! # Schemas
//!
//! A [`Schema`] is a named, ordered collection of [`Expectation`]s plus
//! rule descriptors. It owns compilation of its [`Contract`] and caches the
//! result until the next mutation.
//!
//! ## Lifecycle
//!
//! Created empty when a schema name is declared, mutated while fields and
//! rules are registered, then typically frozen. [`Schema::duplicate`]
//! produces an independent, unfrozen copy sharing the same (immutable)
//! expectation values; namespaces use it for copy-on-inherit.
//!
//! ## Concurrency
//!
//! Mutation takes `&mut self`. Once declaration is finished the schema is
//! shared read-only; the contract cache sits behind a `parking_lot::RwLock`
//! so concurrent first compilations are safe (a lost race rebuilds the same
//! contract).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use vouch_core::{Context, Data, VouchError, VouchResult};

use crate::contract::Contract;
use crate::expectation::Expectation;
use crate::result::ValidationResult;
use crate::rule::Rule;
use crate::validate;

/// A named set of fields and rules.
pub struct Schema {
    name: String,
    fields: Vec<Arc<Expectation>>,
    rules: Vec<Rule>,
    frozen: bool,
    contract: RwLock<Option<Arc<Contract>>>,
}

impl Schema {
    /// An empty, unfrozen schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            rules: Vec::new(),
            frozen: false,
            contract: RwLock::new(None),
        }
    }

    /// The schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a field.
    ///
    /// # Errors
    ///
    /// - [`VouchError::FrozenMutation`] if the schema is frozen.
    /// - [`VouchError::DuplicateField`] if a field with the same name exists.
    pub fn add_field(&mut self, expectation: Expectation) -> VouchResult<Arc<Expectation>> {
        self.ensure_mutable()?;
        if self.fields.iter().any(|f| f.name() == expectation.name()) {
            return Err(VouchError::DuplicateField {
                schema: self.name.clone(),
                field: expectation.name().to_owned(),
            });
        }
        let expectation = Arc::new(expectation);
        self.fields.push(Arc::clone(&expectation));
        self.invalidate();
        Ok(expectation)
    }

    /// Add a rule.
    ///
    /// # Errors
    ///
    /// [`VouchError::FrozenMutation`] if the schema is frozen.
    pub fn add_rule(&mut self, rule: Rule) -> VouchResult<()> {
        self.ensure_mutable()?;
        self.rules.push(rule);
        self.invalidate();
        Ok(())
    }

    /// Remove every field and rule.
    ///
    /// # Errors
    ///
    /// [`VouchError::FrozenMutation`] if the schema is frozen.
    pub fn reset(&mut self) -> VouchResult<()> {
        self.ensure_mutable()?;
        self.fields.clear();
        self.rules.clear();
        self.invalidate();
        Ok(())
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Arc<Expectation>] {
        &self.fields
    }

    /// Look up one field.
    pub fn field(&self, name: &str) -> Option<&Arc<Expectation>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The compiled contract, building and caching it if needed.
    ///
    /// # Errors
    ///
    /// Propagates [`Contract::compile`] failures. Nothing is cached then.
    pub fn contract(&self) -> VouchResult<Arc<Contract>> {
        if let Some(contract) = self.contract.read().as_ref() {
            return Ok(Arc::clone(contract));
        }
        let contract = Arc::new(Contract::compile(&self.name, &self.fields, &self.rules)?);
        tracing::debug!(
            schema = %self.name,
            fields = self.fields.len(),
            rules = self.rules.len(),
            "compiled contract"
        );
        *self.contract.write() = Some(Arc::clone(&contract));
        Ok(contract)
    }

    /// Whether a compiled contract is currently cached.
    pub fn is_contract_cached(&self) -> bool {
        self.contract.read().is_some()
    }

    /// An independent, unfrozen copy with no cached contract.
    pub fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            rules: self.rules.clone(),
            frozen: false,
            contract: RwLock::new(None),
        }
    }

    /// Reject further mutation.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the schema is frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Validate without an owner.
    ///
    /// # Errors
    ///
    /// Only for compilation or provider failures. Invalid data is reported
    /// in the returned result.
    pub fn validate(&self, data: &Data, context: &Context) -> VouchResult<ValidationResult> {
        validate::validate(&*self.contract()?, data, None, context)
    }

    /// Validate with deferred providers and rules bound to `owner`.
    ///
    /// # Errors
    ///
    /// As for [`Schema::validate`].
    pub fn validate_with(
        &self,
        owner: &dyn Any,
        data: &Data,
        context: &Context,
    ) -> VouchResult<ValidationResult> {
        validate::validate(&*self.contract()?, data, Some(owner), context)
    }

    fn ensure_mutable(&self) -> VouchResult<()> {
        if self.frozen {
            return Err(VouchError::FrozenMutation(self.name.clone()));
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        *self.contract.get_mut() = None;
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("keys", &self.keys())
            .field("rules", &self.rules.len())
            .field("frozen", &self.frozen)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::{data, Value};

    fn schema_with(fields: &[(&str, &str)]) -> Schema {
        let mut schema = Schema::new("inputs");
        for (name, tag) in fields {
            schema.add_field(Expectation::new(*name, *tag).unwrap()).unwrap();
        }
        schema
    }

    #[test]
    fn keys_follow_declaration_order() {
        let schema = schema_with(&[("zeta", "int"), ("alpha", "string")]);
        assert_eq!(schema.keys(), ["zeta", "alpha"]);
        assert!(schema.field("alpha").is_some());
        assert!(schema.field("beta").is_none());
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let mut schema = schema_with(&[("name", "string")]);
        let err = schema.add_field(Expectation::new("name", "int").unwrap()).unwrap_err();
        assert!(matches!(err, VouchError::DuplicateField { .. }));
        assert_eq!(schema.keys(), ["name"]);
    }

    #[test]
    fn contract_is_cached_until_mutation() {
        let mut schema = schema_with(&[("name", "string")]);
        assert!(!schema.is_contract_cached());
        let first = schema.contract().unwrap();
        let second = schema.contract().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        schema.add_field(Expectation::new("age", "int").unwrap()).unwrap();
        assert!(!schema.is_contract_cached());
        assert_eq!(schema.contract().unwrap().fields().len(), 2);

        schema.add_rule(Rule::field("age", |_| {})).unwrap();
        assert!(!schema.is_contract_cached());
    }

    #[test]
    fn failed_compilation_is_not_cached() {
        let mut schema = schema_with(&[("name", "string")]);
        schema.add_rule(Rule::field("missing", |_| {})).unwrap();
        assert!(schema.contract().is_err());
        assert!(!schema.is_contract_cached());
    }

    #[test]
    fn reset_clears_fields_and_rules() {
        let mut schema = schema_with(&[("name", "string")]);
        schema.add_rule(Rule::global(|_| {})).unwrap();
        schema.contract().unwrap();
        schema.reset().unwrap();
        assert!(schema.keys().is_empty());
        assert!(schema.rules().is_empty());
        assert!(!schema.is_contract_cached());
    }

    #[test]
    fn duplicate_is_independent() {
        let original = schema_with(&[("name", "string")]);
        let mut copy = original.duplicate();
        copy.add_field(Expectation::new("age", "int").unwrap()).unwrap();
        assert_eq!(original.keys(), ["name"]);
        assert_eq!(copy.keys(), ["name", "age"]);
        assert!(Arc::ptr_eq(&original.fields()[0], &copy.fields()[0]));
    }

    #[test]
    fn frozen_schema_rejects_mutation() {
        let mut schema = schema_with(&[("name", "string")]);
        schema.freeze();
        assert!(schema.is_frozen());
        assert!(matches!(
            schema.add_field(Expectation::new("age", "int").unwrap()),
            Err(VouchError::FrozenMutation(name)) if name == "inputs"
        ));
        assert!(matches!(schema.add_rule(Rule::global(|_| {})), Err(VouchError::FrozenMutation(_))));
        assert!(matches!(schema.reset(), Err(VouchError::FrozenMutation(_))));

        assert!(!schema.duplicate().is_frozen());
        assert!(schema.validate(&data! { "name" => "x" }, &Context::new()).unwrap().success());
    }

    #[test]
    fn validate_uses_the_contract() {
        let schema = schema_with(&[("age", "int")]);
        let result = schema.validate(&data! { "age" => "7" }, &Context::new()).unwrap();
        assert_eq!(result.get("age"), Some(&Value::Int(7)));
    }
}
