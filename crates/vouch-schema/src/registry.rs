//! # Namespace Registry
//!
//! A [`Namespace`] owns the schemas declared for one owner type together
//! with the entry points generated for each of them. Entry points are
//! plain map entries, so name collisions are ordinary key conflicts.
//!
//! ## Generated entry points
//!
//! Declaring schema `inputs` installs, at namespace level:
//!
//! | Name          | Kind                | Effect                           |
//! |---------------|---------------------|----------------------------------|
//! | `input`       | field definer       | adds an [`Expectation`]          |
//! | `input_rule`  | rule definer        | adds a [`Rule`]                  |
//! | `reset_inputs`| reset               | clears fields and rules          |
//! | `inputs`      | schema accessor     | returns the [`Schema`]           |
//!
//! and, at instance level, `inputs` returning a [`BoundSchema`]. The
//! field-definer name comes from an explicit singular override or from
//! [`singularize`]; the rule-definer name wraps it in the configured
//! prefix and suffix. When the singular equals the schema name the
//! namespace-level accessor is not installed.
//!
//! ## Inheritance
//!
//! [`Namespace::child_of`] deep-copies the parent's schemas
//! ([`Schema::duplicate`]) and entry tables at construction time. Nothing
//! is shared afterwards. A child may re-declare an inherited schema, which
//! replaces its copy and entry points in the child only.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use vouch_core::{
    is_identifier, reset_method_name, rule_method_name, singularize, Configuration, Context, Data,
    VouchError, VouchResult,
};

use crate::bound::BoundSchema;
use crate::expectation::Expectation;
use crate::result::ValidationResult;
use crate::rule::Rule;
use crate::schema::Schema;

// ─── Policy & Entry Kinds ────────────────────────────────────────────

/// Where an entry point lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Called on the namespace itself.
    Namespace,
    /// Called on an owner instance.
    Instance,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Namespace => f.write_str("namespace"),
            Level::Instance => f.write_str("instance"),
        }
    }
}

/// What to do when a generated name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Abort the declaration.
    #[default]
    Error,
    /// Replace the existing entry point.
    Force,
}

impl FromStr for CollisionPolicy {
    type Err = VouchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(CollisionPolicy::Error),
            "force" => Ok(CollisionPolicy::Force),
            other => Err(VouchError::UnknownCollisionPolicy(other.to_owned())),
        }
    }
}

/// A named entry point and what it dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// Adds a field to `schema`.
    FieldDefiner { schema: String },
    /// Adds a rule to `schema`.
    RuleDefiner { schema: String },
    /// Resets `schema`.
    Reset { schema: String },
    /// Returns `schema`.
    SchemaAccessor { schema: String },
    /// Returns `schema` bound to an owner instance.
    BoundAccessor { schema: String },
    /// A name defined outside the registry.
    Reserved,
}

impl EntryPoint {
    /// The schema this entry point belongs to, if generated.
    pub fn schema(&self) -> Option<&str> {
        match self {
            EntryPoint::FieldDefiner { schema }
            | EntryPoint::RuleDefiner { schema }
            | EntryPoint::Reset { schema }
            | EntryPoint::SchemaAccessor { schema }
            | EntryPoint::BoundAccessor { schema } => Some(schema),
            EntryPoint::Reserved => None,
        }
    }
}

/// Options for [`Namespace::declare`].
#[derive(Debug, Clone, Default)]
pub struct DeclareOptions {
    /// Collision policy for generated names.
    pub collision: CollisionPolicy,
    /// Field-definer name override.
    pub singular: Option<String>,
    /// Naming configuration override for this declaration.
    pub configuration: Option<Configuration>,
}

impl DeclareOptions {
    /// Replace existing entry points.
    pub fn force(mut self) -> Self {
        self.collision = CollisionPolicy::Force;
        self
    }

    /// Use `singular` as the field-definer name.
    pub fn singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = Some(singular.into());
        self
    }

    /// Name the rule definer with `configuration`.
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }
}

/// Names generated for one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNames {
    /// Field definer, e.g. `input`.
    pub field_definer: String,
    /// Rule definer, e.g. `input_rule`.
    pub rule_definer: String,
    /// Reset, e.g. `reset_inputs`.
    pub reset: String,
    /// Namespace-level accessor, absent when it would shadow the field definer.
    pub accessor: Option<String>,
    /// Instance-level accessor.
    pub bound_accessor: String,
}

impl EntryNames {
    fn namespace_level(&self, schema: &str) -> Vec<(String, EntryPoint)> {
        let schema = schema.to_owned();
        let mut entries = vec![
            (self.field_definer.clone(), EntryPoint::FieldDefiner { schema: schema.clone() }),
            (self.rule_definer.clone(), EntryPoint::RuleDefiner { schema: schema.clone() }),
            (self.reset.clone(), EntryPoint::Reset { schema: schema.clone() }),
        ];
        if let Some(accessor) = &self.accessor {
            entries.push((accessor.clone(), EntryPoint::SchemaAccessor { schema }));
        }
        entries
    }
}

// ─── Namespace ───────────────────────────────────────────────────────

#[derive(Debug)]
struct SchemaEntry {
    schema: Schema,
    names: EntryNames,
    inherited: bool,
}

/// Per-owner registry of schemas and their entry points.
#[derive(Debug)]
pub struct Namespace {
    name: String,
    configuration: Configuration,
    schemas: BTreeMap<String, SchemaEntry>,
    namespace_entries: BTreeMap<String, EntryPoint>,
    instance_entries: BTreeMap<String, EntryPoint>,
}

impl Namespace {
    /// An empty namespace using the current process-wide configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configuration: Configuration::current(),
            schemas: BTreeMap::new(),
            namespace_entries: BTreeMap::new(),
            instance_entries: BTreeMap::new(),
        }
    }

    /// A namespace seeded with independent copies of `parent`'s schemas and
    /// entry points.
    pub fn child_of(parent: &Namespace, name: impl Into<String>) -> Self {
        let schemas = parent
            .schemas
            .iter()
            .map(|(key, entry)| {
                let copy = SchemaEntry {
                    schema: entry.schema.duplicate(),
                    names: entry.names.clone(),
                    inherited: true,
                };
                (key.clone(), copy)
            })
            .collect();
        Self {
            name: name.into(),
            configuration: Configuration::current(),
            schemas,
            namespace_entries: parent.namespace_entries.clone(),
            instance_entries: parent.instance_entries.clone(),
        }
    }

    /// The namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration snapshot used for declarations.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Register an empty schema and its entry points.
    ///
    /// Every check runs before anything is installed, so a failed
    /// declaration leaves the namespace unchanged.
    ///
    /// # Errors
    ///
    /// - [`VouchError::InvalidConfiguration`] for an unusable schema name or
    ///   singular override, or when the rule definer would share the field
    ///   definer's name.
    /// - [`VouchError::SchemaAlreadyDefined`] if this namespace declared the
    ///   schema itself.
    /// - [`VouchError::MethodCollision`] if a generated name is taken and the
    ///   policy is [`CollisionPolicy::Error`].
    pub fn declare(&mut self, schema: &str, options: DeclareOptions) -> VouchResult<EntryNames> {
        if !is_identifier(schema) {
            return Err(VouchError::InvalidConfiguration(format!(
                "invalid schema name {schema:?}"
            )));
        }
        let replacing = match self.schemas.get(schema) {
            Some(entry) if !entry.inherited => {
                return Err(VouchError::SchemaAlreadyDefined {
                    namespace: self.name.clone(),
                    schema: schema.to_owned(),
                });
            }
            Some(_) => true,
            None => false,
        };

        let names = self.entry_names(schema, &options)?;
        let namespace_level = names.namespace_level(schema);
        let instance_level = vec![(
            names.bound_accessor.clone(),
            EntryPoint::BoundAccessor { schema: schema.to_owned() },
        )];

        let owned_by_replaced = |entry: &EntryPoint| replacing && entry.schema() == Some(schema);
        let mut forced = Vec::new();
        for (level, table, wanted) in [
            (Level::Namespace, &self.namespace_entries, &namespace_level),
            (Level::Instance, &self.instance_entries, &instance_level),
        ] {
            for (name, _) in wanted {
                match table.get(name) {
                    Some(existing) if !owned_by_replaced(existing) => match options.collision {
                        CollisionPolicy::Error => {
                            return Err(VouchError::MethodCollision {
                                name: name.clone(),
                                level: level.to_string(),
                            });
                        }
                        CollisionPolicy::Force => forced.push((level, name.clone())),
                    },
                    _ => {}
                }
            }
        }

        if replacing {
            self.remove_entries_of(schema);
        }
        for (level, name) in forced {
            tracing::warn!(
                namespace = %self.name,
                schema,
                entry = %name,
                %level,
                "replacing existing entry point"
            );
        }
        self.namespace_entries.extend(namespace_level);
        self.instance_entries.extend(instance_level);
        self.schemas.insert(
            schema.to_owned(),
            SchemaEntry {
                schema: Schema::new(schema),
                names: names.clone(),
                inherited: false,
            },
        );
        tracing::debug!(
            namespace = %self.name,
            schema,
            field_definer = %names.field_definer,
            rule_definer = %names.rule_definer,
            "declared schema"
        );
        Ok(names)
    }

    fn entry_names(&self, schema: &str, options: &DeclareOptions) -> VouchResult<EntryNames> {
        let field_definer = match &options.singular {
            Some(singular) if is_identifier(singular) => singular.clone(),
            Some(singular) => {
                return Err(VouchError::InvalidConfiguration(format!(
                    "Invalid singular option: {singular:?}"
                )));
            }
            None => singularize(schema),
        };
        let configuration = options.configuration.as_ref().unwrap_or(&self.configuration);
        let rule_definer = rule_method_name(&field_definer, configuration);
        if rule_definer == field_definer {
            return Err(VouchError::InvalidConfiguration(format!(
                "rule definer for {schema:?} would be named like its field definer {field_definer:?}"
            )));
        }
        let reset = reset_method_name(schema);
        if reset == field_definer || reset == rule_definer {
            return Err(VouchError::InvalidConfiguration(format!(
                "reset entry point {reset:?} clashes with a definer of {schema:?}"
            )));
        }
        let accessor = (field_definer != schema).then(|| schema.to_owned());
        Ok(EntryNames {
            field_definer,
            rule_definer,
            reset,
            accessor,
            bound_accessor: schema.to_owned(),
        })
    }

    fn remove_entries_of(&mut self, schema: &str) {
        self.namespace_entries.retain(|_, e| e.schema() != Some(schema));
        self.instance_entries.retain(|_, e| e.schema() != Some(schema));
    }

    /// Record a name defined outside the registry.
    ///
    /// # Errors
    ///
    /// [`VouchError::MethodCollision`] if the name is already taken.
    pub fn reserve(&mut self, name: impl Into<String>, level: Level) -> VouchResult<()> {
        let name = name.into();
        let table = self.table_mut(level);
        if table.contains_key(&name) {
            return Err(VouchError::MethodCollision {
                name,
                level: level.to_string(),
            });
        }
        table.insert(name, EntryPoint::Reserved);
        Ok(())
    }

    /// Look up an entry point.
    pub fn entry(&self, name: &str, level: Level) -> Option<&EntryPoint> {
        self.table(level).get(name)
    }

    /// Whether an entry point with this name exists.
    pub fn responds_to(&self, name: &str, level: Level) -> bool {
        self.entry(name, level).is_some()
    }

    /// Names generated for `schema`.
    pub fn names(&self, schema: &str) -> Option<&EntryNames> {
        self.schemas.get(schema).map(|e| &e.names)
    }

    /// Whether `schema` was copied from a parent and not re-declared.
    pub fn is_inherited(&self, schema: &str) -> bool {
        self.schemas.get(schema).is_some_and(|e| e.inherited)
    }

    /// Declared schema names, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Look up a schema.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`] if it was never declared.
    pub fn schema(&self, schema: &str) -> VouchResult<&Schema> {
        self.schemas
            .get(schema)
            .map(|e| &e.schema)
            .ok_or_else(|| VouchError::UnknownSchema(schema.to_owned()))
    }

    /// Look up a schema for mutation.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`] if it was never declared.
    pub fn schema_mut(&mut self, schema: &str) -> VouchResult<&mut Schema> {
        self.schemas
            .get_mut(schema)
            .map(|e| &mut e.schema)
            .ok_or_else(|| VouchError::UnknownSchema(schema.to_owned()))
    }

    /// Field names of `schema`, empty if it is unknown.
    pub fn keys(&self, schema: &str) -> Vec<&str> {
        self.schemas.get(schema).map(|e| e.schema.keys()).unwrap_or_default()
    }

    /// Add a field to `schema`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`], plus whatever [`Schema::add_field`]
    /// reports.
    pub fn add_field(&mut self, schema: &str, expectation: Expectation) -> VouchResult<Arc<Expectation>> {
        self.schema_mut(schema)?.add_field(expectation)
    }

    /// Add a rule to `schema`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`], plus whatever [`Schema::add_rule`]
    /// reports.
    pub fn add_rule(&mut self, schema: &str, rule: Rule) -> VouchResult<()> {
        self.schema_mut(schema)?.add_rule(rule)
    }

    /// Clear the fields and rules of `schema`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`] or [`VouchError::FrozenMutation`].
    pub fn reset(&mut self, schema: &str) -> VouchResult<()> {
        self.schema_mut(schema)?.reset()
    }

    /// Freeze `schema`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`] if it was never declared.
    pub fn freeze(&mut self, schema: &str) -> VouchResult<()> {
        self.schema_mut(schema)?.freeze();
        Ok(())
    }

    /// Drop every schema and its generated entry points. Reserved names
    /// stay.
    pub fn clear(&mut self) {
        self.schemas.clear();
        self.namespace_entries.retain(|_, e| *e == EntryPoint::Reserved);
        self.instance_entries.retain(|_, e| *e == EntryPoint::Reserved);
    }

    // ─── Dispatch by generated name ──────────────────────────────────

    /// Call a field definer, e.g. `define("input", ..)`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownEntryPoint`] if `field_definer` is not a field
    /// definer, plus whatever [`Schema::add_field`] reports.
    pub fn define(&mut self, field_definer: &str, expectation: Expectation) -> VouchResult<Arc<Expectation>> {
        let schema = self.dispatch(field_definer, Level::Namespace, |e| match e {
            EntryPoint::FieldDefiner { schema } => Some(schema),
            _ => None,
        })?;
        self.add_field(&schema, expectation)
    }

    /// Call a rule definer, e.g. `define_rule("input_rule", ..)`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownEntryPoint`] if `rule_definer` is not a rule
    /// definer, plus whatever [`Schema::add_rule`] reports.
    pub fn define_rule(&mut self, rule_definer: &str, rule: Rule) -> VouchResult<()> {
        let schema = self.dispatch(rule_definer, Level::Namespace, |e| match e {
            EntryPoint::RuleDefiner { schema } => Some(schema),
            _ => None,
        })?;
        self.add_rule(&schema, rule)
    }

    /// Call a reset entry point, e.g. `invoke_reset("reset_inputs")`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownEntryPoint`] or [`VouchError::FrozenMutation`].
    pub fn invoke_reset(&mut self, reset: &str) -> VouchResult<()> {
        let schema = self.dispatch(reset, Level::Namespace, |e| match e {
            EntryPoint::Reset { schema } => Some(schema),
            _ => None,
        })?;
        self.reset(&schema)
    }

    /// Call a namespace-level schema accessor.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownEntryPoint`] if `accessor` is not one.
    pub fn accessor(&self, accessor: &str) -> VouchResult<&Schema> {
        let schema = self.dispatch(accessor, Level::Namespace, |e| match e {
            EntryPoint::SchemaAccessor { schema } => Some(schema),
            _ => None,
        })?;
        self.schema(&schema)
    }

    /// Call an instance-level accessor on `owner`.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownEntryPoint`] if `accessor` is not one.
    pub fn bind<'a>(&'a self, accessor: &str, owner: &'a dyn Any) -> VouchResult<BoundSchema<'a>> {
        let schema = self.dispatch(accessor, Level::Instance, |e| match e {
            EntryPoint::BoundAccessor { schema } => Some(schema),
            _ => None,
        })?;
        Ok(BoundSchema::new(owner, self.schema(&schema)?))
    }

    /// Validate against `schema` without an owner.
    ///
    /// # Errors
    ///
    /// [`VouchError::UnknownSchema`], compilation or provider failures.
    pub fn validate(&self, schema: &str, data: &Data, context: &Context) -> VouchResult<ValidationResult> {
        self.schema(schema)?.validate(data, context)
    }

    fn dispatch(
        &self,
        name: &str,
        level: Level,
        select: impl Fn(&EntryPoint) -> Option<&String>,
    ) -> VouchResult<String> {
        self.table(level)
            .get(name)
            .and_then(select)
            .cloned()
            .ok_or_else(|| VouchError::UnknownEntryPoint(name.to_owned()))
    }

    fn table(&self, level: Level) -> &BTreeMap<String, EntryPoint> {
        match level {
            Level::Namespace => &self.namespace_entries,
            Level::Instance => &self.instance_entries,
        }
    }

    fn table_mut(&mut self, level: Level) -> &mut BTreeMap<String, EntryPoint> {
        match level {
            Level::Namespace => &mut self.namespace_entries,
            Level::Instance => &mut self.instance_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn collision_policy_parsing() {
        assert_eq!("error".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Error);
        assert_eq!("force".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Force);
        assert!(matches!(
            "ignore".parse::<CollisionPolicy>(),
            Err(VouchError::UnknownCollisionPolicy(p)) if p == "ignore"
        ));
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Error);
    }

    #[test]
    fn declare_generates_entry_points() {
        let mut ns = Namespace::new("Search");
        let names = ns.declare("inputs", DeclareOptions::default()).unwrap();
        assert_eq!(names.field_definer, "input");
        assert_eq!(names.rule_definer, "input_rule");
        assert_eq!(names.reset, "reset_inputs");
        assert_eq!(names.accessor.as_deref(), Some("inputs"));

        for name in ["input", "input_rule", "reset_inputs", "inputs"] {
            assert!(ns.responds_to(name, Level::Namespace), "{name}");
        }
        assert!(ns.responds_to("inputs", Level::Instance));
        assert_eq!(
            ns.entry("input", Level::Namespace),
            Some(&EntryPoint::FieldDefiner { schema: "inputs".into() })
        );
        assert!(ns.schema("inputs").unwrap().keys().is_empty());
    }

    #[test]
    fn singular_override() {
        let mut ns = Namespace::new("Records");
        let names = ns.declare("data", DeclareOptions::default().singular("datum")).unwrap();
        assert_eq!(names.field_definer, "datum");
        assert_eq!(names.rule_definer, "datum_rule");

        let err = ns.declare("rows", DeclareOptions::default().singular("123")).unwrap_err();
        assert!(matches!(err, VouchError::InvalidConfiguration(m) if m.contains("Invalid singular option")));
        assert!(ns.schema("rows").is_err());
    }

    #[test]
    fn uncountable_schema_has_no_separate_accessor() {
        let mut ns = Namespace::new("Listing");
        let names = ns.declare("series", DeclareOptions::default()).unwrap();
        assert_eq!(names.field_definer, "series");
        assert_eq!(names.accessor, None);
        assert!(ns.accessor("series").is_err());
        assert!(ns.schema("series").is_ok());
    }

    #[test]
    fn params_schema_gets_singular_definers_and_an_accessor() {
        let mut ns = Namespace::new("Listing");
        let names = ns.declare("params", DeclareOptions::default()).unwrap();
        assert_eq!(names.field_definer, "param");
        assert_eq!(names.rule_definer, "param_rule");
        assert_eq!(names.accessor.as_deref(), Some("params"));
        assert!(ns.accessor("params").is_ok());
    }

    #[test]
    fn redeclaring_fails() {
        let mut ns = Namespace::new("Search");
        ns.declare("inputs", DeclareOptions::default()).unwrap();
        let err = ns.declare("inputs", DeclareOptions::default()).unwrap_err();
        assert!(matches!(err, VouchError::SchemaAlreadyDefined { .. }));
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn configuration_override_names_rule_definer() {
        let mut ns = Namespace::new("Search");
        let config = Configuration {
            rule_prefix: Some(Cow::Borrowed("validate")),
            rule_suffix: None,
        };
        let names = ns.declare("inputs", DeclareOptions::default().configuration(config)).unwrap();
        assert_eq!(names.rule_definer, "validate_input");
        assert!(ns.responds_to("validate_input", Level::Namespace));
        assert!(!ns.responds_to("input_rule", Level::Namespace));
    }

    #[test]
    fn rule_definer_must_differ_from_field_definer() {
        let mut ns = Namespace::new("Search");
        let config = Configuration {
            rule_prefix: None,
            rule_suffix: None,
        };
        let err = ns.declare("inputs", DeclareOptions::default().configuration(config)).unwrap_err();
        assert!(matches!(err, VouchError::InvalidConfiguration(_)));
    }

    #[test]
    fn collision_with_error_policy_leaves_namespace_unchanged() {
        let mut ns = Namespace::new("Search");
        ns.reserve("input", Level::Namespace).unwrap();
        let err = ns.declare("inputs", DeclareOptions::default()).unwrap_err();
        assert!(matches!(err, VouchError::MethodCollision { ref name, ref level } if name == "input" && level == "namespace"));
        assert!(ns.schema_names().is_empty());
        assert!(!ns.responds_to("input_rule", Level::Namespace));

        let mut ns = Namespace::new("Search");
        ns.reserve("inputs", Level::Instance).unwrap();
        let err = ns.declare("inputs", DeclareOptions::default()).unwrap_err();
        assert!(matches!(err, VouchError::MethodCollision { ref level, .. } if level == "instance"));
    }

    #[test]
    fn force_policy_replaces_entry_points() {
        let mut ns = Namespace::new("Search");
        ns.reserve("input", Level::Namespace).unwrap();
        ns.reserve("inputs", Level::Instance).unwrap();
        ns.declare("inputs", DeclareOptions::default().force()).unwrap();
        assert_eq!(
            ns.entry("inputs", Level::Instance),
            Some(&EntryPoint::BoundAccessor { schema: "inputs".into() })
        );
        ns.define("input", Expectation::new("name", "string").unwrap()).unwrap();
        assert_eq!(ns.schema("inputs").unwrap().fields().len(), 1);
    }

    #[test]
    fn dispatch_by_generated_names() {
        let mut ns = Namespace::new("Search");
        ns.declare("inputs", DeclareOptions::default()).unwrap();
        ns.define("input", Expectation::new("name", "string").unwrap()).unwrap();
        ns.define_rule("input_rule", Rule::field("name", |_| {})).unwrap();
        assert_eq!(ns.accessor("inputs").unwrap().keys(), ["name"]);
        assert_eq!(ns.keys("inputs"), ["name"]);
        assert!(ns.keys("outputs").is_empty());

        assert!(matches!(
            ns.define("input_rule", Expectation::new("x", "int").unwrap()),
            Err(VouchError::UnknownEntryPoint(_))
        ));

        ns.invoke_reset("reset_inputs").unwrap();
        assert!(ns.schema("inputs").unwrap().fields().is_empty());
        assert!(ns.schema("inputs").unwrap().rules().is_empty());
    }

    #[test]
    fn child_gets_independent_copies() {
        let mut parent = Namespace::new("Parent");
        parent.declare("inputs", DeclareOptions::default()).unwrap();
        parent.define("input", Expectation::new("name", "string").unwrap()).unwrap();

        let mut child = Namespace::child_of(&parent, "Child");
        assert!(child.is_inherited("inputs"));
        child.define("input", Expectation::new("age", "int").unwrap()).unwrap();

        assert_eq!(parent.keys("inputs"), ["name"]);
        assert_eq!(child.keys("inputs"), ["name", "age"]);

        parent.define("input", Expectation::new("email", "string").unwrap()).unwrap();
        assert_eq!(child.keys("inputs"), ["name", "age"]);
    }

    #[test]
    fn child_may_redeclare_inherited_schema() {
        let mut parent = Namespace::new("Parent");
        parent.declare("inputs", DeclareOptions::default()).unwrap();
        parent.define("input", Expectation::new("name", "string").unwrap()).unwrap();

        let mut child = Namespace::child_of(&parent, "Child");
        child.declare("inputs", DeclareOptions::default()).unwrap();
        assert!(!child.is_inherited("inputs"));
        assert!(child.keys("inputs").is_empty());
        assert_eq!(parent.keys("inputs"), ["name"]);

        assert!(child.declare("inputs", DeclareOptions::default()).is_err());
    }

    #[test]
    fn clear_keeps_reserved_names() {
        let mut ns = Namespace::new("Search");
        ns.reserve("call", Level::Instance).unwrap();
        ns.declare("inputs", DeclareOptions::default()).unwrap();
        ns.clear();
        assert!(ns.schema_names().is_empty());
        assert!(!ns.responds_to("input", Level::Namespace));
        assert!(ns.responds_to("call", Level::Instance));
        ns.declare("inputs", DeclareOptions::default()).unwrap();
    }

    #[test]
    fn freeze_by_name() {
        let mut ns = Namespace::new("Search");
        ns.declare("inputs", DeclareOptions::default()).unwrap();
        ns.freeze("inputs").unwrap();
        assert!(matches!(
            ns.define("input", Expectation::new("name", "string").unwrap()),
            Err(VouchError::FrozenMutation(_))
        ));
        assert!(matches!(ns.freeze("outputs"), Err(VouchError::UnknownSchema(_))));
    }
}
