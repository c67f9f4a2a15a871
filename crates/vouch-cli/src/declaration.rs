//! # Declaration Files
//!
//! Loads a YAML or JSON file describing a namespace's schemas and builds
//! the [`Namespace`] from it.
//!
//! ```yaml
//! namespace: Listing
//! configuration:
//!   rule_suffix: check
//! schemas:
//!   - name: params
//!     collision: error
//!     fields:
//!       - name: per_page
//!         type: int
//!         default: 10
//!         fallback: 25
//!       - name: tags
//!         type: [array, string]
//!         optional: true
//!     rules:
//!       - field: per_page
//!         range: { min: 1, max: 100 }
//! ```
//!
//! Fields keep file order. Rules are compiled by [`crate::checks`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vouch_core::{Configuration, TypeDescriptor, Value, VouchError};
use vouch_schema::{CollisionPolicy, DeclareOptions, Expectation, Namespace};

use crate::checks::RuleDecl;

/// Errors raised while loading a declaration or a document.
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML/JSON for its expected shape.
    #[error("cannot parse {path}: {message}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A declarative rule is malformed.
    #[error("invalid rule in schema {schema:?}: {message}")]
    InvalidRule {
        /// Schema the rule belongs to.
        schema: String,
        /// What is wrong with it.
        message: String,
    },

    /// The library rejected the declaration.
    #[error(transparent)]
    Vouch(#[from] VouchError),
}

/// A whole declaration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    /// Namespace name, used in messages.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Rule-definer naming for every schema in the file.
    #[serde(default)]
    pub configuration: Option<Configuration>,
    /// Schemas in declaration order.
    #[serde(default)]
    pub schemas: Vec<SchemaDecl>,
}

fn default_namespace() -> String {
    "vouch".to_owned()
}

/// One schema.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    /// Schema name.
    pub name: String,
    /// Field-definer override.
    #[serde(default)]
    pub singular: Option<String>,
    /// `error` (default) or `force`.
    #[serde(default)]
    pub collision: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Rules in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleDecl>,
}

/// One field.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// A tag (`int`) or the nested shape `[array, tag]`.
    #[serde(default, rename = "type")]
    pub type_decl: Option<TypeDecl>,
    /// Accept absence and `null`.
    #[serde(default)]
    pub optional: bool,
    /// Immediate default.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Immediate fallback.
    #[serde(default)]
    pub fallback: Option<serde_json::Value>,
}

/// A declared type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    /// A primitive tag.
    Tag(String),
    /// A nested shape.
    Nested(Vec<TypeDecl>),
}

impl From<&TypeDecl> for TypeDescriptor {
    fn from(decl: &TypeDecl) -> Self {
        match decl {
            TypeDecl::Tag(tag) => TypeDescriptor::tag(tag.as_str()),
            TypeDecl::Nested(parts) => TypeDescriptor::Nested(parts.iter().map(Into::into).collect()),
        }
    }
}

impl Declaration {
    /// Read and parse a declaration. `.json` files are parsed as JSON,
    /// everything else as YAML.
    ///
    /// # Errors
    ///
    /// [`DeclarationError::Io`] or [`DeclarationError::Parse`].
    pub fn load(path: &Path) -> Result<Self, DeclarationError> {
        let content = read(path)?;
        Self::parse(&content, path)
    }

    /// Parse declaration text; `origin` decides the format and is used in
    /// messages.
    ///
    /// # Errors
    ///
    /// [`DeclarationError::Parse`].
    pub fn parse(content: &str, origin: &Path) -> Result<Self, DeclarationError> {
        parse_as(content, origin)
    }

    /// Build the namespace: declare every schema, then add its fields and
    /// rules.
    ///
    /// # Errors
    ///
    /// Library errors (unknown type tags, collisions, duplicates) and
    /// malformed rules.
    pub fn build(&self) -> Result<Namespace, DeclarationError> {
        let mut ns = Namespace::new(&self.namespace);
        for schema in &self.schemas {
            let collision = match &schema.collision {
                Some(policy) => policy.parse::<CollisionPolicy>()?,
                None => CollisionPolicy::Error,
            };
            let options = DeclareOptions {
                collision,
                singular: schema.singular.clone(),
                configuration: self.configuration.clone(),
            };
            ns.declare(&schema.name, options)?;

            for field in &schema.fields {
                ns.add_field(&schema.name, field.to_expectation()?)?;
            }
            for rule in &schema.rules {
                let rule = rule.compile(&schema.name, &schema.fields)?;
                ns.add_rule(&schema.name, rule)?;
            }
            ns.schema(&schema.name)?.contract()?;
            ns.freeze(&schema.name)?;
            tracing::debug!(
                namespace = %self.namespace,
                schema = %schema.name,
                fields = schema.fields.len(),
                rules = schema.rules.len(),
                "loaded schema"
            );
        }
        Ok(ns)
    }
}

impl FieldDecl {
    fn to_expectation(&self) -> Result<Expectation, VouchError> {
        let mut builder = Expectation::builder(&self.name);
        if let Some(type_decl) = &self.type_decl {
            builder = builder.typed(TypeDescriptor::from(type_decl));
        }
        if self.optional {
            builder = builder.optional();
        }
        if let Some(default) = &self.default {
            builder = builder.default_value(Value::from_json(default));
        }
        if let Some(fallback) = &self.fallback {
            builder = builder.fallback_value(Value::from_json(fallback));
        }
        builder.build()
    }
}

pub(crate) fn read(path: &Path) -> Result<String, DeclarationError> {
    std::fs::read_to_string(path).map_err(|source| DeclarationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_as<T: serde::de::DeserializeOwned>(
    content: &str,
    origin: &Path,
) -> Result<T, DeclarationError> {
    let is_json = origin.extension().is_some_and(|ext| ext == "json");
    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| DeclarationError::Parse {
        path: origin.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::{data, Context};

    fn yaml(text: &str) -> Declaration {
        Declaration::parse(text, Path::new("decl.yaml")).unwrap()
    }

    const LISTING: &str = r#"
namespace: Listing
schemas:
  - name: params
    fields:
      - name: per_page
        type: int
        default: 200
        fallback: 25
      - name: tags
        type: [array, string]
        optional: true
    rules:
      - field: per_page
        range: { min: 1, max: 100 }
"#;

    #[test]
    fn builds_namespace_from_yaml() {
        let ns = yaml(LISTING).build().unwrap();
        assert_eq!(ns.name(), "Listing");
        assert_eq!(ns.keys("params"), ["per_page", "tags"]);
        assert!(ns.schema("params").unwrap().is_frozen());

        let result = ns.validate("params", &data! {}, &Context::new()).unwrap();
        assert!(result.success());
        assert_eq!(result.get("per_page"), Some(&Value::Int(25)));
    }

    #[test]
    fn parses_json_declarations() {
        let text = r#"{"schemas": [{"name": "inputs", "fields": [{"name": "age", "type": "integer"}]}]}"#;
        let decl = Declaration::parse(text, Path::new("decl.json")).unwrap();
        assert_eq!(decl.namespace, "vouch");
        let ns = decl.build().unwrap();
        assert_eq!(ns.keys("inputs"), ["age"]);
    }

    #[test]
    fn unknown_type_tag_is_reported() {
        let decl = yaml("schemas:\n  - name: inputs\n    fields:\n      - name: age\n        type: number\n");
        let err = decl.build().unwrap_err();
        assert!(matches!(err, DeclarationError::Vouch(VouchError::UnknownTypeTag(_))));
    }

    #[test]
    fn unknown_collision_policy_is_reported() {
        let decl = yaml("schemas:\n  - name: inputs\n    collision: ignore\n");
        let err = decl.build().unwrap_err();
        assert!(matches!(err, DeclarationError::Vouch(VouchError::UnknownCollisionPolicy(_))));
    }

    #[test]
    fn configuration_applies_to_every_schema() {
        let decl = yaml("configuration:\n  rule_prefix: check\n  rule_suffix: null\nschemas:\n  - name: inputs\n");
        let ns = decl.build().unwrap();
        assert_eq!(ns.names("inputs").unwrap().rule_definer, "check_input");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Declaration::parse("schemas:\n  - name: inputs\n    feilds: []\n", Path::new("d.yaml"))
            .unwrap_err();
        assert!(matches!(err, DeclarationError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Declaration::load(Path::new("/nonexistent/decl.yaml")).unwrap_err();
        assert!(matches!(err, DeclarationError::Io { .. }));
    }
}
