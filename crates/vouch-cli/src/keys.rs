//! # Keys Subcommand
//!
//! `vouch keys --schema-file <decl> --schema <name>` lists a schema's
//! fields in declaration order with their type and whether they are
//! required.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use vouch_schema::Schema;

use crate::declaration::Declaration;

/// Arguments for `vouch keys`.
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Declaration file (YAML or JSON).
    #[arg(long)]
    pub schema_file: PathBuf,

    /// Schema to describe.
    #[arg(long)]
    pub schema: String,
}

/// Execute `vouch keys`.
///
/// # Errors
///
/// Unreadable files, malformed declarations and unknown schemas.
pub fn run_keys(args: &KeysArgs) -> Result<u8> {
    let namespace = Declaration::load(&args.schema_file)?.build()?;
    print!("{}", describe(namespace.schema(&args.schema)?));
    Ok(0)
}

/// One line per field: `name: type (required|optional)`, plus markers for
/// defaults and fallbacks.
pub fn describe(schema: &Schema) -> String {
    let mut out = String::new();
    for field in schema.fields() {
        let presence = if field.is_required() { "required" } else { "optional" };
        let _ = write!(out, "{}: {} ({presence})", field.name(), field.coercer().name());
        if field.has_default() {
            out.push_str(" [default]");
        }
        if field.has_fallback() {
            out.push_str(" [fallback]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn describes_fields_in_order() {
        let text = r#"
schemas:
  - name: params
    fields:
      - name: per_page
        type: int
        default: 10
        fallback: 25
      - name: query
        type: string
      - name: tags
        type: [array, string]
        optional: true
"#;
        let ns = Declaration::parse(text, Path::new("d.yaml")).unwrap().build().unwrap();
        let description = describe(ns.schema("params").unwrap());
        let lines: Vec<&str> = description.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("per_page: "));
        assert!(lines[0].ends_with("(optional) [default] [fallback]"));
        assert_eq!(lines[1], "query: string (required)");
        assert!(lines[2].starts_with("tags: "));
        assert!(lines[2].contains("(optional)"));
    }
}
