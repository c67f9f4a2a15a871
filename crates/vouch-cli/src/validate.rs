//! # Validate Subcommand
//!
//! `vouch validate --schema-file <decl> --schema <name> --data <doc>
//! [--context <ctx>] [--format text|json]`
//!
//! Exit status is 0 when the document is valid and 1 when it is not.
//! Loading and declaration problems are returned as errors.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use vouch_core::Context;
use vouch_schema::ValidationResult;

use crate::declaration::Declaration;
use crate::document::load_data;

/// Arguments for `vouch validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Declaration file (YAML or JSON).
    #[arg(long)]
    pub schema_file: PathBuf,

    /// Schema to validate against.
    #[arg(long)]
    pub schema: String,

    /// Document to validate (YAML or JSON mapping).
    #[arg(long)]
    pub data: PathBuf,

    /// Context map made available to rules.
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object.
    Json,
}

/// Machine-readable report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Schema that was validated.
    pub schema: &'a str,
    /// Whether the document passed.
    pub valid: bool,
    /// Values and errors.
    #[serde(flatten)]
    pub result: &'a ValidationResult,
}

/// Execute `vouch validate`.
///
/// # Errors
///
/// Unreadable files, malformed declarations and unknown schemas.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let declaration = Declaration::load(&args.schema_file)?;
    let namespace = declaration
        .build()
        .with_context(|| format!("loading {}", args.schema_file.display()))?;
    let data = load_data(&args.data)?;
    let context = match &args.context {
        Some(path) => load_data(path)?,
        None => Context::new(),
    };

    let result = namespace.validate(&args.schema, &data, &context)?;
    tracing::info!(
        schema = %args.schema,
        valid = result.success(),
        errors = result.error_count(),
        "validated document"
    );

    let output = match args.format {
        OutputFormat::Text => render_text(&args.schema, &result),
        OutputFormat::Json => render_json(&args.schema, &result)?,
    };
    print!("{output}");
    Ok(if result.success() { 0 } else { 1 })
}

/// Render a result as text.
pub fn render_text(schema: &str, result: &ValidationResult) -> String {
    let mut out = String::new();
    if result.success() {
        let _ = writeln!(out, "OK: {schema} is valid");
        for (field, value) in result.values() {
            let _ = writeln!(out, "  {field}: {value}");
        }
    } else {
        let _ = writeln!(out, "FAIL: {schema} has {} error(s)", result.error_count());
        for (field, messages) in result.errors() {
            for message in messages {
                let _ = writeln!(out, "  {field}: {message}");
            }
        }
        for message in result.base_errors() {
            let _ = writeln!(out, "  {message}");
        }
    }
    out
}

/// Render a result as pretty JSON.
///
/// # Errors
///
/// Serialization failures.
pub fn render_json(schema: &str, result: &ValidationResult) -> Result<String> {
    let report = Report {
        schema,
        valid: result.success(),
        result,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use vouch_core::data;

    fn result_for(data: vouch_core::Data) -> ValidationResult {
        let decl = Declaration::parse(
            "schemas:\n  - name: inputs\n    fields:\n      - name: age\n        type: int\n",
            Path::new("d.yaml"),
        )
        .unwrap();
        decl.build().unwrap().validate("inputs", &data, &Context::new()).unwrap()
    }

    #[test]
    fn text_report() {
        let ok = render_text("inputs", &result_for(data! { "age" => "42" }));
        assert_eq!(ok, "OK: inputs is valid\n  age: 42\n");

        let failed = render_text("inputs", &result_for(data! {}));
        assert_eq!(failed, "FAIL: inputs has 1 error(s)\n  age: is missing\n");
    }

    #[test]
    fn json_report() {
        let json = render_json("inputs", &result_for(data! { "age" => "x" })).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({
                "schema": "inputs",
                "valid": false,
                "values": {},
                "errors": { "age": ["must be an integer"] }
            })
        );
    }
}
