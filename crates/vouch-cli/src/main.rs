//! # vouch CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vouch_cli::keys::{run_keys, KeysArgs};
use vouch_cli::validate::{run_validate, ValidateArgs};

/// Validate data documents against declared schemas, filling defaults and
/// repairing failing fields with fallbacks.
#[derive(Parser, Debug)]
#[command(name = "vouch", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Validate(ValidateArgs),

    /// List the fields of a schema.
    Keys(KeysArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Keys(args) => run_keys(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from([
            "vouch",
            "validate",
            "--schema-file",
            "decl.yaml",
            "--schema",
            "params",
            "--data",
            "doc.json",
            "--format",
            "json",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, "params");
        assert!(args.context.is_none());
        assert_eq!(args.format, vouch_cli::validate::OutputFormat::Json);
    }

    #[test]
    fn cli_parse_keys_with_verbosity() {
        let cli = Cli::try_parse_from(["vouch", "-vv", "keys", "--schema-file", "d.yaml", "--schema", "inputs"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Keys(_)));
    }

    #[test]
    fn cli_requires_schema() {
        assert!(Cli::try_parse_from(["vouch", "validate", "--schema-file", "d.yaml", "--data", "x.json"]).is_err());
    }
}
