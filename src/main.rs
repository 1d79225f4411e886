//! Command-line interface for schemacast

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use schemacast::{Loader, SchemaBuilder, Validator};
#[cfg(feature = "cli")]
use serde_json::Value;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "schemacast")]
#[command(author, version, about = "Validate and cast JSON values against composable schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON value against a schema document and print the cast value
    Validate {
        /// Path to the schema document
        #[arg(short, long, value_name = "SCHEMA")]
        schema: PathBuf,

        /// Path to the JSON file to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reject unknown keywords in the schema document
        #[arg(long)]
        strict: bool,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Build a schema document and print its normalized export
    Export {
        /// Path to the schema document
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Reject unknown keywords in the schema document
        #[arg(long)]
        strict: bool,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the registered type names
    Types,
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            schema,
            file,
            strict,
            pretty,
        } => cmd_validate(schema, file, strict, pretty),
        Commands::Export {
            schema,
            strict,
            pretty,
        } => cmd_export(schema, strict, pretty),
        Commands::Types => cmd_types(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "cli")]
fn to_json(value: &impl serde::Serialize, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Returns whether the value was accepted
#[cfg(feature = "cli")]
fn cmd_validate(
    schema_path: PathBuf,
    file: PathBuf,
    strict: bool,
    pretty: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let schema = SchemaBuilder::new()
        .with_deny_unknown_keywords(strict)
        .from_file(&schema_path)?;
    let value: Value = Loader::new().load_path(&file)?;

    let (cast, failure) = schema.validate(&value).into_parts();
    match failure {
        None => {
            println!("{}", to_json(&cast, pretty)?);
            Ok(true)
        }
        Some(failure) => {
            tracing::debug!(file = %file.display(), kind = %failure.kind, "value rejected");
            println!("{}", to_json(&failure, pretty)?);
            Ok(false)
        }
    }
}

#[cfg(feature = "cli")]
fn cmd_export(
    schema_path: PathBuf,
    strict: bool,
    pretty: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let schema = SchemaBuilder::new()
        .with_deny_unknown_keywords(strict)
        .from_file(&schema_path)?;
    println!("{}", to_json(&schema.to_document(), pretty)?);
    Ok(true)
}

#[cfg(feature = "cli")]
fn cmd_types() -> Result<bool, Box<dyn std::error::Error>> {
    let builder = SchemaBuilder::new();
    for name in builder.registry().type_names() {
        println!("{}", name);
    }
    Ok(true)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
