//! CLI command definitions.
//!
//! Each subcommand is a thin async wrapper around the `forge_spec` pipeline.

use clap::{Parser, Subcommand};

use forge_spec::ForgeError;

use crate::ExitCodes;

pub mod forge;
pub mod validate;

/// SpecForge - specification document normalizer
#[derive(Parser)]
#[command(name = "specforge")]
#[command(version, about = "SpecForge - normalize specification documents into text reports")]
#[command(long_about = r#"
SpecForge reads loosely structured YAML or JSON specification documents,
normalizes them into a fully typed model and renders a deterministic
plain-text report.

COMMANDS:
  forge     → Render one report per document
  validate  → Check documents for missing or suspicious content

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Validation failure
  4 - Parse failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render specification documents as text reports
    Forge(forge::ForgeArgs),

    /// Validate specification documents
    Validate(validate::ValidateArgs),
}

/// Failures that originate in the CLI rather than the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid configuration in {path}: {source}")]
    InvalidConfig {
        path: String,
        #[source]
        source: ForgeError,
    },

    #[error("Validation failed for {failed} of {total} document(s)")]
    ValidationFailed { failed: usize, total: usize },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig { .. } => ExitCodes::INVALID_ARGS,
            Self::ValidationFailed { .. } => ExitCodes::VALIDATION_FAILURE,
        }
    }
}
