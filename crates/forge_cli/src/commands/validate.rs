//! Validate command - Check specification documents.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_spec::{
    CollectedDiagnostics, Normalizer, RawDocument, SpecReader, SpecValidator, ValidationResult,
};

use super::CliError;

#[derive(Args)]
pub struct ValidateArgs {
    /// Specification documents (.yaml, .yml or .json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating {} document(s)", args.files.len());

    let mut failed = 0;
    for path in &args.files {
        println!("📋 Validating {}...", path.display());

        let raw = SpecReader::read_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let result = check(&raw);

        let passed = result.valid && !(args.strict && !result.warnings.is_empty());
        if passed {
            println!("   ✅ Validation passed");
        } else {
            failed += 1;
            println!("   ❌ Validation failed:");
            for error in &result.errors {
                println!("      - {}", error);
            }
        }

        for warning in &result.warnings {
            println!("   ⚠️  {}", warning);
        }
    }

    println!();
    if failed == 0 {
        println!("✅ All validations passed!");
        Ok(())
    } else {
        println!("❌ Some validations failed. Please fix the issues above.");
        Err(CliError::ValidationFailed {
            failed,
            total: args.files.len(),
        }
        .into())
    }
}

/// Document checks, then normalization diagnostics and model checks when the
/// document is complete enough to normalize.
fn check(raw: &RawDocument) -> ValidationResult {
    let mut result = SpecValidator::validate_document(raw);
    if !result.valid {
        return result;
    }

    let diagnostics = CollectedDiagnostics::new();
    match Normalizer::new(&diagnostics).normalize(raw) {
        Ok(spec) => {
            result.add_diagnostics(diagnostics.items());
            result.merge(SpecValidator::validate_specification(&spec));
        }
        Err(e) => result.add_error(e.to_string()),
    }
    result
}
