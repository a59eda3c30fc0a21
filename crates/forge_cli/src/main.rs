//! SpecForge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Validation failure
//! - 4: Parse failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forge_spec::ForgeError;

mod commands;

use commands::{Cli, CliError, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const PARSE_FAILURE: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins unless --verbose asks for everything
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !cli.verbose => filter,
        _ => EnvFilter::new(default_directives(cli.verbose, cli.quiet)),
    };
    // Already initialized is fine
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Forge(args) => commands::forge::execute(args).await,
        Commands::Validate(args) => commands::validate::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn default_directives(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "forge_spec=debug,forge_cli=debug,warn"
    } else if quiet {
        "forge_spec=warn,forge_cli=warn,warn"
    } else {
        "forge_spec=info,forge_cli=info,warn"
    }
}

/// Exit code for the outermost CLI or pipeline error in the chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CliError>() {
            return err.exit_code();
        }
        if let Some(err) = cause.downcast_ref::<ForgeError>() {
            return forge_exit_code(err);
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn forge_exit_code(err: &ForgeError) -> u8 {
    if err.is_parse_failure() {
        ExitCodes::PARSE_FAILURE
    } else if err.is_validation_failure() {
        ExitCodes::VALIDATION_FAILURE
    } else if matches!(err, ForgeError::NotFound(_) | ForgeError::UnsupportedFormat(_)) {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
