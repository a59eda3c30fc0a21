//! Forge command - Render specification documents as text reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use forge_spec::{ForgeConfig, OutputFormat, SpecForge, SpecReader};

use super::CliError;

#[derive(Args)]
pub struct ForgeArgs {
    /// Specification documents (.yaml, .yml or .json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Report format
    #[arg(short, long, env = "SPECFORGE_FORMAT")]
    pub format: Option<String>,

    /// Render every document even if an identical one was already rendered
    #[arg(long, env = "SPECFORGE_NO_CACHE")]
    pub no_cache: bool,

    /// Spaces per nesting level
    #[arg(long, env = "SPECFORGE_INDENT")]
    pub indent: Option<usize>,

    /// Write the reports to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file with forge settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: ForgeArgs) -> Result<()> {
    let config = apply_overrides(load_config(args.config.as_deref())?, &args)?;
    info!(
        "Forging {} document(s) as {} (cache {})",
        args.files.len(),
        config.format,
        if config.cache_enabled { "on" } else { "off" }
    );

    let format = config.format;
    let forge = SpecForge::new(config);

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let raw = SpecReader::read_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let report = forge
            .forge(&raw, format)
            .with_context(|| format!("Failed to forge {}", path.display()))?;
        reports.push(report);
    }

    if let Some(cache) = forge.cache() {
        let stats = cache.statistics();
        debug!("Report cache: {} hit(s), {} miss(es)", stats.hits, stats.misses);
    }

    let output = format!("{}\n", reports.join("\n\n"));
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, output)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} report(s) to {:?}", reports.len(), path);
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Defaults, or the settings in `path` when one is given.
fn load_config(path: Option<&Path>) -> Result<ForgeConfig> {
    let Some(path) = path else {
        return Ok(ForgeConfig::default());
    };
    let config = ForgeConfig::from_toml_file(path).map_err(|source| CliError::InvalidConfig {
        path: path.display().to_string(),
        source,
    })?;
    Ok(config)
}

/// Environment variables and flags win over the config file.
fn apply_overrides(mut config: ForgeConfig, args: &ForgeArgs) -> Result<ForgeConfig> {
    if let Some(format) = &args.format {
        config = config.format(format.parse::<OutputFormat>()?);
    }
    if args.no_cache {
        config = config.cache(false);
    }
    if let Some(width) = args.indent {
        config = config.indent_width(width);
    }
    Ok(config)
}
