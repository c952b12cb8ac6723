//! Generate command implementation

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::codegen::Dialect;
use crate::error::GenResult;
use crate::generator;
use crate::manifest::Manifest;

/// Run a full generation cycle from a manifest
///
/// Loads the route table and schema declarations, rotates the bypass secret,
/// and emits one server file plus wrapper script per group.
///
/// # Examples
///
/// Generate with manifest defaults:
///   mcp-routegen generate --manifest routes.json
///
/// Override the dialect and output directory:
///   mcp-routegen generate --manifest routes.json --dialect mcp-gem --output tmp/mcp
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Manifest file describing routes, schemas, and configuration
    #[arg(long, short = 'm', value_name = "FILE")]
    pub manifest: PathBuf,

    /// Output directory for emitted files
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output dialect
    #[arg(long, value_enum, value_name = "DIALECT")]
    pub dialect: Option<Dialect>,

    /// Origin server base URL the generated proxies call back to
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Additional env-var names forwarded into every tool (repeatable)
    #[arg(long = "env", value_name = "VAR")]
    pub env_vars: Vec<String>,
}

impl GenerateCommand {
    /// Execute the generate command
    ///
    /// # Errors
    ///
    /// Returns manifest, schema, or bypass-key errors; per-group emission
    /// failures are logged by the generator and do not fail the run.
    pub fn execute(self) -> GenResult<()> {
        let manifest = Manifest::from_path(&self.manifest)?;
        let registry = manifest.build_registry()?;

        let mut config = manifest.generator_config();
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        for var in self.env_vars {
            if !config.env_vars.contains(&var) {
                config.env_vars.push(var);
            }
        }

        info!(manifest = %self.manifest.display(), dialect = %config.dialect, "starting generation");
        let written = generator::generate(&manifest.routes, &registry, &config)?;

        if written.is_empty() {
            println!("{} no exported routes, nothing generated", "!".yellow().bold());
            return Ok(());
        }
        println!("{} generated {} file(s):", "✓".green().bold(), written.len());
        for path in &written {
            println!("  {}", path.display());
        }
        Ok(())
    }
}
