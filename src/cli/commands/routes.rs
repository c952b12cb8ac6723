//! Routes command implementation

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::error::GenResult;
use crate::manifest::Manifest;
use crate::routes::{compile, flatten};

/// List the tools a manifest would compile to
///
/// Runs the collection pipeline without touching the filesystem: no bypass
/// key rotation, no emitted files.
#[derive(Debug, Args)]
pub struct RoutesCommand {
    /// Manifest file describing routes and schemas
    #[arg(long, short = 'm', value_name = "FILE")]
    pub manifest: PathBuf,
}

impl RoutesCommand {
    /// Execute the routes command
    ///
    /// # Errors
    ///
    /// Returns manifest or schema errors.
    pub fn execute(self) -> GenResult<()> {
        let manifest = Manifest::from_path(&self.manifest)?;
        let registry = manifest.build_registry()?;
        let records = compile(&flatten(&manifest.routes), &registry);

        if records.is_empty() {
            println!("{} no exported routes", "!".yellow().bold());
            return Ok(());
        }
        for record in &records {
            let group = record.group.as_deref().unwrap_or("main");
            println!(
                "{:<32} {:>6} {:<40} {}",
                record.tool_name.bold(),
                record.verb.as_str().to_uppercase().cyan(),
                record.path,
                group.dimmed()
            );
        }
        println!("\n{} tool(s)", records.len());
        Ok(())
    }
}
