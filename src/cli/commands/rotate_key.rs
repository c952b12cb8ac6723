//! Rotate-key command implementation

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::bypass_key::BypassKeyManager;
use crate::config::GeneratorConfig;
use crate::error::GenResult;

/// Rotate the bypass secret without regenerating servers
///
/// Previously generated servers keep embedding the old secret and will be
/// rejected by the origin until regenerated.
#[derive(Debug, Args)]
pub struct RotateKeyCommand {
    /// Location of the persisted bypass secret
    #[arg(long, value_name = "FILE")]
    pub key_path: Option<PathBuf>,
}

impl RotateKeyCommand {
    /// Execute the rotate-key command
    ///
    /// # Errors
    ///
    /// Returns an IO error if the key cannot be persisted.
    pub fn execute(self) -> GenResult<()> {
        let key_path = self
            .key_path
            .unwrap_or_else(|| GeneratorConfig::default().bypass_key_path);
        let manager = BypassKeyManager::new(&key_path);
        manager.rotate()?;
        println!(
            "{} rotated bypass key at {}",
            "✓".green().bold(),
            key_path.display()
        );
        println!("  regenerate servers to pick up the new secret");
        Ok(())
    }
}
