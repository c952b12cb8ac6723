//! CLI command implementations
//!
//! Each command is implemented as a struct that can execute independently.

pub mod generate;
pub mod rotate_key;
pub mod routes;

use clap::Subcommand;

use crate::error::GenResult;

/// All available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a full generation cycle from a manifest
    #[command(visible_alias = "g")]
    Generate(generate::GenerateCommand),

    /// List the tools a manifest would compile to, without writing files
    #[command(visible_alias = "r")]
    Routes(routes::RoutesCommand),

    /// Rotate the bypass secret without regenerating servers
    RotateKey(rotate_key::RotateKeyCommand),
}

impl Command {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Propagates the failing command's error.
    pub fn execute(self) -> GenResult<()> {
        match self {
            Command::Generate(cmd) => cmd.execute(),
            Command::Routes(cmd) => cmd.execute(),
            Command::RotateKey(cmd) => cmd.execute(),
        }
    }
}
