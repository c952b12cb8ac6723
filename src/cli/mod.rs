//! Command-line interface
//!
//! Type-safe argument parsing with clap v4, colored output with TTY
//! detection, proper exit codes, and user-friendly error messages.
//!
//! ```text
//! cli/
//! ├── commands/     # Command implementations
//! └── error.rs      # User-friendly error display
//! ```

pub mod commands;
pub mod error;

use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::GenResult;

/// mcp-routegen - route-table to MCP tool-calling proxy generator
#[derive(Parser, Debug)]
#[command(
    name = "mcp-routegen",
    version,
    about = "Generate MCP proxy servers from a route-table manifest",
    author
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: commands::Command,

    /// Enable verbose logging (-v, -vv, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns `GenError` if command execution fails.
    pub fn execute(self) -> GenResult<()> {
        self.init_tracing();

        if self.no_color || !std::io::stdout().is_terminal() {
            colored::control::set_override(false);
        }

        self.command.execute()
    }

    /// Initialize tracing from verbosity flags, `RUST_LOG` taking precedence
    fn init_tracing(&self) {
        let default_level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
