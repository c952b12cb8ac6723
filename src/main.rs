//! mcp-routegen binary entry point

use clap::Parser;

use mcp_routegen::cli::{error::display_error, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.execute() {
        std::process::exit(display_error(&e));
    }
}
