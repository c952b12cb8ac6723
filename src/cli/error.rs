//! User-friendly error formatting for CLI
//!
//! Converts technical errors into human-readable messages with helpful
//! suggestions and context.

use colored::Colorize;

use crate::error::GenError;

/// Format an error for CLI display
#[must_use]
pub fn format_error(error: &GenError) -> String {
    match error {
        GenError::Schema { param, message } => {
            format!(
                "{} Schema error in parameter `{}`\n  {}\n\n{}\n  {}",
                "✗".red().bold(),
                param,
                message,
                "Suggestion:".yellow(),
                "Array parameters need exactly one of item_kind or children"
            )
        }
        GenError::Configuration { message, key } => {
            format!(
                "{} Configuration error in `{}`\n  {}\n\n{}\n  {}",
                "✗".red().bold(),
                key,
                message,
                "Suggestion:".yellow(),
                "Run with --help to see all available options"
            )
        }
        GenError::Manifest { message } => {
            format!(
                "{} Manifest error\n  {}\n\n{}\n  {}",
                "✗".red().bold(),
                message,
                "Suggestion:".yellow(),
                "Check the manifest JSON against the documented shape"
            )
        }
        GenError::Codegen { message, template } => {
            let location = template
                .as_deref()
                .map_or(String::new(), |t| format!(" (template: {t})"));
            format!(
                "{} Code generation error{}\n  {}",
                "✗".red().bold(),
                location,
                message
            )
        }
        GenError::Io(err) => {
            format!(
                "{} I/O error\n  {}\n\n{}\n  {}",
                "✗".red().bold(),
                err,
                "Suggestion:".yellow(),
                "Check file permissions and disk space"
            )
        }
        _ => format!("{} {}", "✗".red().bold(), error),
    }
}

/// Display an error to stderr and return exit code
#[must_use]
pub fn display_error(error: &GenError) -> i32 {
    eprintln!("{}", format_error(error));
    1
}
