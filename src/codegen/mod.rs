//! Code generation layer
//!
//! A single emission contract ([`ServerWriter`]) with three concrete dialects,
//! selected once from configuration. Dialects share the type-mapping table,
//! recursive parameter rendering rules, and the HTTP-helper preamble; adding a
//! dialect means implementing the trait, not touching the route collector or
//! schema builder.

pub mod output;
pub mod shared;
pub mod template_engine;

mod fast_mcp;
mod mcp_gem;
mod mcp_rb;

pub use fast_mcp::FastMcpWriter;
pub use mcp_gem::McpGemWriter;
pub use mcp_rb::McpRbWriter;
pub use template_engine::{PreambleContext, TemplateEngine, WrapperContext};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::routes::RouteRecord;
use crate::schema::{ParamDef, ParamKind};

/// Output dialect of the generated proxy server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Dialect {
    /// Minimal hand-rolled `tool "name" do` DSL (mcp-rb)
    McpRb,
    /// Class-based tool registration with dry-schema arguments (fast-mcp)
    FastMcp,
    /// `MCP::Tool.define` with JSON-Schema input objects (official mcp gem)
    McpGem,
}

impl Dialect {
    /// Construct the writer implementing this dialect
    ///
    /// # Errors
    ///
    /// Returns a codegen error if the template engine fails to initialize.
    pub fn writer(self) -> GenResult<Box<dyn ServerWriter>> {
        Ok(match self {
            Dialect::McpRb => Box::new(McpRbWriter::new()?),
            Dialect::FastMcp => Box::new(FastMcpWriter::new()?),
            Dialect::McpGem => Box::new(McpGemWriter::new()?),
        })
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::McpRb => write!(f, "mcp-rb"),
            Dialect::FastMcp => write!(f, "fast-mcp"),
            Dialect::McpGem => write!(f, "mcp-gem"),
        }
    }
}

/// Emission contract every dialect implements
pub trait ServerWriter {
    /// The dialect this writer emits
    fn dialect(&self) -> Dialect;

    /// The template engine backing this writer's preamble and wrapper output
    fn engine(&self) -> &TemplateEngine;

    /// Native type token for an abstract kind; unknown kinds map to string
    fn type_token(&self, kind: ParamKind) -> &'static str;

    /// Render one parameter declaration, recursing into nested children
    ///
    /// `indent` is the nesting level in the emitted source. Children are
    /// deduplicated by name before rendering (last occurrence wins) so
    /// accidental duplicate declarations never produce invalid output.
    fn render_parameter(&self, param: &ParamDef, indent: usize) -> String;

    /// Emit one proxy-server source file for a group of routes
    ///
    /// The file contains the HTTP-helper preamble parameterized by `base_url`
    /// and `bypass_key`, the server identity from the group-derived
    /// configuration, and one tool declaration per route. The file is marked
    /// executable.
    ///
    /// # Errors
    ///
    /// Returns a codegen error on template failure or an IO error if the file
    /// cannot be written.
    fn write_server(
        &self,
        routes: &[RouteRecord],
        config: &GeneratorConfig,
        base_url: &str,
        bypass_key: &str,
        group: Option<&str>,
    ) -> GenResult<PathBuf>;

    /// Emit the executable wrapper script launching the generated server
    ///
    /// # Errors
    ///
    /// Returns a codegen error on template failure or an IO error if the file
    /// cannot be written.
    fn write_wrapper_script(
        &self,
        config: &GeneratorConfig,
        group: Option<&str>,
    ) -> GenResult<PathBuf> {
        shared::write_wrapper_script(self.engine(), config, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_serde_round_trip() {
        for dialect in [Dialect::McpRb, Dialect::FastMcp, Dialect::McpGem] {
            let json = serde_json::to_string(&dialect).unwrap();
            let back: Dialect = serde_json::from_str(&json).unwrap();
            assert_eq!(back, dialect);
        }
        assert_eq!(
            serde_json::from_str::<Dialect>("\"fast-mcp\"").unwrap(),
            Dialect::FastMcp
        );
    }

    #[test]
    fn test_every_dialect_constructs_a_writer() {
        for dialect in [Dialect::McpRb, Dialect::FastMcp, Dialect::McpGem] {
            let writer = dialect.writer().unwrap();
            assert_eq!(writer.dialect(), dialect);
        }
    }
}
