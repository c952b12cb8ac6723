//! Handlebars template engine for emitted file skeletons
//!
//! The static parts of every emitted file (shebang, requires, the HTTP helper
//! functions parameterized by base URL and bypass secret, and the wrapper
//! script) live in embedded templates. Per-route tool declarations are built
//! in Rust by the dialect writers, since their shape is recursive.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{GenError, GenResult};

use super::Dialect;

/// Context for the dialect preamble templates
#[derive(Debug, Clone, Serialize)]
pub struct PreambleContext {
    /// Origin server base URL
    pub base_url: String,
    /// Bypass secret for this generation run
    pub bypass_key: String,
    /// Header name the secret is presented in on write requests
    pub bypass_header: &'static str,
    /// Bearer token captured from `MCP_API_KEY` at generation time, if set
    pub bearer_token: Option<String>,
    /// RFC 3339 generation timestamp
    pub generated_at: String,
    /// Version of the generator that produced the file
    pub generator_version: &'static str,
}

impl PreambleContext {
    /// Build a preamble context for the current generation run
    #[must_use]
    pub fn new(base_url: &str, bypass_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            bypass_key: bypass_key.to_string(),
            bypass_header: crate::bypass_key::BYPASS_HEADER,
            bearer_token: std::env::var("MCP_API_KEY").ok().filter(|v| !v.is_empty()),
            generated_at: chrono::Utc::now().to_rfc3339(),
            generator_version: crate::VERSION,
        }
    }
}

/// Context for the wrapper script template
#[derive(Debug, Clone, Serialize)]
pub struct WrapperContext {
    /// Gemfile pinned into the launched environment (empty when none found)
    pub bundle_gemfile: String,
    /// `GEM_HOME` captured at generation time
    pub gem_home: String,
    /// `GEM_PATH` captured at generation time
    pub gem_path: String,
    /// `BUNDLE_PATH` captured at generation time (falls back to `GEM_HOME`)
    pub bundle_path: String,
    /// Interpreter the script execs
    pub ruby_bin: String,
    /// Directory of the interpreter, prepended to `PATH` (empty when the
    /// interpreter could not be resolved to an absolute path)
    pub ruby_bin_dir: String,
    /// Server source file name, resolved relative to the script's directory
    pub server_file: String,
}

/// Template engine rendering emitted file skeletons
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create an engine with all embedded templates registered
    ///
    /// # Errors
    ///
    /// Returns a codegen error if a template fails to parse.
    pub fn new() -> GenResult<Self> {
        let mut hb = Handlebars::new();
        // Emitted output is source code, not HTML.
        hb.register_escape_fn(handlebars::no_escape);

        let templates = [
            ("wrapper", include_str!("templates/wrapper.sh.hbs")),
            ("mcp_rb_preamble", include_str!("templates/mcp_rb_preamble.rb.hbs")),
            ("fast_mcp_preamble", include_str!("templates/fast_mcp_preamble.rb.hbs")),
            ("mcp_gem_preamble", include_str!("templates/mcp_gem_preamble.rb.hbs")),
        ];
        for (name, source) in templates {
            hb.register_template_string(name, source).map_err(|e| {
                GenError::codegen_with_template(format!("failed to register template: {e}"), name)
            })?;
        }

        Ok(Self { handlebars: hb })
    }

    /// Render the HTTP-helper preamble for a dialect
    ///
    /// # Errors
    ///
    /// Returns a codegen error if rendering fails.
    pub fn render_preamble(&self, dialect: Dialect, context: &PreambleContext) -> GenResult<String> {
        let name = match dialect {
            Dialect::McpRb => "mcp_rb_preamble",
            Dialect::FastMcp => "fast_mcp_preamble",
            Dialect::McpGem => "mcp_gem_preamble",
        };
        self.handlebars.render(name, context).map_err(|e| {
            GenError::codegen_with_template(format!("failed to render preamble: {e}"), name)
        })
    }

    /// Render the wrapper launcher script
    ///
    /// # Errors
    ///
    /// Returns a codegen error if rendering fails.
    pub fn render_wrapper(&self, context: &WrapperContext) -> GenResult<String> {
        self.handlebars.render("wrapper", context).map_err(|e| {
            GenError::codegen_with_template(format!("failed to render wrapper: {e}"), "wrapper")
        })
    }
}
