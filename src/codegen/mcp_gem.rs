//! Official mcp gem dialect writer
//!
//! Emits `MCP::Tool.define` declarations with JSON-Schema input objects,
//! collects them into an `MCP::Server`, and opens a stdio transport.
//! Environment variables flow through `server_context` rather than being read
//! inside each tool body.

use std::path::PathBuf;

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::routes::RouteRecord;
use crate::schema::{ParamDef, ParamKind};

use super::output;
use super::shared;
use super::template_engine::{PreambleContext, TemplateEngine};
use super::{Dialect, ServerWriter};

/// Writer for `MCP::Tool.define` with JSON-Schema input objects
pub struct McpGemWriter {
    engine: TemplateEngine,
}

impl McpGemWriter {
    /// Create the writer with its template engine
    ///
    /// # Errors
    ///
    /// Returns a codegen error if the embedded templates fail to parse.
    pub fn new() -> GenResult<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Render the `properties:`/`required:` body of a JSON-Schema object
    fn render_input_schema(&self, params: &[ParamDef], indent: usize) -> String {
        let unique = shared::dedup_by_name(params);
        let pad = "  ".repeat(indent);

        let properties: Vec<String> = unique
            .iter()
            .map(|p| self.render_parameter(p, indent + 1))
            .collect();
        let required: Vec<String> = unique
            .iter()
            .filter(|p| p.required)
            .map(|p| format!("\"{}\"", p.name))
            .collect();

        let mut out = format!("{pad}properties: {{\n{}\n{pad}}}", properties.join(",\n"));
        if !required.is_empty() {
            out.push_str(&format!(",\n{pad}required: [{}]", required.join(", ")));
        }
        out
    }

    fn render_tool(&self, route: &RouteRecord, config: &GeneratorConfig) -> String {
        let mut out = String::from("tool = MCP::Tool.define(\n");
        out.push_str(&format!("  name: \"{}\",\n", route.tool_name));
        out.push_str(&format!(
            "  description: \"{}\",\n",
            shared::clean_description(&route.description)
        ));
        out.push_str("  input_schema: {\n");
        out.push_str(&self.render_input_schema(&route.accepted_parameters, 2));
        out.push_str("\n  }\n");
        out.push_str(&self.render_call(route, config));
        out.push_str("tools << tool\n");
        out
    }

    fn render_call(&self, route: &RouteRecord, config: &GeneratorConfig) -> String {
        let unique = shared::dedup_by_name(&route.accepted_parameters);
        let mut signature: Vec<String> = unique
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}:", p.name)
                } else {
                    format!("{}: nil", p.name)
                }
            })
            .collect();
        signature.push("server_context:".to_string());
        let hash_fields: Vec<String> = unique.iter().map(|p| format!("{}:", p.name)).collect();

        let names: Vec<String> = route
            .url_parameters
            .iter()
            .map(|p| p.name.clone())
            .collect();
        let uri = shared::substitute_path(&route.path, &names, |name| {
            format!("#{{args[:{name}]}}")
        });

        let mut out = format!(") do |{}|\n", signature.join(", "));
        out.push_str(&format!("  args = {{{}}}\n", hash_fields.join(", ")));
        for var in &config.env_vars {
            let key = var.to_lowercase();
            out.push_str(&format!(
                "  args[:{key}] = server_context[:{key}] if server_context[:{key}] && server_context[:{key}] != ''\n"
            ));
        }
        out.push_str(&format!(
            "  {}(\"{uri}\", args.compact)\n",
            route.verb.helper()
        ));
        out.push_str("end\n");
        out
    }

    fn render_server(&self, config: &GeneratorConfig) -> String {
        let mut out = String::from("server_context = {}\n");
        for var in &config.env_vars {
            let key = var.to_lowercase();
            out.push_str(&format!(
                "server_context[:{key}] = ENV['{var}'] if ENV['{var}'] && ENV['{var}'] != ''\n"
            ));
        }
        out.push_str("server = MCP::Server.new(\n");
        out.push_str(&format!("  name: \"{}\",\n", config.server_name));
        out.push_str(&format!("  version: \"{}\",\n", config.server_version));
        out.push_str("  server_context:,\n");
        out.push_str("  tools:\n");
        out.push_str(")\n");
        out.push_str("transport = MCP::Server::Transports::StdioTransport.new(server)\n");
        out.push_str("transport.open\n");
        out
    }
}

impl ServerWriter for McpGemWriter {
    fn dialect(&self) -> Dialect {
        Dialect::McpGem
    }

    fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    fn type_token(&self, kind: ParamKind) -> &'static str {
        match kind {
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
            ParamKind::String => "string",
        }
    }

    fn render_parameter(&self, param: &ParamDef, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let inner = "  ".repeat(indent + 1);
        let name = &param.name;
        let token = self.type_token(param.kind);
        let description = shared::description_text(param).map_or_else(String::new, |text| {
            format!(", description: \"{}\"", shared::sanitize_string_literal(&text))
        });

        match (param.kind, &param.item_kind, &param.children) {
            (ParamKind::Array, Some(items), _) => {
                let item_token = self.type_token(items.as_kind());
                format!(
                    "{pad}{name}: {{ type: \"array\"{description}, items: {{\n{inner}type: \"{item_token}\"\n{pad}}} }}"
                )
            }
            (ParamKind::Array, None, Some(children)) => {
                format!(
                    "{pad}{name}: {{ type: \"array\"{description}, items: {{\n{inner}type: \"object\",\n{}\n{pad}}} }}",
                    self.render_input_schema(children, indent + 1)
                )
            }
            (ParamKind::Object, _, Some(children)) => {
                format!(
                    "{pad}{name}: {{ type: \"object\"{description},\n{}\n{pad}}}",
                    self.render_input_schema(children, indent + 1)
                )
            }
            _ => format!("{pad}{name}: {{ type: \"{token}\"{description} }}"),
        }
    }

    fn write_server(
        &self,
        routes: &[RouteRecord],
        config: &GeneratorConfig,
        base_url: &str,
        bypass_key: &str,
        group: Option<&str>,
    ) -> GenResult<PathBuf> {
        let config = config.for_group(group);
        let mut source = self
            .engine
            .render_preamble(Dialect::McpGem, &PreambleContext::new(base_url, bypass_key))?;
        source.push('\n');
        source.push_str("tools = []\n");
        for route in routes {
            source.push_str(&self.render_tool(route, &config));
            source.push('\n');
        }
        source.push_str(&self.render_server(&config));

        let path = config.output_dir.join(config.server_file_name(group));
        output::write_executable(&path, &source)?;
        tracing::info!(path = %path.display(), tools = routes.len(), "wrote mcp-gem server");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Verb;
    use crate::schema::{params, ScalarKind};

    fn route() -> RouteRecord {
        RouteRecord {
            tool_name: "show_thing".to_string(),
            description: "Handles show for things".to_string(),
            verb: Verb::Get,
            path: "/things/:id".to_string(),
            url_parameters: params(|b| {
                b.string("id", true);
            }),
            group: None,
            accepted_parameters: params(|b| {
                b.string("id", true);
            }),
        }
    }

    #[test]
    fn test_scalar_property_rendering() {
        let writer = McpGemWriter::new().unwrap();
        let defs = params(|b| {
            b.number("price", false).describe("Unit price");
        });
        assert_eq!(
            writer.render_parameter(&defs[0], 3),
            "      price: { type: \"number\", description: \"Unit price\" }"
        );
    }

    #[test]
    fn test_input_schema_collects_required_names() {
        let writer = McpGemWriter::new().unwrap();
        let defs = params(|b| {
            b.string("name", true);
            b.integer("count", false);
            b.boolean("active", true);
        });
        let schema = writer.render_input_schema(&defs, 2);
        assert!(schema.contains("required: [\"name\", \"active\"]"));
        assert!(schema.contains("name: { type: \"string\" }"));
    }

    #[test]
    fn test_input_schema_omits_required_when_all_optional() {
        let writer = McpGemWriter::new().unwrap();
        let defs = params(|b| {
            b.string("q", false);
        });
        assert!(!writer.render_input_schema(&defs, 2).contains("required:"));
    }

    #[test]
    fn test_nested_array_of_objects_schema() {
        let writer = McpGemWriter::new().unwrap();
        let defs = params(|b| {
            b.array_of_objects("items", true, |b| {
                b.array("ids", ScalarKind::Integer, true);
            });
        });
        let rendered = writer.render_parameter(&defs[0], 2);
        assert!(rendered.contains("type: \"array\""));
        assert!(rendered.contains("type: \"object\""));
        assert!(rendered.contains("ids: { type: \"array\""));
        assert!(rendered.contains("required: [\"ids\"]"));
    }

    #[test]
    fn test_call_threads_server_context() {
        let writer = McpGemWriter::new().unwrap();
        let config = GeneratorConfig {
            env_vars: vec!["API_KEY".to_string()],
            ..GeneratorConfig::default()
        };
        let body = writer.render_call(&route(), &config);
        assert!(body.contains(") do |id:, server_context:|"));
        assert!(body.contains(
            "args[:api_key] = server_context[:api_key] if server_context[:api_key] && server_context[:api_key] != ''"
        ));
        assert!(body.contains("get_resource(\"/things/#{args[:id]}\", args.compact)"));
    }

    #[test]
    fn test_write_server_builds_context_and_transport() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            output_dir: dir.path().to_path_buf(),
            env_vars: vec!["API_KEY".to_string()],
            ..GeneratorConfig::default()
        };
        let writer = McpGemWriter::new().unwrap();
        let path = writer
            .write_server(&[route()], &config, "http://localhost:3000", "cafe", None)
            .unwrap();
        let source = std::fs::read_to_string(&path).unwrap();
        assert!(source.contains("tools = []"));
        assert!(source.contains("server_context[:api_key] = ENV['API_KEY'] if ENV['API_KEY'] && ENV['API_KEY'] != ''"));
        assert!(source.contains("transport = MCP::Server::Transports::StdioTransport.new(server)"));
        assert!(source.trim_end().ends_with("transport.open"));
    }
}
