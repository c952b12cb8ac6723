//! mcp-rb dialect writer
//!
//! Emits the minimal `tool "name" do` DSL: a flat script declaring the server
//! identity with `name`/`version` and one `tool` block per route, each
//! delegating to the generic HTTP helpers from the preamble.

use std::path::PathBuf;

use convert_case::{Case, Casing};

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::routes::RouteRecord;
use crate::schema::{ParamDef, ParamKind};

use super::output;
use super::shared;
use super::template_engine::{PreambleContext, TemplateEngine};
use super::{Dialect, ServerWriter};

/// Writer for the mcp-rb `tool "x" do` DSL
pub struct McpRbWriter {
    engine: TemplateEngine,
}

impl McpRbWriter {
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

    fn render_tool(&self, route: &RouteRecord, config: &GeneratorConfig) -> String {
        let mut out = String::new();
        let tool_name = route.tool_name.to_case(Case::Snake);
        out.push_str(&format!("tool \"{tool_name}\" do\n"));
        out.push_str(&format!(
            "  description \"{}\"\n",
            shared::clean_description(&route.description)
        ));
        for param in shared::dedup_by_name(&route.accepted_parameters) {
            out.push_str(&self.render_parameter(param, 1));
            out.push('\n');
        }
        out.push_str(&self.render_call(route, config));
        out.push_str("end\n");
        out
    }

    fn render_call(&self, route: &RouteRecord, config: &GeneratorConfig) -> String {
        let names: Vec<String> = route
            .url_parameters
            .iter()
            .map(|p| p.name.clone())
            .collect();
        let uri = shared::substitute_path(&route.path, &names, |name| {
            format!("#{{args[:{name}]}}")
        });

        let mut out = String::from("  call do |args|\n");
        for var in &config.env_vars {
            let key = var.to_lowercase();
            out.push_str(&format!(
                "    args[:{key}] = ENV['{var}'] if ENV['{var}']\n"
            ));
        }
        out.push_str(&format!("    {}(\"{uri}\", args)\n", route.verb.helper()));
        out.push_str("  end\n");
        out
    }
}

impl ServerWriter for McpRbWriter {
    fn dialect(&self) -> Dialect {
        Dialect::McpRb
    }

    fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    fn type_token(&self, kind: ParamKind) -> &'static str {
        match kind {
            ParamKind::Integer => "Integer",
            ParamKind::Number => "Float",
            ParamKind::Boolean => "TrueClass",
            ParamKind::Array => "Array",
            ParamKind::String | ParamKind::Object => "String",
        }
    }

    fn render_parameter(&self, param: &ParamDef, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let name = &param.name;
        let required = if param.required { ", required: true" } else { "" };
        let description = shared::description_text(param).map_or_else(String::new, |text| {
            format!(", description: \"{}\"", shared::sanitize_string_literal(&text))
        });

        let render_children = |children: &[ParamDef]| -> String {
            shared::dedup_by_name(children)
                .into_iter()
                .map(|child| self.render_parameter(child, indent + 1))
                .collect::<Vec<_>>()
                .join("\n")
        };

        match (param.kind, &param.item_kind, &param.children) {
            (ParamKind::Array, Some(items), _) => {
                let token = self.type_token(items.as_kind());
                format!("{pad}argument :{name}, Array, items: {token}{required}{description}")
            }
            (ParamKind::Array, None, Some(children)) => {
                format!(
                    "{pad}argument :{name}, Array{required}{description} do\n{}\n{pad}end",
                    render_children(children)
                )
            }
            (ParamKind::Object, _, Some(children)) => {
                format!(
                    "{pad}argument :{name}{required}{description} do\n{}\n{pad}end",
                    render_children(children)
                )
            }
            (kind, _, _) => {
                let token = self.type_token(kind);
                format!("{pad}argument :{name}, {token}{required}{description}")
            }
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
            .render_preamble(Dialect::McpRb, &PreambleContext::new(base_url, bypass_key))?;
        source.push('\n');
        source.push_str(&format!("name \"{}\"\n", config.server_name));
        source.push_str(&format!("version \"{}\"\n", config.server_version));
        source.push('\n');
        for route in routes {
            source.push_str(&self.render_tool(route, &config));
            source.push('\n');
        }

        let path = config.output_dir.join(config.server_file_name(group));
        output::write_executable(&path, &source)?;
        tracing::info!(path = %path.display(), tools = routes.len(), "wrote mcp-rb server");
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
            tool_name: "update_thing".to_string(),
            description: "Adjust a thing".to_string(),
            verb: Verb::Patch,
            path: "/things/:id".to_string(),
            url_parameters: params(|b| {
                b.string("id", true);
            }),
            group: None,
            accepted_parameters: params(|b| {
                b.string("id", true);
                b.string("name", false).describe("Display name");
            }),
        }
    }

    #[test]
    fn test_scalar_parameter_rendering() {
        let writer = McpRbWriter::new().unwrap();
        let defs = params(|b| {
            b.integer("age", false);
            b.string("name", true).describe("Full name");
        });
        assert_eq!(writer.render_parameter(&defs[0], 1), "  argument :age, Integer");
        assert_eq!(
            writer.render_parameter(&defs[1], 1),
            "  argument :name, String, required: true, description: \"Full name\""
        );
    }

    #[test]
    fn test_array_and_nested_rendering() {
        let writer = McpRbWriter::new().unwrap();
        let defs = params(|b| {
            b.array("tags", ScalarKind::String, false);
            b.object("user", true, |b| {
                b.string("email", true);
            });
        });
        assert_eq!(
            writer.render_parameter(&defs[0], 1),
            "  argument :tags, Array, items: String"
        );
        let nested = writer.render_parameter(&defs[1], 1);
        assert!(nested.starts_with("  argument :user, required: true do\n"));
        assert!(nested.contains("    argument :email, String, required: true"));
        assert!(nested.ends_with("  end"));
    }

    #[test]
    fn test_tool_block_substitutes_url_params() {
        let writer = McpRbWriter::new().unwrap();
        let block = writer.render_tool(&route(), &GeneratorConfig::default());
        assert!(block.starts_with("tool \"update_thing\" do\n"));
        assert!(block.contains("patch_resource(\"/things/#{args[:id]}\", args)"));
        assert!(block.ends_with("end\n"));
    }

    #[test]
    fn test_env_vars_injected_into_call_block() {
        let writer = McpRbWriter::new().unwrap();
        let config = GeneratorConfig {
            env_vars: vec!["ORGANIZATION_ID".to_string()],
            ..GeneratorConfig::default()
        };
        let block = writer.render_tool(&route(), &config);
        assert!(block.contains(
            "args[:organization_id] = ENV['ORGANIZATION_ID'] if ENV['ORGANIZATION_ID']"
        ));
    }

    #[test]
    fn test_write_server_emits_identity_and_tools() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            output_dir: dir.path().to_path_buf(),
            ..GeneratorConfig::default()
        };
        let writer = McpRbWriter::new().unwrap();
        let path = writer
            .write_server(&[route()], &config, "http://localhost:3000", "cafe", None)
            .unwrap();
        assert_eq!(path, dir.path().join("server.rb"));
        let source = std::fs::read_to_string(&path).unwrap();
        assert!(source.starts_with("#!/usr/bin/env ruby"));
        assert!(source.contains("name \"mcp-server\""));
        assert!(source.contains("version \"1.0.0\""));
        assert!(source.contains("tool \"update_thing\" do"));
        assert!(source.contains("cafe"));
    }
}
