//! fast-mcp dialect writer
//!
//! Emits one `FastMcp::Tool` subclass per route with dry-schema style
//! `arguments do` declarations, registers each class on a `FastMcp::Server`,
//! and starts the server at the end of the script.

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

/// Writer for class-based fast-mcp tool registration
pub struct FastMcpWriter {
    engine: TemplateEngine,
}

impl FastMcpWriter {
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

    fn class_name(route: &RouteRecord) -> String {
        format!("{}Tool", route.tool_name.to_case(Case::Pascal))
    }

    fn render_tool(&self, route: &RouteRecord, config: &GeneratorConfig) -> String {
        let class_name = Self::class_name(route);
        let mut out = format!("class {class_name} < FastMcp::Tool\n");
        out.push_str(&format!(
            "  description \"{}\"\n",
            shared::clean_description(&route.description)
        ));
        out.push_str("  arguments do\n");
        for param in shared::dedup_by_name(&route.accepted_parameters) {
            out.push_str(&self.render_parameter(param, 2));
            out.push('\n');
        }
        out.push_str("  end\n");
        out.push_str(&self.render_call(route, config));
        out.push_str("end\n");
        out.push('\n');
        out.push_str(&format!("server.register_tool({class_name})\n"));
        out
    }

    fn render_call(&self, route: &RouteRecord, config: &GeneratorConfig) -> String {
        let unique = shared::dedup_by_name(&route.accepted_parameters);
        let signature: Vec<String> = unique
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}:", p.name)
                } else {
                    format!("{}: nil", p.name)
                }
            })
            .collect();
        let hash_fields: Vec<String> = unique.iter().map(|p| format!("{}:", p.name)).collect();

        let names: Vec<String> = route
            .url_parameters
            .iter()
            .map(|p| p.name.clone())
            .collect();
        let uri = shared::substitute_path(&route.path, &names, |name| {
            format!("#{{args[:{name}]}}")
        });

        let mut out = format!("  def call({})\n", signature.join(", "));
        out.push_str(&format!("    args = {{{}}}\n", hash_fields.join(", ")));
        for var in &config.env_vars {
            let key = var.to_lowercase();
            out.push_str(&format!(
                "    args[:{key}] = ENV['{var}'] if ENV['{var}']\n"
            ));
        }
        out.push_str(&format!(
            "    {}(\"{uri}\", args.compact)\n",
            route.verb.helper()
        ));
        out.push_str("  end\n");
        out
    }
}

impl ServerWriter for FastMcpWriter {
    fn dialect(&self) -> Dialect {
        Dialect::FastMcp
    }

    fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    fn type_token(&self, kind: ParamKind) -> &'static str {
        match kind {
            ParamKind::Integer => "integer",
            ParamKind::Number => "float",
            ParamKind::Boolean => "bool",
            ParamKind::Array => "array",
            ParamKind::Object => "hash",
            ParamKind::String => "string",
        }
    }

    fn render_parameter(&self, param: &ParamDef, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let name = &param.name;
        let wrapper = if param.required { "required" } else { "optional" };
        let description = shared::description_text(param).map_or_else(String::new, |text| {
            format!(".description(\"{}\")", shared::sanitize_string_literal(&text))
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
                format!("{pad}{wrapper}(:{name}).array(:{token}){description}")
            }
            (ParamKind::Array, None, Some(children)) => {
                format!(
                    "{pad}{wrapper}(:{name}){description}.array(:hash) do\n{}\n{pad}end",
                    render_children(children)
                )
            }
            (ParamKind::Object, _, Some(children)) => {
                format!(
                    "{pad}{wrapper}(:{name}){description}.hash do\n{}\n{pad}end",
                    render_children(children)
                )
            }
            (kind, _, _) => {
                let token = self.type_token(kind);
                format!("{pad}{wrapper}(:{name}).filled(:{token}){description}")
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
            .render_preamble(Dialect::FastMcp, &PreambleContext::new(base_url, bypass_key))?;
        source.push('\n');
        source.push_str(&format!(
            "server = FastMcp::Server.new(name: \"{}\", version: \"{}\")\n\n",
            config.server_name, config.server_version
        ));
        for route in routes {
            source.push_str(&self.render_tool(route, &config));
            source.push('\n');
        }
        source.push_str("server.start\n");

        let path = config.output_dir.join(config.server_file_name(group));
        output::write_executable(&path, &source)?;
        tracing::info!(path = %path.display(), tools = routes.len(), "wrote fast-mcp server");
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
            tool_name: "create_thing".to_string(),
            description: "Handles create for things".to_string(),
            verb: Verb::Post,
            path: "/things".to_string(),
            url_parameters: Vec::new(),
            group: None,
            accepted_parameters: params(|b| {
                b.string("name", true).describe("Display name");
                b.integer("count", false);
            }),
        }
    }

    #[test]
    fn test_scalar_parameter_rendering() {
        let writer = FastMcpWriter::new().unwrap();
        let defs = params(|b| {
            b.string("name", true).describe("Display name");
            b.integer("count", false);
        });
        assert_eq!(
            writer.render_parameter(&defs[0], 2),
            "    required(:name).filled(:string).description(\"Display name\")"
        );
        assert_eq!(
            writer.render_parameter(&defs[1], 2),
            "    optional(:count).filled(:integer)"
        );
    }

    #[test]
    fn test_array_of_objects_uses_hash_block() {
        let writer = FastMcpWriter::new().unwrap();
        let defs = params(|b| {
            b.array_of_objects("items", true, |b| {
                b.array("ids", ScalarKind::Integer, true);
            });
        });
        let rendered = writer.render_parameter(&defs[0], 1);
        assert!(rendered.starts_with("  required(:items).array(:hash) do\n"));
        assert!(rendered.contains("    required(:ids).array(:integer)"));
        assert!(rendered.ends_with("  end"));
    }

    #[test]
    fn test_call_builds_compacted_args_hash() {
        let writer = FastMcpWriter::new().unwrap();
        let body = writer.render_call(&route(), &GeneratorConfig::default());
        assert!(body.contains("def call(name:, count: nil)"));
        assert!(body.contains("args = {name:, count:}"));
        assert!(body.contains("post_resource(\"/things\", args.compact)"));
    }

    #[test]
    fn test_write_server_registers_and_starts() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            output_dir: dir.path().to_path_buf(),
            ..GeneratorConfig::default()
        };
        let writer = FastMcpWriter::new().unwrap();
        let path = writer
            .write_server(&[route()], &config, "http://localhost:3000", "cafe", Some("admin"))
            .unwrap();
        assert_eq!(path, dir.path().join("admin_server.rb"));
        let source = std::fs::read_to_string(&path).unwrap();
        assert!(source.contains("server = FastMcp::Server.new(name: \"admin\", version: \"1.0.0\")"));
        assert!(source.contains("class CreateThingTool < FastMcp::Tool"));
        assert!(source.contains("server.register_tool(CreateThingTool)"));
        assert!(source.trim_end().ends_with("server.start"));
    }
}
