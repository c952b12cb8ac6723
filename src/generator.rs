//! Generation orchestrator
//!
//! One run: validate schemas, rotate the bypass secret, flatten and compile
//! the route snapshot, then emit one server file and wrapper script per group
//! through the configured dialect. A failing group is logged and skipped;
//! sibling groups still emit.

use std::path::PathBuf;

use crate::bypass_key::BypassKeyManager;
use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::routes::{compile, flatten, RouteRecord, RouteTable};
use crate::schema::SchemaRegistry;

/// Run a full generation pass over a route snapshot
///
/// Returns the paths of every file emitted, servers and wrappers alike.
/// Groups appear in traversal order; the ungrouped main application comes
/// first when it has any exported routes.
///
/// # Errors
///
/// Fatal errors are configuration and schema validation failures, bypass-key
/// persistence failures, and template-engine initialization failures.
/// Per-group emission errors are logged and skipped, never propagated.
pub fn generate(
    table: &RouteTable,
    registry: &SchemaRegistry,
    config: &GeneratorConfig,
) -> GenResult<Vec<PathBuf>> {
    config.validate()?;
    registry.validate()?;

    let manager = BypassKeyManager::new(&config.bypass_key_path);
    let bypass_key = manager.rotate()?;
    tracing::debug!(path = %manager.key_path().display(), "rotated bypass key");

    let records = compile(&flatten(table), registry);
    let groups = group_records(records);
    tracing::info!(groups = groups.len(), dialect = %config.dialect, "compiled route snapshot");

    let writer = config.dialect.writer()?;
    let mut written = Vec::new();
    for (group, routes) in &groups {
        let group = group.as_deref();
        let result = writer
            .write_server(routes, config, &config.base_url, &bypass_key, group)
            .and_then(|server_path| {
                let wrapper_path = writer.write_wrapper_script(config, group)?;
                Ok([server_path, wrapper_path])
            });
        match result {
            Ok(paths) => written.extend(paths),
            Err(e) => {
                tracing::error!(group = group.unwrap_or("main"), error = %e, "skipping group");
            }
        }
    }
    Ok(written)
}

/// Partition records by group handle, ungrouped first, then first-seen order
fn group_records(records: Vec<RouteRecord>) -> Vec<(Option<String>, Vec<RouteRecord>)> {
    let mut groups: Vec<(Option<String>, Vec<RouteRecord>)> = Vec::new();
    for record in records {
        let key = record.group.clone();
        match groups.iter_mut().find(|(g, _)| *g == key) {
            Some((_, routes)) => routes.push(record),
            None if key.is_none() => groups.insert(0, (key, vec![record])),
            None => groups.push((key, vec![record])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Dialect;
    use crate::routes::{Exposure, RouteEntry, Verb};

    fn table() -> RouteTable {
        let mut table = RouteTable::default();
        table.route(RouteEntry {
            verb: Verb::Post,
            path: "/things".to_string(),
            resource: "things".to_string(),
            action: "create".to_string(),
            expose: Some(Exposure::All(true)),
            group: None,
        });
        table.route(RouteEntry {
            verb: Verb::Get,
            path: "/admin/users".to_string(),
            resource: "users".to_string(),
            action: "index".to_string(),
            expose: Some(Exposure::All(true)),
            group: Some("admin".to_string()),
        });
        table
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.resource("things").action("create", &[], |b| {
            b.string("name", true);
        });
        registry.resource("users").action("index", &[], |b| {
            b.string("q", false);
        });
        registry
    }

    fn config(dir: &std::path::Path, dialect: Dialect) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: dir.to_path_buf(),
            bypass_key_path: dir.join("bypass_key.txt"),
            dialect,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_generate_emits_server_and_wrapper_per_group() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Dialect::McpRb);
        let written = generate(&table(), &registry(), &config).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("server.rb"),
                dir.path().join("server.sh"),
                dir.path().join("admin_server.rb"),
                dir.path().join("admin_server.sh"),
            ]
        );
        for path in &written {
            assert!(path.is_file(), "{} missing", path.display());
        }
    }

    #[test]
    fn test_generate_rotates_key_into_emitted_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Dialect::FastMcp);

        generate(&table(), &registry(), &config).unwrap();
        let first_key = std::fs::read_to_string(dir.path().join("bypass_key.txt")).unwrap();

        generate(&table(), &registry(), &config).unwrap();
        let second_key = std::fs::read_to_string(dir.path().join("bypass_key.txt")).unwrap();
        assert_ne!(first_key, second_key);

        let server = std::fs::read_to_string(dir.path().join("server.rb")).unwrap();
        assert!(server.contains(second_key.trim()));
        assert!(!server.contains(first_key.trim()));
    }

    #[test]
    fn test_generate_rejects_invalid_registry() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Dialect::McpRb);

        let mut registry = SchemaRegistry::new();
        registry.resource("things").define_action(
            "create",
            &[],
            vec![crate::schema::ParamDef::scalar(
                "broken",
                crate::schema::ParamKind::Array,
                false,
            )],
        );
        assert!(generate(&table(), &registry, &config).is_err());
    }

    #[test]
    fn test_generate_rejects_invalid_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            base_url: String::new(),
            ..config(dir.path(), Dialect::McpRb)
        };
        let err = generate(&table(), &registry(), &config).unwrap_err();
        assert!(matches!(err, crate::error::GenError::Configuration { .. }));
        assert!(!dir.path().join("server.rb").exists(), "nothing emitted");
    }

    #[test]
    fn test_ungrouped_routes_emit_before_groups() {
        let records = vec![
            RouteRecord {
                tool_name: "index_user".to_string(),
                description: String::new(),
                verb: Verb::Get,
                path: "/admin/users".to_string(),
                url_parameters: Vec::new(),
                group: Some("admin".to_string()),
                accepted_parameters: Vec::new(),
            },
            RouteRecord {
                tool_name: "create_thing".to_string(),
                description: String::new(),
                verb: Verb::Post,
                path: "/things".to_string(),
                url_parameters: Vec::new(),
                group: None,
                accepted_parameters: Vec::new(),
            },
        ];
        let groups = group_records(records);
        assert_eq!(groups[0].0, None);
        assert_eq!(groups[1].0, Some("admin".to_string()));
    }
}
