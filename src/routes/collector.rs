//! Two-phase route collection
//!
//! Phase 1 ([`flatten`]) walks the table depth-first, prefix-concatenating
//! mount paths and tagging leaves with their group handle, in table order.
//! Phase 2 ([`compile`]) selects eligible leaves, derives tool names with
//! first-seen-wins deduplication, resolves each route's schema table, and
//! merges URL placeholders into the accepted parameters.

use std::collections::HashSet;

use crate::schema::{ParamDef, ParamKind, SchemaRegistry};

use super::{RouteEntry, RouteRecord, RouteTable, TableEntry, Verb};

/// Actions eligible for export
const EXPORTABLE_ACTIONS: [&str; 5] = ["create", "index", "show", "update", "destroy"];

/// A flattened leaf: one route with its full path and group handle
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRoute {
    /// The leaf route entry, cloned out of the snapshot
    pub entry: RouteEntry,
    /// Full path with all containing mount prefixes applied
    pub path: String,
    /// Group handle: mount name, explicit tag, or `None` for the main app
    pub group: Option<String>,
}

/// Flatten a route table into leaf records, depth-first in table order
#[must_use]
pub fn flatten(table: &RouteTable) -> Vec<FlatRoute> {
    let mut leaves = Vec::new();
    flatten_into(table, "", None, &mut leaves);
    leaves
}

fn flatten_into(table: &RouteTable, prefix: &str, group: Option<&str>, out: &mut Vec<FlatRoute>) {
    for entry in &table.entries {
        match entry {
            TableEntry::Mount(mount) => {
                let new_prefix = format!("{prefix}{}", mount.path);
                flatten_into(&mount.routes, &new_prefix, Some(&mount.name), out);
            }
            TableEntry::Route(route) => {
                let group = route
                    .group
                    .clone()
                    .or_else(|| group.map(ToString::to_string));
                out.push(FlatRoute {
                    entry: route.clone(),
                    path: format!("{prefix}{}", route.path),
                    group,
                });
            }
        }
    }
}

/// Compile flattened leaves into export-ready route records
///
/// Routes whose resource has no schema table are skipped with a warning; a
/// single bad controller must not block export of all others. Duplicate tool
/// names are dropped in favor of the first occurrence in traversal order.
#[must_use]
pub fn compile(flat: &[FlatRoute], registry: &SchemaRegistry) -> Vec<RouteRecord> {
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for leaf in flat {
        let route = &leaf.entry;
        let action = route.action.as_str();

        let exposed = route.expose.as_ref().is_some_and(|e| e.permits(action));
        if !exposed {
            continue;
        }
        if !EXPORTABLE_ACTIONS.contains(&action) {
            continue;
        }
        // PATCH is the sole update verb honored; PUT would produce a
        // duplicate tool for routes answering both.
        if route.verb == Verb::Put {
            continue;
        }

        let Some(schema) = registry.get(&route.resource) else {
            tracing::warn!(
                resource = %route.resource,
                action,
                path = %leaf.path,
                "no schema table for resource, skipping route"
            );
            continue;
        };

        let tool_name = format!("{action}_{}", parameterize(&route.resource));
        if !seen_names.insert(tool_name.clone()) {
            tracing::debug!(tool = %tool_name, path = %leaf.path, "duplicate tool name, keeping first");
            continue;
        }

        let path = strip_format_suffix(&leaf.path).to_string();
        let url_parameters = extract_url_params(&path);

        let mut accepted_parameters = schema.params_for(action).to_vec();
        for url_param in &url_parameters {
            if !accepted_parameters.iter().any(|p| p.name == url_param.name) {
                accepted_parameters.push(url_param.clone());
            }
        }

        let description = schema
            .description_for(action)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("Handles {action} for {}", route.resource));

        records.push(RouteRecord {
            tool_name,
            description,
            verb: route.verb,
            path,
            url_parameters,
            group: leaf.group.clone(),
            accepted_parameters,
        });
    }

    records
}

/// Extract `:name` placeholders as required string parameters, positionally
#[must_use]
pub fn extract_url_params(path: &str) -> Vec<ParamDef> {
    placeholder_names(path)
        .into_iter()
        .map(|name| ParamDef::scalar(name, ParamKind::String, true))
        .collect()
}

/// Placeholder names in a path template, in order of appearance
#[must_use]
pub fn placeholder_names(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = path.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != ':' {
            continue;
        }
        let mut name = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }
        if !name.is_empty() {
            names.push(name);
        }
    }
    names
}

/// Strip the host framework's trailing `(.:format)` segment, if present
#[must_use]
pub fn strip_format_suffix(path: &str) -> &str {
    path.strip_suffix("(.:format)").unwrap_or(path)
}

/// Kebab-case a resource identifier for use inside a tool name
///
/// Namespaced resources like `channels/messages` become `channels-messages`.
#[must_use]
pub fn parameterize(resource: &str) -> String {
    let mut out = String::with_capacity(resource.len());
    let mut pending_sep = false;
    for c in resource.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
