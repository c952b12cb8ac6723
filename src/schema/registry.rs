//! Per-resource schema tables
//!
//! Every resource owns an independently constructed [`ResourceSchema`]; tables
//! are never aliased between resources, so one controller's declarations can
//! never leak into another's. The registry is the explicit equivalent of the
//! host framework's per-controller class-level declarations.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::builder::ParamsBuilder;
use super::ParamDef;
use crate::error::GenResult;

/// Schema table for one resource: shared fragments plus per-action definitions
#[derive(Debug, Default, Clone)]
pub struct ResourceSchema {
    shared: HashMap<String, Vec<ParamDef>>,
    actions: HashMap<String, Vec<ParamDef>>,
    descriptions: HashMap<String, String>,
}

impl ResourceSchema {
    /// Create an empty schema table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reusable named fragment
    pub fn define_shared(&mut self, name: &str, params: Vec<ParamDef>) {
        self.shared.insert(name.to_string(), params);
    }

    /// Record a reusable named fragment built with the closure mini-language
    pub fn shared(&mut self, name: &str, build: impl FnOnce(&mut ParamsBuilder)) {
        let mut builder = ParamsBuilder::new();
        build(&mut builder);
        self.define_shared(name, builder.finish());
    }

    /// Record an action's definitions, overlaying the named shared fragments
    ///
    /// Shared names are resolved permissively: a missing name contributes an
    /// empty fragment, never an error. Action-specific definitions override
    /// shared ones entirely when names collide (last write wins by name); the
    /// merged order is the shared non-overridden items followed by all
    /// action-specific items.
    pub fn define_action(&mut self, action: &str, shared: &[&str], params: Vec<ParamDef>) {
        let mut base: Vec<ParamDef> = Vec::new();
        for name in shared {
            if let Some(fragment) = self.shared.get(*name) {
                base.extend(fragment.iter().cloned());
            }
        }
        let merged = merge_params(base, params);
        self.actions.insert(action.to_string(), merged);
    }

    /// Record an action's definitions built with the closure mini-language
    pub fn action(&mut self, action: &str, shared: &[&str], build: impl FnOnce(&mut ParamsBuilder)) {
        let mut builder = ParamsBuilder::new();
        build(&mut builder);
        self.define_action(action, shared, builder.finish());
    }

    /// Attach a human-readable tool description to an action
    pub fn describe_action(&mut self, action: &str, description: impl Into<String>) {
        self.descriptions.insert(action.to_string(), description.into());
    }

    /// Stored definitions for an action; empty when undeclared
    ///
    /// An absent schema means "this action accepts nothing", never an error.
    #[must_use]
    pub fn params_for(&self, action: &str) -> &[ParamDef] {
        self.actions.get(action).map_or(&[], Vec::as_slice)
    }

    /// Declared description for an action, if any
    #[must_use]
    pub fn description_for(&self, action: &str) -> Option<&str> {
        self.descriptions.get(action).map(String::as_str)
    }

    /// JSON property map for an action's definitions
    ///
    /// Each entry is `{type, required}` with nested `properties` for objects.
    #[must_use]
    pub fn mcp_hash(&self, action: &str) -> Value {
        property_map(self.params_for(action))
    }

    /// Validate every stored definition
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::error::GenError::Schema`] found, naming the
    /// offending parameter.
    pub fn validate(&self) -> GenResult<()> {
        for fragment in self.shared.values() {
            for def in fragment {
                def.validate()?;
            }
        }
        for params in self.actions.values() {
            for def in params {
                def.validate()?;
            }
        }
        Ok(())
    }
}

/// Merge shared and action-specific definitions, action-specific winning by name
fn merge_params(shared: Vec<ParamDef>, specific: Vec<ParamDef>) -> Vec<ParamDef> {
    let specific_names: Vec<&str> = specific.iter().map(|p| p.name.as_str()).collect();
    let mut merged: Vec<ParamDef> = shared
        .into_iter()
        .filter(|p| !specific_names.contains(&p.name.as_str()))
        .collect();
    merged.extend(specific);
    merged
}

fn property_map(params: &[ParamDef]) -> Value {
    let mut map = Map::new();
    for param in params {
        let mut entry = Map::new();
        let kind = if param.children.is_some() && param.kind != super::ParamKind::Array {
            super::ParamKind::Object
        } else {
            param.kind
        };
        entry.insert("type".into(), serde_json::to_value(kind).unwrap_or(Value::Null));
        entry.insert("required".into(), Value::Bool(param.required));
        if let Some(children) = &param.children {
            entry.insert("properties".into(), property_map(children));
        }
        map.insert(param.name.clone(), Value::Object(entry));
    }
    Value::Object(map)
}

/// Registry of schema tables keyed by resource identity
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    resources: HashMap<String, ResourceSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema table for a resource, created empty on first access
    pub fn resource(&mut self, name: &str) -> &mut ResourceSchema {
        self.resources.entry(name.to_string()).or_default()
    }

    /// Install an already-built schema table
    pub fn insert(&mut self, name: &str, schema: ResourceSchema) {
        self.resources.insert(name.to_string(), schema);
    }

    /// Resolve a resource's schema table
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResourceSchema> {
        self.resources.get(name)
    }

    /// Validate every definition in every table
    ///
    /// # Errors
    ///
    /// Returns the first schema error found; generation must not start with a
    /// definition no dialect can emit a type for.
    pub fn validate(&self) -> GenResult<()> {
        for schema in self.resources.values() {
            schema.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParamKind, ScalarKind};

    #[test]
    fn test_action_overrides_shared_by_name() {
        let mut schema = ResourceSchema::new();
        schema.shared("contact", |b| {
            b.string("name", false).describe("shared name");
            b.string("email", true);
        });
        schema.action("create", &["contact"], |b| {
            b.string("name", true).describe("specific name");
            b.string("phone", false);
        });

        let params = schema.params_for("create");
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        // Shared non-overridden items first, then all action items.
        assert_eq!(names, ["email", "name", "phone"]);

        let name = params.iter().find(|p| p.name == "name").unwrap();
        assert!(name.required, "action definition wins over shared");
        assert_eq!(name.description.as_deref(), Some("specific name"));
    }

    #[test]
    fn test_missing_shared_fragment_is_an_empty_fragment() {
        let mut schema = ResourceSchema::new();
        schema.action("create", &["nonexistent"], |b| {
            b.string("name", true);
        });
        assert_eq!(schema.params_for("create").len(), 1);
    }

    #[test]
    fn test_undeclared_action_accepts_nothing() {
        let schema = ResourceSchema::new();
        assert!(schema.params_for("destroy").is_empty());
    }

    #[test]
    fn test_registry_entries_are_independent() {
        let mut registry = SchemaRegistry::new();
        registry.resource("posts").action("create", &[], |b| {
            b.string("title", true);
        });
        registry.resource("comments");

        assert_eq!(registry.get("posts").unwrap().params_for("create").len(), 1);
        assert!(registry.get("comments").unwrap().params_for("create").is_empty());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_validate_reports_malformed_array() {
        let mut registry = SchemaRegistry::new();
        let mut bad = ParamDef::scalar("tags", ParamKind::Array, false);
        bad.item_kind = None;
        registry
            .resource("things")
            .define_action("create", &[], vec![bad]);
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("`tags`"));
    }

    #[test]
    fn test_mcp_hash_shape() {
        let mut schema = ResourceSchema::new();
        schema.action("create", &[], |b| {
            b.object("user", true, |b| {
                b.string("name", true);
                b.array("ids", ScalarKind::Integer, false);
            });
        });
        let hash = schema.mcp_hash("create");
        assert_eq!(hash["user"]["type"], "object");
        assert_eq!(hash["user"]["required"], true);
        assert_eq!(hash["user"]["properties"]["name"]["type"], "string");
        assert_eq!(hash["user"]["properties"]["ids"]["type"], "array");
    }
}
