//! JSON manifest loading
//!
//! A manifest is the batch-mode entry point: one JSON document carrying the
//! route table snapshot, per-resource schema declarations, and optional
//! configuration overrides. The CLI loads a manifest, builds the registry,
//! and hands both to the generator.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codegen::Dialect;
use crate::config::{GeneratorConfig, GroupConfig};
use crate::error::{GenError, GenResult};
use crate::routes::RouteTable;
use crate::schema::{ParamDef, ResourceSchema, SchemaRegistry};

/// One action's declarations in a manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionManifest {
    /// Names of shared fragments overlaid under this action's parameters
    #[serde(default)]
    pub shared: Vec<String>,
    /// Action-specific parameter definitions
    #[serde(default)]
    pub params: Vec<ParamDef>,
    /// Tool description shown to the calling client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One resource's schema declarations in a manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceManifest {
    /// Reusable named fragments
    #[serde(default)]
    pub shared: HashMap<String, Vec<ParamDef>>,
    /// Per-action declarations keyed by action name
    #[serde(default)]
    pub actions: HashMap<String, ActionManifest>,
}

/// Partial configuration overrides carried by a manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    /// Override the server identity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    /// Override the server identity version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    /// Override the origin base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Override the output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Override the bypass-key location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_key_path: Option<PathBuf>,
    /// Override the env-var allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<Vec<String>>,
    /// Override the output dialect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    /// Per-group overrides, merged into the base configuration
    #[serde(default)]
    pub groups: HashMap<String, GroupConfig>,
}

impl ConfigOverrides {
    /// Apply these overrides on top of a base configuration
    #[must_use]
    pub fn apply(&self, mut base: GeneratorConfig) -> GeneratorConfig {
        if let Some(v) = &self.server_name {
            base.server_name = v.clone();
        }
        if let Some(v) = &self.server_version {
            base.server_version = v.clone();
        }
        if let Some(v) = &self.base_url {
            base.base_url = v.clone();
        }
        if let Some(v) = &self.output_dir {
            base.output_dir = v.clone();
        }
        if let Some(v) = &self.bypass_key_path {
            base.bypass_key_path = v.clone();
        }
        if let Some(v) = &self.env_vars {
            base.env_vars = v.clone();
        }
        if let Some(v) = self.dialect {
            base.dialect = v;
        }
        for (name, group) in &self.groups {
            base.groups.insert(name.clone(), group.clone());
        }
        base
    }
}

/// A complete generation manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Route table snapshot
    #[serde(default)]
    pub routes: RouteTable,
    /// Schema declarations keyed by resource identity
    #[serde(default)]
    pub resources: HashMap<String, ResourceManifest>,
    /// Configuration overrides, applied over defaults
    #[serde(default)]
    pub config: ConfigOverrides,
}

impl Manifest {
    /// Parse a manifest from JSON text
    ///
    /// # Errors
    ///
    /// Returns a manifest error describing the first syntax or shape problem.
    pub fn parse(text: &str) -> GenResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| GenError::manifest(format!("invalid manifest: {e}")))
    }

    /// Load and parse a manifest file
    ///
    /// # Errors
    ///
    /// Returns a manifest error naming the file when it cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> GenResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| GenError::manifest(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// Build the schema registry declared by this manifest
    ///
    /// Shared fragments are installed before actions so overlay resolution
    /// sees them; the finished registry is validated before being returned.
    ///
    /// # Errors
    ///
    /// Returns the first schema error found in any declaration.
    pub fn build_registry(&self) -> GenResult<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        for (resource, decl) in &self.resources {
            let mut schema = ResourceSchema::new();
            for (name, fragment) in &decl.shared {
                schema.define_shared(name, fragment.clone());
            }
            for (action, spec) in &decl.actions {
                let shared: Vec<&str> = spec.shared.iter().map(String::as_str).collect();
                schema.define_action(action, &shared, spec.params.clone());
                if let Some(description) = &spec.description {
                    schema.describe_action(action, description);
                }
            }
            registry.insert(resource, schema);
        }
        registry.validate()?;
        Ok(registry)
    }

    /// The effective configuration: overrides applied over defaults
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        self.config.apply(GeneratorConfig::default())
    }
}
