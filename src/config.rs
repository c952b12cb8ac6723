//! Generator configuration
//!
//! Configuration is an explicitly constructed value passed into every core
//! operation; there is no ambient global. Group customization is isolated via
//! [`GeneratorConfig::for_group`], which derives a fresh copy rather than
//! aliasing the base.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codegen::Dialect;
use crate::error::{GenError, GenResult};

/// Per-group configuration overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Extra environment-variable names injected into this group's tools
    #[serde(default)]
    pub env_vars: Vec<String>,
}

/// Process-wide generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Server identity name baked into emitted files
    pub server_name: String,
    /// Server identity version baked into emitted files
    pub server_version: String,
    /// Origin server base URL the generated proxy calls back to
    pub base_url: String,
    /// Directory receiving the emitted server and wrapper files
    pub output_dir: PathBuf,
    /// Location of the persisted bypass secret
    pub bypass_key_path: PathBuf,
    /// Allowlisted environment-variable names copied into tool invocations
    pub env_vars: Vec<String>,
    /// Output dialect, selected once per run
    pub dialect: Dialect,
    /// Per-group overrides keyed by group name
    pub groups: HashMap<String, GroupConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            server_name: "mcp-server".to_string(),
            server_version: "1.0.0".to_string(),
            base_url: "http://localhost:3000".to_string(),
            output_dir: PathBuf::from("tmp/mcp"),
            bypass_key_path: PathBuf::from("tmp/mcp/bypass_key.txt"),
            env_vars: Vec::new(),
            dialect: Dialect::McpRb,
            groups: HashMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that this configuration can drive a generation run
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Configuration`] naming the key at fault when the
    /// base URL is empty or not an HTTP(S) origin, or when the output
    /// directory is empty.
    pub fn validate(&self) -> GenResult<()> {
        if self.base_url.is_empty() {
            return Err(GenError::configuration(
                "base URL must not be empty",
                "base_url",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(GenError::configuration(
                format!("base URL `{}` must start with http:// or https://", self.base_url),
                "base_url",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(GenError::configuration(
                "output directory must not be empty",
                "output_dir",
            ));
        }
        Ok(())
    }

    /// Register a group's overrides
    pub fn register_group(&mut self, name: &str, config: GroupConfig) {
        self.groups.insert(name.to_string(), config);
    }

    /// Derive the effective configuration for a group
    ///
    /// Returns a copy, never an alias: the env-var list becomes the
    /// deduplicated union of the base list and the group's own, and the server
    /// name is overridden to the group's identity. `None` returns a copy of
    /// the base configuration unchanged.
    #[must_use]
    pub fn for_group(&self, group: Option<&str>) -> GeneratorConfig {
        let mut derived = self.clone();
        let Some(name) = group else {
            return derived;
        };
        derived.server_name = name.to_string();
        if let Some(group_config) = self.groups.get(name) {
            for var in &group_config.env_vars {
                if !derived.env_vars.contains(var) {
                    derived.env_vars.push(var.clone());
                }
            }
        }
        derived
    }

    /// File name of the emitted server source for a group
    ///
    /// `server.rb` for the ungrouped default, `{group}_server.rb` otherwise.
    /// Call on the configuration already derived with [`Self::for_group`].
    #[must_use]
    pub fn server_file_name(&self, group: Option<&str>) -> String {
        match group {
            Some(_) => format!("{}_server.rb", self.server_name),
            None => "server.rb".to_string(),
        }
    }

    /// File name of the emitted wrapper script for a group
    #[must_use]
    pub fn wrapper_file_name(&self, group: Option<&str>) -> String {
        match group {
            Some(_) => format!("{}_server.sh", self.server_name),
            None => "server.sh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.server_name, "mcp-server");
        assert_eq!(config.server_version, "1.0.0");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.output_dir, PathBuf::from("tmp/mcp"));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url_and_empty_output_dir() {
        let empty_url = GeneratorConfig {
            base_url: String::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            empty_url.validate(),
            Err(GenError::Configuration { key, .. }) if key == "base_url"
        ));

        let bad_scheme = GeneratorConfig {
            base_url: "ftp://example.com".into(),
            ..GeneratorConfig::default()
        };
        let err = bad_scheme.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));

        let no_output = GeneratorConfig {
            output_dir: PathBuf::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            no_output.validate(),
            Err(GenError::Configuration { key, .. }) if key == "output_dir"
        ));
    }

    #[test]
    fn test_for_group_unions_env_vars_and_overrides_name() {
        let mut config = GeneratorConfig {
            env_vars: vec!["API_KEY".into(), "ORGANIZATION_ID".into()],
            ..GeneratorConfig::default()
        };
        config.register_group(
            "admin",
            GroupConfig {
                env_vars: vec!["ADMIN_TOKEN".into(), "API_KEY".into()],
            },
        );

        let derived = config.for_group(Some("admin"));
        assert_eq!(derived.server_name, "admin");
        assert_eq!(
            derived.env_vars,
            vec!["API_KEY".to_string(), "ORGANIZATION_ID".into(), "ADMIN_TOKEN".into()]
        );

        // The base configuration is untouched.
        assert_eq!(config.server_name, "mcp-server");
        assert_eq!(config.env_vars.len(), 2);
    }

    #[test]
    fn test_for_group_without_registration_still_renames() {
        let config = GeneratorConfig::default();
        let derived = config.for_group(Some("billing"));
        assert_eq!(derived.server_name, "billing");
        assert_eq!(derived.env_vars, config.env_vars);
    }

    #[test]
    fn test_file_names() {
        let config = GeneratorConfig::default();
        assert_eq!(config.server_file_name(None), "server.rb");
        assert_eq!(config.wrapper_file_name(None), "server.sh");

        let derived = config.for_group(Some("admin"));
        assert_eq!(derived.server_file_name(Some("admin")), "admin_server.rb");
        assert_eq!(derived.wrapper_file_name(Some("admin")), "admin_server.sh");
    }
}
