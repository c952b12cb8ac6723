//! Error types for mcp-routegen
//!
//! Two failure classes matter during a generation run:
//! - fatal build errors (malformed schema definitions, unusable configuration)
//! - recoverable per-route or per-group failures, which are logged and skipped
//!   so a single bad controller or group never blocks the rest of the run.

use thiserror::Error;

/// Result type for generation operations
pub type GenResult<T> = std::result::Result<T, GenError>;

/// Main error type for mcp-routegen
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GenError {
    /// Schema definition error
    ///
    /// A parameter declaration is malformed (e.g. an array with neither an
    /// item kind nor nested children). Fatal at build time; carries the
    /// offending parameter name.
    #[error("schema error for parameter `{param}`: {message}")]
    Schema {
        /// Name of the offending parameter
        param: String,
        /// What was wrong with it
        message: String,
    },

    /// Configuration error
    ///
    /// Invalid generator configuration (missing required fields, invalid
    /// values). Fatal before any file is emitted; carries the key at fault.
    #[error("configuration error for `{key}`: {message}")]
    Configuration {
        /// Human-readable description
        message: String,
        /// The configuration key at fault
        key: String,
    },

    /// Code generation error
    ///
    /// Errors during template rendering or source emission.
    #[error("code generation error: {message}")]
    Codegen {
        /// Human-readable description
        message: String,
        /// The template involved, when known
        template: Option<String>,
    },

    /// Manifest error
    ///
    /// The route/schema manifest could not be read or understood.
    #[error("manifest error: {message}")]
    Manifest {
        /// Human-readable description
        message: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Create a schema error carrying the offending parameter name
    pub fn schema(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error naming the key at fault
    pub fn configuration(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: key.into(),
        }
    }

    /// Create a codegen error
    pub fn codegen(message: impl Into<String>) -> Self {
        Self::Codegen {
            message: message.into(),
            template: None,
        }
    }

    /// Create a codegen error with template context
    pub fn codegen_with_template(message: impl Into<String>, template: impl Into<String>) -> Self {
        Self::Codegen {
            message: message.into(),
            template: Some(template.into()),
        }
    }

    /// Create a manifest error
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_parameter() {
        let err = GenError::schema("tags", "array parameter must declare an item kind");
        assert!(err.to_string().contains("`tags`"));
        assert!(err.to_string().contains("item kind"));
    }

    #[test]
    fn test_configuration_error_names_key() {
        let err = GenError::configuration("base URL must not be empty", "base_url");
        assert!(err.to_string().contains("`base_url`"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GenError = io.into();
        assert!(matches!(err, GenError::Io(_)));
    }
}
