//! Parameter schema model
//!
//! The atomic unit is [`ParamDef`]: a named, possibly-nested parameter
//! declaration. Definitions are built through the recursive [`ParamsBuilder`]
//! mini-language or deserialized from a manifest, and stored per resource in a
//! [`SchemaRegistry`].
//!
//! Invariant: an `array` definition carries exactly one of an item kind or
//! nested children. Violations are fatal at build time ([`ParamDef::validate`]),
//! never at generation time, where a dialect could not emit a type for them.

pub mod builder;
pub mod registry;

pub use builder::{params, ParamsBuilder};
pub use registry::{ResourceSchema, SchemaRegistry};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Scalar kinds usable as array item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// UTF-8 text
    String,
    /// Whole number
    Integer,
    /// Floating-point number
    Number,
    /// True/false
    Boolean,
}

impl ScalarKind {
    /// The abstract kind this scalar corresponds to
    #[must_use]
    pub fn as_kind(self) -> ParamKind {
        match self {
            ScalarKind::String => ParamKind::String,
            ScalarKind::Integer => ParamKind::Integer,
            ScalarKind::Number => ParamKind::Number,
            ScalarKind::Boolean => ParamKind::Boolean,
        }
    }
}

/// Abstract parameter kind, mapped by each dialect to a native type token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// UTF-8 text (the default when a declaration omits its kind)
    #[default]
    String,
    /// Whole number
    Integer,
    /// Floating-point number
    Number,
    /// True/false
    Boolean,
    /// Sequence; carries exactly one of `item_kind` or `children`
    Array,
    /// Nested object with `children`
    Object,
}

/// A single parameter declaration
///
/// Unique by `name` within its containing scope. `children` is present for
/// objects and arrays-of-objects; `item_kind` for arrays of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    /// Identifier, unique within the containing scope
    pub name: String,

    /// Abstract kind; defaults to `string` when omitted
    #[serde(default)]
    pub kind: ParamKind,

    /// Whether the generated tool marks this parameter required
    #[serde(default)]
    pub required: bool,

    /// Human-readable annotation, propagated verbatim into generated schemas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Example value, propagated into generated descriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Item kind for arrays of scalars (mutually exclusive with `children`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_kind: Option<ScalarKind>,

    /// Nested definitions for objects and arrays of objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ParamDef>>,
}

impl ParamDef {
    /// Create a scalar definition of the given kind
    #[must_use]
    pub fn scalar(name: impl Into<String>, kind: ParamKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            description: None,
            example: None,
            item_kind: None,
            children: None,
        }
    }

    /// Create an array-of-scalars definition
    #[must_use]
    pub fn array(name: impl Into<String>, items: ScalarKind, required: bool) -> Self {
        Self {
            item_kind: Some(items),
            ..Self::scalar(name, ParamKind::Array, required)
        }
    }

    /// Create an array-of-objects definition
    #[must_use]
    pub fn array_of_objects(
        name: impl Into<String>,
        children: Vec<ParamDef>,
        required: bool,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::scalar(name, ParamKind::Array, required)
        }
    }

    /// Create a nested object definition
    #[must_use]
    pub fn object(name: impl Into<String>, children: Vec<ParamDef>, required: bool) -> Self {
        Self {
            children: Some(children),
            ..Self::scalar(name, ParamKind::Object, required)
        }
    }

    /// Attach a description
    pub fn describe(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an example value
    pub fn example(&mut self, example: serde_json::Value) -> &mut Self {
        self.example = Some(example);
        self
    }

    /// Validate this definition and all nested children
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Schema`] naming the offending parameter when an
    /// array declares both or neither of `item_kind`/`children`.
    pub fn validate(&self) -> GenResult<()> {
        if self.kind == ParamKind::Array {
            match (&self.item_kind, &self.children) {
                (Some(_), None) | (None, Some(_)) => {}
                (Some(_), Some(_)) => {
                    return Err(GenError::schema(
                        &self.name,
                        "array parameter declares both an item kind and nested children",
                    ));
                }
                (None, None) => {
                    return Err(GenError::schema(
                        &self.name,
                        "array parameter must declare an item kind or nested children",
                    ));
                }
            }
        }
        if let Some(children) = &self.children {
            for child in children {
                child.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_requires_exactly_one_of_items_or_children() {
        let mut bad = ParamDef::scalar("tags", ParamKind::Array, false);
        assert!(bad.validate().is_err(), "array with neither must fail");

        bad.item_kind = Some(ScalarKind::String);
        bad.children = Some(vec![ParamDef::scalar("x", ParamKind::String, false)]);
        assert!(bad.validate().is_err(), "array with both must fail");

        assert!(ParamDef::array("tags", ScalarKind::String, false).validate().is_ok());
        assert!(
            ParamDef::array_of_objects(
                "items",
                vec![ParamDef::scalar("id", ParamKind::Integer, true)],
                false
            )
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn test_validation_recurses_into_children() {
        let bad_child = ParamDef::scalar("ids", ParamKind::Array, true);
        let parent = ParamDef::object("item", vec![bad_child], true);
        let err = parent.validate().unwrap_err();
        assert!(err.to_string().contains("`ids`"), "error names the nested parameter");
    }

    #[test]
    fn test_kind_defaults_to_string_when_omitted() {
        let def: ParamDef = serde_json::from_str(r#"{"name": "title"}"#).unwrap();
        assert_eq!(def.kind, ParamKind::String);
        assert!(!def.required);
    }

    #[test]
    fn test_manifest_deserialization_of_nested_shapes() {
        let def: ParamDef = serde_json::from_str(
            r#"{
                "name": "user",
                "kind": "object",
                "required": true,
                "children": [
                    {"name": "name", "kind": "string", "required": true},
                    {"name": "user_ids", "kind": "array", "item_kind": "integer"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(def.kind, ParamKind::Object);
        let children = def.children.as_ref().unwrap();
        assert_eq!(children[1].item_kind, Some(ScalarKind::Integer));
        def.validate().unwrap();
    }
}
