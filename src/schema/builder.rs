//! Recursive builder mini-language for parameter definitions
//!
//! Each nested block receives a fresh builder and installs its result as the
//! parent's `children`. This recursion is the only place nesting depth is
//! introduced; depth is unbounded and callers are responsible for not feeding
//! the builder cyclic structures (the model itself cannot self-reference).

use serde_json::Value;

use super::{ParamDef, ParamKind, ScalarKind};

/// Builder for an ordered sequence of [`ParamDef`]s
///
/// ```
/// use mcp_routegen::schema::{ParamsBuilder, ScalarKind};
///
/// let mut b = ParamsBuilder::new();
/// b.object("user", true, |b| {
///     b.string("name", true).describe("Full name");
///     b.array("user_ids", ScalarKind::Integer, false);
/// });
/// let params = b.finish();
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ParamsBuilder {
    params: Vec<ParamDef>,
}

impl ParamsBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-constructed definition
    pub fn push(&mut self, def: ParamDef) -> &mut ParamDef {
        self.params.push(def);
        self.params.last_mut().expect("just pushed")
    }

    /// Declare a string parameter
    pub fn string(&mut self, name: &str, required: bool) -> &mut ParamDef {
        self.push(ParamDef::scalar(name, ParamKind::String, required))
    }

    /// Declare an integer parameter
    pub fn integer(&mut self, name: &str, required: bool) -> &mut ParamDef {
        self.push(ParamDef::scalar(name, ParamKind::Integer, required))
    }

    /// Declare a floating-point parameter
    pub fn number(&mut self, name: &str, required: bool) -> &mut ParamDef {
        self.push(ParamDef::scalar(name, ParamKind::Number, required))
    }

    /// Declare a boolean parameter
    pub fn boolean(&mut self, name: &str, required: bool) -> &mut ParamDef {
        self.push(ParamDef::scalar(name, ParamKind::Boolean, required))
    }

    /// Declare an array of scalars
    pub fn array(&mut self, name: &str, items: ScalarKind, required: bool) -> &mut ParamDef {
        self.push(ParamDef::array(name, items, required))
    }

    /// Declare an array of objects; the block builds the element shape
    pub fn array_of_objects(
        &mut self,
        name: &str,
        required: bool,
        build: impl FnOnce(&mut ParamsBuilder),
    ) -> &mut ParamDef {
        let mut nested = ParamsBuilder::new();
        build(&mut nested);
        self.push(ParamDef::array_of_objects(name, nested.finish(), required))
    }

    /// Declare a nested object; the block builds its children
    pub fn object(
        &mut self,
        name: &str,
        required: bool,
        build: impl FnOnce(&mut ParamsBuilder),
    ) -> &mut ParamDef {
        let mut nested = ParamsBuilder::new();
        build(&mut nested);
        self.push(ParamDef::object(name, nested.finish(), required))
    }

    /// Consume the builder, returning the declarations in order
    #[must_use]
    pub fn finish(self) -> Vec<ParamDef> {
        self.params
    }
}

/// Shorthand for building a parameter list with a closure
#[must_use]
pub fn params(build: impl FnOnce(&mut ParamsBuilder)) -> Vec<ParamDef> {
    let mut builder = ParamsBuilder::new();
    build(&mut builder);
    builder.finish()
}

impl ParamDef {
    /// Attach an example from any JSON-serializable value, for builder chains
    pub fn example_json(&mut self, value: impl Into<Value>) -> &mut Self {
        self.example = Some(value.into());
        self
    }
}
