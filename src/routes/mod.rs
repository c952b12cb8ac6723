//! Route table snapshot model
//!
//! The host framework's live routing table enters this system as an immutable
//! [`RouteTable`] snapshot: entries are either leaf routes bound to a
//! resource/action pair or mounts of nested sub-application tables. All later
//! phases operate on the flattened snapshot produced by [`collector`], never on
//! a live structure.

pub mod collector;

pub use collector::{compile, flatten, FlatRoute};

use serde::{Deserialize, Serialize};

use crate::schema::ParamDef;

/// HTTP verb of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT (never exported; PATCH is the sole update verb honored)
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
}

impl Verb {
    /// Lowercase wire form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        }
    }

    /// Name of the generic HTTP helper the generated tool delegates to
    #[must_use]
    pub fn helper(self) -> &'static str {
        match self {
            Verb::Get => "get_resource",
            Verb::Post => "post_resource",
            Verb::Put | Verb::Patch => "patch_resource",
            Verb::Delete => "delete_resource",
        }
    }

    /// Whether calls with this verb carry the bypass secret header
    #[must_use]
    pub fn is_write(self) -> bool {
        !matches!(self, Verb::Get)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-route eligibility marker: export everything, or only the listed actions
///
/// Absent (the `Option` around it) means the route is not exported at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exposure {
    /// `true` exports every eligible action; `false` exports none
    All(bool),
    /// Export only the listed action names
    Actions(Vec<String>),
}

impl Exposure {
    /// Whether this marker permits the given action
    #[must_use]
    pub fn permits(&self, action: &str) -> bool {
        match self {
            Exposure::All(flag) => *flag,
            Exposure::Actions(actions) => actions.iter().any(|a| a == action),
        }
    }
}

/// A leaf route bound to a resource/action pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// HTTP verb
    pub verb: Verb,
    /// Path template with `:name` placeholders, relative to the containing table
    pub path: String,
    /// Owning resource (controller) identifier
    pub resource: String,
    /// Action name, e.g. `create`
    pub action: String,
    /// Eligibility marker; absent means not exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expose: Option<Exposure>,
    /// Explicit server-grouping tag, overriding any containing mount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// A mounted sub-application with its own route table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountEntry {
    /// Path prefix the sub-application is mounted at
    pub path: String,
    /// Handle identifying the sub-application (its group name)
    pub name: String,
    /// The sub-application's own route table
    pub routes: RouteTable,
}

/// One entry in a route table: a leaf route or a mounted sub-application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableEntry {
    /// Leaf route
    Route(RouteEntry),
    /// Mounted sub-application
    Mount(MountEntry),
}

/// An ordered route table; order determines tool-name tie-breaks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Entries in declaration order
    #[serde(default)]
    pub entries: Vec<TableEntry>,
}

impl RouteTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leaf route
    pub fn route(&mut self, entry: RouteEntry) -> &mut Self {
        self.entries.push(TableEntry::Route(entry));
        self
    }

    /// Mount a sub-application table at a path prefix
    pub fn mount(&mut self, path: &str, name: &str, routes: RouteTable) -> &mut Self {
        self.entries.push(TableEntry::Mount(MountEntry {
            path: path.to_string(),
            name: name.to_string(),
            routes,
        }));
        self
    }
}

/// A compiled, export-ready route bound to one tool
///
/// Constructed once per generation run from the table snapshot, never mutated
/// afterwards, and consumed exactly once by a code generator.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    /// Deterministic `{action}_{resource}` tool name, unique within a run
    pub tool_name: String,
    /// Human-readable description shown to the tool-calling client
    pub description: String,
    /// HTTP verb
    pub verb: Verb,
    /// Full path with any containing mount prefixes applied
    pub path: String,
    /// Parameters extracted from `:name` placeholders; always required strings
    pub url_parameters: Vec<ParamDef>,
    /// Group handle: `None` for the main application
    pub group: Option<String>,
    /// Action schema with URL parameters merged in
    pub accepted_parameters: Vec<ParamDef>,
}
