//! mcp-routegen: route-table to MCP proxy-server generator
//!
//! Compiles a snapshot of a web application's routing table, together with
//! per-resource parameter schemas, into standalone executable MCP
//! (Model Context Protocol) proxy servers. Each generated server exposes one
//! tool per exported route and forwards tool calls back to the origin
//! application over HTTP, carrying a per-generation bypass secret for write
//! requests.
//!
//! # Quick Start
//!
//! ```bash
//! # Compile a manifest into servers and wrapper scripts
//! mcp-routegen generate --manifest routes.json --dialect fast-mcp
//!
//! # Preview the tools a manifest produces
//! mcp-routegen routes --manifest routes.json
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Declaration Layer                                       │
//! │ • SchemaRegistry: per-resource parameter tables         │
//! │ • RouteTable: immutable routing snapshot                │
//! └─────────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │ Collection Layer                                        │
//! │ • flatten: mount-aware depth-first walk                 │
//! │ • compile: eligibility, naming, schema resolution       │
//! └─────────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │ Emission Layer                                          │
//! │ • ServerWriter dialects: mcp-rb, fast-mcp, mcp-gem      │
//! │ • BypassKeyManager: per-run secret rotation             │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bypass_key;
pub mod codegen;
pub mod config;
pub mod envelope;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod routes;
pub mod schema;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use error::{GenError, GenResult};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::bypass_key::{BypassKeyManager, BYPASS_HEADER};
    pub use crate::codegen::{Dialect, ServerWriter};
    pub use crate::config::{GeneratorConfig, GroupConfig};
    pub use crate::error::{GenError, GenResult};
    pub use crate::generator::generate;
    pub use crate::manifest::Manifest;
    pub use crate::routes::{Exposure, RouteEntry, RouteRecord, RouteTable, Verb};
    pub use crate::schema::{params, ParamDef, ParamKind, ScalarKind, SchemaRegistry};
}

/// Version of mcp-routegen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
