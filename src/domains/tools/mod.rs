//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions against the customer API.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Closed tool set, metadata and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with `NAME`, `to_tool()` and `execute()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a [`ToolCall`] variant and its arms in `registry.rs`
//!
//! The compiler flags every dispatch site that misses the new variant.

pub mod definitions;
mod error;
mod registry;

pub use error::ToolError;
pub use registry::{ToolCall, ToolRegistry};
