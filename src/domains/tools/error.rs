//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur while resolving a tool call.
///
/// Failures of the downstream API are not tool errors: the tool bodies
/// report those inside a normal tool result.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// The tool cannot run because its server instance was released.
    #[error("Server instance is closed")]
    Closed,
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(tool: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: msg.into(),
        }
    }
}
