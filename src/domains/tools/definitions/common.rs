//! Common utilities shared across the customer tools.
//!
//! Response formatting and error helpers.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::warn;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content.into())])
}

/// Create a success result carrying a pretty-printed JSON payload.
pub fn json_result(payload: &Value) -> CallToolResult {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => success_result(text),
        Err(e) => error_result(&format!("Failed to format response: {}", e)),
    }
}
