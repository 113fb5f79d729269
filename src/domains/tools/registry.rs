//! Tool Registry - the closed tool set and its dispatch.
//!
//! This module provides:
//! - [`ToolCall`], one variant per tool carrying its typed arguments
//! - Tool metadata for listing
//! - Dispatch of a parsed call to the customer backend

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::ToolError;
use super::definitions::{AddCustomerParams, AddCustomerTool, GetCustomersParams, GetCustomersTool};
use crate::domains::customers::CustomerBackend;

// ============================================================================
// Tool Call
// ============================================================================

/// A validated call to one of the known tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// `get-customers`, no arguments.
    GetCustomers,
    /// `add-customer` with its four required fields.
    AddCustomer(AddCustomerParams),
}

impl ToolCall {
    /// Resolve a tool name and validate its arguments against the tool schema.
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, ToolError> {
        match name {
            GetCustomersTool::NAME => {
                let _: GetCustomersParams = parse_arguments(name, arguments)?;
                Ok(Self::GetCustomers)
            }
            AddCustomerTool::NAME => Ok(Self::AddCustomer(parse_arguments(name, arguments)?)),
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }

    /// Name of the tool this call targets.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetCustomers => GetCustomersTool::NAME,
            Self::AddCustomer(_) => AddCustomerTool::NAME,
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: Option<JsonObject>,
) -> Result<T, ToolError> {
    let arguments = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - owns the backend the tools run against.
pub struct ToolRegistry {
    backend: Arc<dyn CustomerBackend>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(backend: Arc<dyn CustomerBackend>) -> Self {
        Self { backend }
    }

    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![GetCustomersTool::NAME, AddCustomerTool::NAME]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![GetCustomersTool::to_tool(), AddCustomerTool::to_tool()]
    }

    /// Run a parsed tool call.
    pub async fn call(&self, call: &ToolCall) -> CallToolResult {
        info!("Dispatching tool: {}", call.name());
        match call {
            ToolCall::GetCustomers => GetCustomersTool::execute(self.backend.as_ref()).await,
            ToolCall::AddCustomer(params) => {
                AddCustomerTool::execute(params, self.backend.as_ref()).await
            }
        }
    }
}
