//! Get customers tool definition.
//!
//! Lists every customer known to the downstream API.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info, instrument};

use super::common::{error_result, json_result, success_result};
use crate::domains::customers::CustomerBackend;

/// Parameters for the get customers tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetCustomersParams {}

/// Get customers tool - fetches the full customer collection.
pub struct GetCustomersTool;

impl GetCustomersTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-customers";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Tool to get all the customers from the database";

    /// Message returned when the API has no customers.
    pub const NO_DATA_MESSAGE: &'static str = "No customer information was found.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(backend: &dyn CustomerBackend) -> CallToolResult {
        info!("Get customers tool called");

        match backend.list_customers().await {
            Ok(Some(payload)) => json_result(&payload),
            Ok(None) => {
                info!("No customers returned by the API");
                success_result(Self::NO_DATA_MESSAGE)
            }
            Err(e) => {
                error!("Listing customers failed: {}", e);
                error_result(&format!("Failed to get customers: {}", e))
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetCustomersParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
