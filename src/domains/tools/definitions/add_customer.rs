//! Add customer tool definition.
//!
//! Creates a customer through the downstream API. All four fields
//! (`name`, `email`, `phone`, `address`) are required strings.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Tool},
};
use tracing::{error, info, instrument};

use super::common::{error_result, json_result, success_result};
use crate::domains::customers::{CustomerBackend, NewCustomer};

/// Parameters for the add customer tool.
pub type AddCustomerParams = NewCustomer;

/// Add customer tool - creates a new customer record.
pub struct AddCustomerTool;

impl AddCustomerTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add-customer";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Tool to add a new customer to the database";

    /// Message returned when the API did not hand back a record.
    pub const NOT_ADDED_MESSAGE: &'static str = "The customer could not be added.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(email = %params.email))]
    pub async fn execute(params: &AddCustomerParams, backend: &dyn CustomerBackend) -> CallToolResult {
        info!("Add customer tool called for: {}", params.name);

        match backend.add_customer(params).await {
            Ok(Some(record)) => json_result(&record),
            Ok(None) => {
                info!("API returned no record for the new customer");
                success_result(Self::NOT_ADDED_MESSAGE)
            }
            Err(e) => {
                error!("Adding customer failed: {}", e);
                error_result(&format!("Failed to add customer: {}", e))
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AddCustomerParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
