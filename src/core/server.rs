//! MCP server instance.
//!
//! One [`McpServer`] is built per session. It owns the fixed tool set and
//! answers the protocol methods delivered to it by the transport adapter.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and resolved through [`ToolCall`], so an unknown tool or a malformed
//! argument set is rejected before the backend is touched.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rmcp::model::{JsonObject, ServerCapabilities, ServerInfo, Tool};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::config::ServerConfig;
use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use super::session::{EventSink, SessionEvent};
use crate::domains::customers::CustomerBackend;
use crate::domains::tools::{ToolCall, ToolError, ToolRegistry};

const INSTRUCTIONS: &str =
    "Customer directory server. Use get-customers to list customers and add-customer to create one.";

/// Parameters of a `tools/call` request.
#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<JsonObject>,
}

/// The protocol server for a single session.
pub struct McpServer {
    /// Server identification.
    info: Arc<ServerConfig>,

    /// Tool set bound to the customer backend.
    tools: ToolRegistry,

    /// Set once by [`McpServer::close`].
    closed: AtomicBool,

    events: EventSink,
}

impl McpServer {
    /// Create a server instance with the customer tools registered.
    pub fn new(info: Arc<ServerConfig>, backend: Arc<dyn CustomerBackend>, events: EventSink) -> Self {
        Self {
            info,
            tools: ToolRegistry::new(backend),
            closed: AtomicBool::new(false),
            events,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.info.version
    }

    /// List all registered tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        ToolRegistry::get_all_tools()
    }

    /// Whether [`McpServer::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the server instance.
    ///
    /// Returns `true` for the call that actually closed it; later calls are
    /// no-ops.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        debug!("Server instance closed");
        self.events.emit(SessionEvent::ServerClosed);
        true
    }

    fn server_info(&self) -> ServerInfo {
        let mut info = ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        };
        info.server_info.name = self.name().to_string();
        info.server_info.version = self.version().to_string();
        info
    }

    /// Answer one JSON-RPC request.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Received JSON-RPC request: {}", request.method);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(request.id, &request.method)
            }
        }
    }

    /// Accept a notification. Nothing is sent back.
    pub fn handle_notification(&self, notification: &JsonRpcRequest) {
        match notification.method.as_str() {
            "notifications/initialized" => info!("Client sent initialized notification"),
            method => debug!("Received notification: {}", method),
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Processing initialize request");

        match serde_json::to_value(self.server_info()) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Processing tools/list request");

        match serde_json::to_value(self.list_tools()) {
            Ok(tools) => JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools })),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Processing tools/call request");

        let params: CallToolParams =
            match serde_json::from_value(request.params.unwrap_or(Value::Null)) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::invalid_params(
                        request.id,
                        format!("Invalid tools/call params: {}", e),
                    );
                }
            };

        let call = match self.resolve(&params) {
            Ok(call) => call,
            Err(e @ ToolError::Closed) => {
                return JsonRpcResponse::internal_error(request.id, e.to_string());
            }
            Err(e) => return JsonRpcResponse::invalid_params(request.id, e.to_string()),
        };

        let result = self.tools.call(&call).await;
        match serde_json::to_value(result) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    fn resolve(&self, params: &CallToolParams) -> Result<ToolCall, ToolError> {
        if self.is_closed() {
            return Err(ToolError::Closed);
        }
        ToolCall::parse(&params.name, params.arguments.clone())
    }
}
