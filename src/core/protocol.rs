//! JSON-RPC 2.0 message types.
//!
//! Every error body the server produces, protocol-level or HTTP-level, is
//! built from [`JsonRpcResponse`] so the envelopes cannot drift apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes used by the server.
pub mod codes {
    /// Server-defined: HTTP method not allowed on the endpoint.
    pub const METHOD_NOT_ALLOWED: i32 = -32000;
    /// The message is not a valid request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// JSON-RPC request (or notification) structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
///
/// Exactly one of `result` and `error` is set; `id` is always present and
/// is `null` when the request id is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: id.unwrap_or(Value::Null),
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id: id.unwrap_or(Value::Null),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(
            id,
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, codes::INVALID_PARAMS, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, codes::INTERNAL_ERROR, msg)
    }

    /// Envelope for an exchange that failed before a response was sent.
    pub fn internal_server_error() -> Self {
        Self::internal_error(None, "Internal server error")
    }

    /// Envelope for GET/DELETE on the stateless endpoint.
    pub fn method_not_allowed() -> Self {
        Self::error(None, codes::METHOD_NOT_ALLOWED, "Method not allowed.")
    }
}

/// A single JSON-RPC message received from the client.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a response.
    Request(JsonRpcRequest),
    /// A notification (no `id`), never answered.
    Notification(JsonRpcRequest),
    /// A response to a server-initiated request. The stateless server never
    /// issues any, so these are accepted and dropped.
    Response,
}

impl IncomingMessage {
    /// Classify a JSON value as a JSON-RPC 2.0 message.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "JSON-RPC message must be an object".to_string())?;

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err("Unsupported or missing jsonrpc version".to_string());
        }

        match object.get("id") {
            None | Some(Value::Null | Value::String(_) | Value::Number(_)) => {}
            Some(_) => return Err("JSON-RPC id must be a string, number or null".to_string()),
        }

        if object.contains_key("method") {
            let is_notification = !object.contains_key("id");
            let request: JsonRpcRequest =
                serde_json::from_value(value).map_err(|e| e.to_string())?;
            return Ok(if is_notification {
                Self::Notification(request)
            } else {
                Self::Request(request)
            });
        }

        if object.contains_key("result") || object.contains_key("error") {
            return Ok(Self::Response);
        }

        Err("JSON-RPC message has neither method nor result".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_not_allowed_body() {
        let body = serde_json::to_value(JsonRpcResponse::method_not_allowed()).unwrap();
        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "error": { "code": -32000, "message": "Method not allowed." },
                "id": null
            })
        );
    }

    #[test]
    fn test_internal_server_error_body() {
        let body = serde_json::to_value(JsonRpcResponse::internal_server_error()).unwrap();
        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "error": { "code": -32603, "message": "Internal server error" },
                "id": null
            })
        );
    }

    #[test]
    fn test_success_mirrors_id() {
        let response = JsonRpcResponse::success(Some(json!("abc")), json!({}));
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["id"], "abc");
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_classify_request_and_notification() {
        let request =
            IncomingMessage::from_value(json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }))
                .unwrap();
        assert!(matches!(request, IncomingMessage::Request(r) if r.method == "ping"));

        let null_id =
            IncomingMessage::from_value(json!({ "jsonrpc": "2.0", "id": null, "method": "ping" }))
                .unwrap();
        assert!(matches!(null_id, IncomingMessage::Request(_)));

        let notification = IncomingMessage::from_value(
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        )
        .unwrap();
        assert!(matches!(notification, IncomingMessage::Notification(_)));

        let response =
            IncomingMessage::from_value(json!({ "jsonrpc": "2.0", "id": 3, "result": {} }))
                .unwrap();
        assert!(matches!(response, IncomingMessage::Response));
    }

    #[test]
    fn test_classify_rejects_invalid_shapes() {
        assert!(IncomingMessage::from_value(json!("ping")).is_err());
        assert!(IncomingMessage::from_value(json!({ "id": 1, "method": "ping" })).is_err());
        assert!(
            IncomingMessage::from_value(json!({ "jsonrpc": "2.0", "id": [1], "method": "ping" }))
                .is_err()
        );
        assert!(
            IncomingMessage::from_value(json!({ "jsonrpc": "2.0", "id": 1, "method": 42 }))
                .is_err()
        );
        assert!(IncomingMessage::from_value(json!({ "jsonrpc": "2.0", "id": 1 })).is_err());
    }
}
