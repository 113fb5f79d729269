//! HTTP transport implementation.
//!
//! Streamable HTTP endpoint in stateless mode. Every `POST` gets its own
//! session, created after the body parsed as JSON and released when the
//! handler scope ends. `GET` and `DELETE` are refused before any session
//! exists: there is no server-held session to stream from or terminate.

use std::any::Any;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::protocol::JsonRpcResponse;
use crate::core::session::{Session, SessionFactory};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
///
/// Holds only the session factory; no session outlives its request.
#[derive(Clone)]
pub struct AppState {
    factory: SessionFactory,
    rpc_path: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until Ctrl+C.
    pub async fn run(self, factory: SessionFactory) -> TransportResult<()> {
        let addr = self.address();
        info!("Starting transport: {}", self.config.description());

        let app = build_router(factory, &self.config);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (stateless Streamable HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → MCP:    POST {}", self.config.rpc_path);
        info!("  → Health: GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the router for the MCP endpoint and the auxiliary routes.
pub fn build_router(factory: SessionFactory, config: &HttpConfig) -> Router {
    let state = AppState {
        factory,
        rpc_path: config.rpc_path.clone(),
    };

    let mut app = Router::new()
        .route(
            &config.rpc_path,
            post(handle_mcp_post)
                .get(method_not_allowed)
                .delete(method_not_allowed),
        )
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin);
        app = app.layer(cors);
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Build an HTTP error response carrying a JSON-RPC error envelope.
pub fn error_response(status: StatusCode, envelope: JsonRpcResponse) -> Response {
    (status, Json(envelope)).into_response()
}

fn internal_error_response() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        JsonRpcResponse::internal_server_error(),
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> http::Response<axum::body::Body> {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Panic while handling MCP request: {}", detail);
    internal_error_response()
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Customer MCP Server",
        "version": env!("CARGO_PKG_VERSION"),
        "transport": "Streamable HTTP (stateless)",
        "endpoints": {
            "mcp": state.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "documentation": format!("Send POST requests to {} with JSON-RPC messages", state.rpc_path)
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET/DELETE on the MCP endpoint.
async fn method_not_allowed(method: Method) -> Response {
    warn!("Rejected {} on stateless MCP endpoint", method);
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        JsonRpcResponse::method_not_allowed(),
    )
}

/// Handle one MCP exchange.
#[instrument(skip_all)]
async fn handle_mcp_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            error!("Error parsing MCP request body: {}", rejection.body_text());
            return internal_error_response();
        }
    };

    // Released on every exit from this scope, including unwinding and the
    // future being dropped on client disconnect.
    let mut session = state.factory.create_session();

    let outcome = run_exchange(&mut session, body).await;
    finish_exchange(&mut session, outcome)
}

/// Pick the single HTTP response for an exchange.
///
/// A fault before commit becomes the 500 envelope. A fault after commit is
/// logged only: the committed response is still the one sent.
fn finish_exchange(session: &mut Session, outcome: TransportResult<()>) -> Response {
    if let Err(e) = outcome {
        error!("Error handling MCP request: {}", e);
        if !session.is_committed() {
            return internal_error_response();
        }
        warn!("Response already committed; fault not reported to client");
    }

    session.take_response().unwrap_or_else(|| {
        error!("Exchange finished without a response");
        internal_error_response()
    })
}

async fn run_exchange(session: &mut Session, body: Value) -> TransportResult<()> {
    session.connect()?;
    session.handle_request(body).await
}
