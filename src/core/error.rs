//! Error types and handling for the MCP server.
//!
//! Faults that can stop the server: the customer backend failing to build
//! and the transport failing to bind or serve. Per-exchange faults never
//! reach this type; they are answered on the exchange itself.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the customer backend.
    #[error("Backend error: {0}")]
    Backend(#[from] crate::domains::customers::BackendError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}
