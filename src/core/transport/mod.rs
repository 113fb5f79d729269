//! Transport layer for the MCP server.
//!
//! Streamable HTTP in stateless mode:
//! - **adapter**: bridges one HTTP exchange to one protocol exchange
//! - **http**: axum endpoint that creates a session per POST and rejects
//!   GET/DELETE before any session exists
//!
//! No session identifier is issued and nothing survives an exchange.

mod adapter;
mod config;
mod error;
pub mod http;

pub use adapter::StatelessHttpTransport;
pub use config::{DEFAULT_PORT, HttpConfig};
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
