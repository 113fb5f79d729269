//! Customer MCP Server Library
//!
//! A stateless Model Context Protocol (MCP) server that exposes customer
//! tools over Streamable HTTP and proxies each call to a REST API.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, JSON-RPC types, the per-exchange
//!   session lifecycle and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **customers**: the downstream REST API the tools delegate to
//!   - **tools**: the closed set of MCP tools and their dispatch
//!
//! Every HTTP exchange gets its own server instance and transport adapter,
//! which are torn down when the exchange ends.
//!
//! # Example
//!
//! ```rust,no_run
//! use customer_mcp_server::{Config, serve};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     serve(Config::from_env()).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result, serve};
