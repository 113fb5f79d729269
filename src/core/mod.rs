//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the per-exchange session
//! lifecycle, and the HTTP transport.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

use std::sync::Arc;

use crate::domains::customers::RestBackend;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use session::{Session, SessionEvent, SessionFactory};
pub use transport::{HttpConfig, HttpTransport};

/// Serve the MCP endpoint described by `config` until shutdown.
pub async fn serve(config: Config) -> Result<()> {
    let backend = Arc::new(RestBackend::new(&config.backend)?);
    let factory = SessionFactory::new(config.server.clone(), backend);

    HttpTransport::new(config.transport).run(factory).await?;
    Ok(())
}
