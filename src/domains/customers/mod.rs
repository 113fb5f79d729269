//! Customers domain module.
//!
//! This module owns the Tool Backend: the downstream REST API that the
//! customer tools delegate their data operations to.
//!
//! ## Architecture
//!
//! - `error.rs` - Backend error types
//! - `rest.rs` - `reqwest` implementation against `{API_URL}/customers`
//!
//! Tools only see the [`CustomerBackend`] trait, so tests can inject a
//! backend that never touches the network.

mod error;
mod rest;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::{BackendError, BackendResult};
pub use rest::RestBackend;

/// A customer to be created in the downstream API.
///
/// All four fields are required strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewCustomer {
    /// Customer name.
    #[schemars(description = "User name")]
    pub name: String,

    /// Customer email address.
    #[schemars(description = "User email")]
    pub email: String,

    /// Customer phone number.
    #[schemars(description = "User phone")]
    pub phone: String,

    /// Customer postal address.
    #[schemars(description = "User address")]
    pub address: String,
}

/// Contract of the downstream customer API.
///
/// `Ok(None)` is the explicit "no data" sentinel: the backend answered but
/// the payload carries nothing usable. Faults are reported as `Err` and the
/// tool bodies turn them into tool-result messages.
#[async_trait]
pub trait CustomerBackend: Send + Sync {
    /// Fetch every customer. `None` when the collection is empty or absent.
    async fn list_customers(&self) -> BackendResult<Option<serde_json::Value>>;

    /// Create a customer. `None` when the API returned no usable record.
    async fn add_customer(&self, customer: &NewCustomer)
    -> BackendResult<Option<serde_json::Value>>;
}
