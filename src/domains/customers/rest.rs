//! REST implementation of the customer backend.
//!
//! Talks to `GET {API_URL}/customers` and `POST {API_URL}/customers`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{BackendError, BackendResult, CustomerBackend, NewCustomer};
use crate::core::config::BackendConfig;

const CUSTOMERS_PATH: &str = "/customers";

/// Customer backend backed by the downstream REST API.
///
/// The base URL is fixed at construction. A missing base URL is not an
/// error here; it is reported by the first call that needs it.
#[derive(Debug, Clone)]
pub struct RestBackend {
    base_url: Option<String>,
    client: Client,
}

impl RestBackend {
    /// Create a backend from configuration.
    ///
    /// Idle connections are not kept between calls, so nothing pooled
    /// outlives the exchange that opened it.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(BackendError::Client)?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
        })
    }

    fn customers_url(&self) -> BackendResult<String> {
        let base = self
            .base_url
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or(BackendError::MissingBaseUrl)?;
        Ok(format!("{}{}", base.trim_end_matches('/'), CUSTOMERS_PATH))
    }
}

/// Read a response body as JSON. An empty body reads as `null`.
async fn read_json(url: &str, response: Response) -> BackendResult<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| BackendError::request(url, e))?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| BackendError::decode(url, e))
}

/// `null`, `false`, `0` and `""` carry no usable record.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// `None` when the payload has no customers to show.
fn non_empty_customers(payload: Value) -> Option<Value> {
    match payload.get("customers") {
        None | Some(Value::Null) => None,
        Some(Value::Array(customers)) if customers.is_empty() => None,
        Some(_) => Some(payload),
    }
}

#[async_trait]
impl CustomerBackend for RestBackend {
    #[instrument(skip(self))]
    async fn list_customers(&self) -> BackendResult<Option<Value>> {
        let url = self.customers_url()?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::request(&url, e))?;

        let payload = read_json(&url, response).await?;
        Ok(non_empty_customers(payload))
    }

    #[instrument(skip_all, fields(email = %customer.email))]
    async fn add_customer(&self, customer: &NewCustomer) -> BackendResult<Option<Value>> {
        let url = self.customers_url()?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(customer)
            .send()
            .await
            .map_err(|e| BackendError::request(&url, e))?;

        let record = read_json(&url, response).await?;
        Ok(Some(record).filter(|r| !is_falsy(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn backend_for(url: Option<String>) -> RestBackend {
        RestBackend::new(&BackendConfig {
            api_url: url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn customer() -> NewCustomer {
        NewCustomer {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "12 St James's Square".to_string(),
        }
    }

    #[test]
    fn test_non_empty_customers() {
        assert!(non_empty_customers(Value::Null).is_none());
        assert!(non_empty_customers(serde_json::json!({})).is_none());
        assert!(non_empty_customers(serde_json::json!({ "customers": [] })).is_none());
        assert!(non_empty_customers(serde_json::json!({ "customers": null })).is_none());
        assert!(
            non_empty_customers(serde_json::json!({ "customers": [{ "id": 1 }] })).is_some()
        );
    }

    #[tokio::test]
    async fn test_missing_base_url() {
        let backend = backend_for(None);
        let err = backend.list_customers().await.unwrap_err();
        assert!(matches!(err, BackendError::MissingBaseUrl));

        let err = backend.add_customer(&customer()).await.unwrap_err();
        assert!(matches!(err, BackendError::MissingBaseUrl));
    }

    #[tokio::test]
    async fn test_list_customers_returns_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/customers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"customers":[{"id":1,"name":"Ada"}]}"#)
            .create_async()
            .await;

        // Trailing slash must not produce a double slash.
        let backend = backend_for(Some(format!("{}/", server.url())));
        let payload = backend.list_customers().await.unwrap().unwrap();

        assert_eq!(payload["customers"][0]["name"], "Ada");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_customers_empty_is_no_data() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/customers")
            .with_status(200)
            .with_body(r#"{"customers":[]}"#)
            .create_async()
            .await;

        let backend = backend_for(Some(server.url()));
        assert!(backend.list_customers().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_customers_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/customers")
            .with_status(500)
            .create_async()
            .await;

        let backend = backend_for(Some(server.url()));
        let err = backend.list_customers().await.unwrap_err();
        assert!(matches!(err, BackendError::Status { .. }));
    }

    #[tokio::test]
    async fn test_list_customers_invalid_json() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/customers")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let backend = backend_for(Some(server.url()));
        let err = backend.list_customers().await.unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_add_customer_posts_all_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/customers")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "555-0100",
                "address": "12 St James's Square"
            })))
            .with_status(201)
            .with_body(r#"{"id":7,"name":"Ada Lovelace"}"#)
            .create_async()
            .await;

        let backend = backend_for(Some(server.url()));
        let record = backend.add_customer(&customer()).await.unwrap().unwrap();

        assert_eq!(record["id"], 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_customer_null_payload() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/customers")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let backend = backend_for(Some(server.url()));
        assert!(backend.add_customer(&customer()).await.unwrap().is_none());
    }

    #[test]
    fn test_is_falsy() {
        assert!(is_falsy(&Value::Null));
        assert!(is_falsy(&serde_json::json!(false)));
        assert!(is_falsy(&serde_json::json!(0)));
        assert!(is_falsy(&serde_json::json!(0.0)));
        assert!(is_falsy(&serde_json::json!("")));
        assert!(!is_falsy(&serde_json::json!(true)));
        assert!(!is_falsy(&serde_json::json!(7)));
        assert!(!is_falsy(&serde_json::json!("created")));
        assert!(!is_falsy(&serde_json::json!({})));
        assert!(!is_falsy(&serde_json::json!([])));
    }

    #[tokio::test]
    async fn test_add_customer_falsy_payloads() {
        for body in ["false", "\"\"", "0"] {
            let mut server = Server::new_async().await;
            server
                .mock("POST", "/customers")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create_async()
                .await;

            let backend = backend_for(Some(server.url()));
            let record = backend.add_customer(&customer()).await.unwrap();
            assert!(record.is_none(), "body {} should yield no record", body);
        }
    }

    #[tokio::test]
    async fn test_add_customer_empty_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/customers")
            .with_status(204)
            .create_async()
            .await;

        let backend = backend_for(Some(server.url()));
        assert!(backend.add_customer(&customer()).await.unwrap().is_none());
    }
}
