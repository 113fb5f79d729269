//! In-memory customer backend for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{BackendError, BackendResult, CustomerBackend, NewCustomer};

/// What the test backend answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A usable payload.
    Payload(Value),
    /// The "no data" sentinel.
    Empty,
    /// A downstream fault.
    Fail,
    /// Panic inside the call.
    Panic,
}

/// Backend double that records every call it receives.
pub struct RecordingBackend {
    list_reply: Reply,
    add_reply: Reply,
    delay: Option<Duration>,
    list_calls: AtomicUsize,
    added: Mutex<Vec<NewCustomer>>,
}

impl RecordingBackend {
    pub fn new(list_reply: Reply, add_reply: Reply) -> Self {
        Self {
            list_reply,
            add_reply,
            delay: None,
            list_calls: AtomicUsize::new(0),
            added: Mutex::new(Vec::new()),
        }
    }

    /// Backend that answers every call with a payload.
    pub fn ok() -> Self {
        Self::new(
            Reply::Payload(serde_json::json!({ "customers": [{ "id": 1, "name": "Ada" }] })),
            Reply::Payload(serde_json::json!({ "id": 2, "name": "Grace" })),
        )
    }

    /// Suspend every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn added(&self) -> Vec<NewCustomer> {
        self.added.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.added.lock().unwrap().len()
    }

    async fn answer(&self, reply: &Reply) -> BackendResult<Option<Value>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Payload(value) => Ok(Some(value.clone())),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(BackendError::Status {
                url: "http://backend.test/customers".to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            }),
            Reply::Panic => panic!("backend exploded"),
        }
    }
}

#[async_trait]
impl CustomerBackend for RecordingBackend {
    async fn list_customers(&self) -> BackendResult<Option<Value>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.list_reply).await
    }

    async fn add_customer(&self, customer: &NewCustomer) -> BackendResult<Option<Value>> {
        self.added.lock().unwrap().push(customer.clone());
        self.answer(&self.add_reply).await
    }
}
