//! Stateless transport adapter.
//!
//! Bridges exactly one HTTP request/response to exactly one protocol
//! exchange. The adapter never issues a session id and cannot be reused:
//! once a response is committed every further attempt fails with
//! [`TransportError::AlreadyResponded`].

use std::sync::Arc;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::protocol::{IncomingMessage, JsonRpcResponse};
use crate::core::session::{EventSink, SessionEvent};

/// Transport adapter for a single stateless HTTP exchange.
pub struct StatelessHttpTransport {
    server: Option<Arc<McpServer>>,
    response: Option<Response>,
    committed: bool,
    closed: bool,
    events: EventSink,
}

impl StatelessHttpTransport {
    /// Create an unconnected adapter.
    pub fn new(events: EventSink) -> Self {
        Self {
            server: None,
            response: None,
            committed: false,
            closed: false,
            events,
        }
    }

    /// Bind the adapter to the server that will answer its messages.
    pub fn connect(&mut self, server: Arc<McpServer>) -> TransportResult<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if self.server.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        self.server = Some(server);
        debug!("Transport connected");
        self.events.emit(SessionEvent::Connected);
        Ok(())
    }

    /// Dispatch a parsed JSON body (one message or a batch) and commit the
    /// HTTP response for it.
    ///
    /// Requests are answered in order. An exchange carrying only
    /// notifications or client responses is acknowledged with `202 Accepted`.
    #[instrument(skip_all)]
    pub async fn handle_request(&mut self, body: Value) -> TransportResult<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let server = self.server.clone().ok_or(TransportError::NotConnected)?;
        if self.committed {
            return Err(TransportError::AlreadyResponded);
        }

        let (messages, is_batch) = match body {
            Value::Array(items) if items.is_empty() => {
                return Err(TransportError::protocol("Empty batch"));
            }
            Value::Array(items) => (items, true),
            message => (vec![message], false),
        };

        let messages = messages
            .into_iter()
            .map(IncomingMessage::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(TransportError::protocol)?;

        let mut responses: Vec<JsonRpcResponse> = Vec::new();
        for message in messages {
            match message {
                IncomingMessage::Request(request) => {
                    responses.push(server.handle_request(request).await);
                }
                IncomingMessage::Notification(notification) => {
                    server.handle_notification(&notification);
                }
                IncomingMessage::Response => debug!("Ignoring client response"),
            }
        }

        let response = match responses.pop() {
            None => StatusCode::ACCEPTED.into_response(),
            Some(last) if !is_batch => json_response(StatusCode::OK, &last)?,
            Some(last) => {
                responses.push(last);
                json_response(StatusCode::OK, &responses)?
            }
        };

        self.commit(response)
    }

    fn commit(&mut self, response: Response) -> TransportResult<()> {
        if self.committed {
            return Err(TransportError::AlreadyResponded);
        }
        self.committed = true;
        self.response = Some(response);
        Ok(())
    }

    /// Whether a response has been committed for this exchange.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Hand the committed response to the HTTP layer.
    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }

    /// Close the adapter and drop its server handle.
    ///
    /// Returns `true` for the call that actually closed it.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.server = None;
        debug!("Transport closed");
        self.events.emit(SessionEvent::TransportClosed);
        true
    }
}

/// Serialize `body` as an `application/json` response.
pub(crate) fn json_response<T: serde::Serialize>(
    status: StatusCode,
    body: &T,
) -> TransportResult<Response> {
    let bytes = serde_json::to_vec(body)?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}
