//! Per-exchange session lifecycle.
//!
//! A [`Session`] pairs a fresh [`McpServer`] with a fresh
//! [`StatelessHttpTransport`] for exactly one HTTP exchange. It is acquired at
//! the top of the request handler and released when it goes out of scope:
//! normal return, early return on a fault, a panic unwinding through the
//! handler, or the handler future being dropped because the client went
//! away. Release closes the transport first, then the server, once.
//!
//! Nothing is shared between sessions except immutable configuration and
//! the backend handle, so concurrent exchanges need no locking.

use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::config::ServerConfig;
use super::server::McpServer;
use super::transport::{StatelessHttpTransport, TransportResult};
use crate::domains::customers::CustomerBackend;

/// Lifecycle milestones of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Created,
    Connected,
    TransportClosed,
    ServerClosed,
}

/// Optional observer of [`SessionEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventSink(Option<UnboundedSender<SessionEvent>>);

impl EventSink {
    pub fn new(sender: UnboundedSender<SessionEvent>) -> Self {
        Self(Some(sender))
    }

    pub fn emit(&self, event: SessionEvent) {
        if let Some(sender) = &self.0 {
            // Receiver gone means nobody is listening anymore.
            let _ = sender.send(event);
        }
    }
}

/// Builds an isolated session per exchange.
#[derive(Clone)]
pub struct SessionFactory {
    server_config: Arc<ServerConfig>,
    backend: Arc<dyn CustomerBackend>,
    events: EventSink,
}

impl SessionFactory {
    /// Create a factory whose sessions run tools against `backend`.
    pub fn new(server_config: ServerConfig, backend: Arc<dyn CustomerBackend>) -> Self {
        Self {
            server_config: Arc::new(server_config),
            backend,
            events: EventSink::default(),
        }
    }

    /// Report lifecycle events of every session to `sender`.
    pub fn with_events(mut self, sender: UnboundedSender<SessionEvent>) -> Self {
        self.events = EventSink::new(sender);
        self
    }

    /// Allocate a new server and transport pair. No I/O happens here.
    pub fn create_session(&self) -> Session {
        let server = Arc::new(McpServer::new(
            self.server_config.clone(),
            self.backend.clone(),
            self.events.clone(),
        ));
        let transport = StatelessHttpTransport::new(self.events.clone());

        debug!("Session created");
        self.events.emit(SessionEvent::Created);

        Session {
            transport,
            server,
            released: false,
        }
    }
}

/// A server instance and its transport adapter, scoped to one exchange.
pub struct Session {
    transport: StatelessHttpTransport,
    server: Arc<McpServer>,
    released: bool,
}

impl Session {
    /// Bind the transport to this session's server.
    pub fn connect(&mut self) -> TransportResult<()> {
        self.transport.connect(Arc::clone(&self.server))
    }

    /// Run one protocol exchange for an already-parsed JSON body.
    pub async fn handle_request(&mut self, body: Value) -> TransportResult<()> {
        self.transport.handle_request(body).await
    }

    /// Whether the exchange response has been produced.
    pub fn is_committed(&self) -> bool {
        self.transport.is_committed()
    }

    /// Take the committed response, if any.
    pub fn take_response(&mut self) -> Option<Response> {
        self.transport.take_response()
    }

    /// The session's server instance.
    pub fn server(&self) -> &McpServer {
        &self.server
    }

    /// Close the transport, then the server. Runs at most once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.transport.close();
        self.server.close();
        debug!("Session released");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::TransportError;
    use crate::domains::customers::testing::RecordingBackend;
    use axum::http::StatusCode;
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn factory() -> (SessionFactory, UnboundedReceiver<SessionEvent>, Arc<RecordingBackend>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::new(RecordingBackend::ok());
        let factory = SessionFactory::new(ServerConfig::default(), backend.clone()).with_events(tx);
        (factory, rx, backend)
    }

    fn drain(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_release_on_drop_closes_transport_then_server() {
        let (factory, mut rx, _) = factory();
        {
            let mut session = factory.create_session();
            session.connect().unwrap();
            session
                .handle_request(json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }))
                .await
                .unwrap();
            assert_eq!(session.take_response().unwrap().status(), StatusCode::OK);
        }

        assert_eq!(
            drain(&mut rx),
            vec![
                SessionEvent::Created,
                SessionEvent::Connected,
                SessionEvent::TransportClosed,
                SessionEvent::ServerClosed,
            ]
        );
    }

    #[tokio::test]
    async fn test_release_runs_once() {
        let (factory, mut rx, _) = factory();
        let mut session = factory.create_session();
        session.release();
        session.release();
        assert!(session.server().is_closed());
        drop(session);

        assert_eq!(
            drain(&mut rx),
            vec![
                SessionEvent::Created,
                SessionEvent::TransportClosed,
                SessionEvent::ServerClosed,
            ]
        );
    }

    #[tokio::test]
    async fn test_release_after_failed_exchange() {
        let (factory, mut rx, backend) = factory();
        {
            let mut session = factory.create_session();
            session.connect().unwrap();
            let err = session.handle_request(json!([])).await.unwrap_err();
            assert!(matches!(err, TransportError::ProtocolError(_)));
            assert!(!session.is_committed());
        }

        let events = drain(&mut rx);
        assert_eq!(
            &events[events.len() - 2..],
            &[SessionEvent::TransportClosed, SessionEvent::ServerClosed]
        );
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (factory, _rx, _) = factory();
        let mut first = factory.create_session();
        let second = factory.create_session();

        first.release();
        assert!(first.server().is_closed());
        assert!(!second.server().is_closed());
    }

    #[tokio::test]
    async fn test_dropping_in_flight_exchange_releases_session() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let backend = Arc::new(
            RecordingBackend::ok().with_delay(std::time::Duration::from_secs(60)),
        );
        let factory = SessionFactory::new(ServerConfig::default(), backend).with_events(tx);

        let exchange = async move {
            let mut session = factory.create_session();
            session.connect().unwrap();
            session
                .handle_request(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "tools/call",
                    "params": { "name": "get-customers" }
                }))
                .await
        };

        // Simulates the client disconnecting while the backend call is pending.
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), exchange).await;
        assert!(timed_out.is_err());

        assert_eq!(
            drain(&mut rx),
            vec![
                SessionEvent::Created,
                SessionEvent::Connected,
                SessionEvent::TransportClosed,
                SessionEvent::ServerClosed,
            ]
        );
    }
}
