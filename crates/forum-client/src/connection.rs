//! Connection lifecycle management for the chat channel
//!
//! The [`ConnectionManager`] exclusively owns the single duplex channel. A
//! connection exists if and only if the session has a token: `ensure_open`
//! refuses to open without one, and logout tears the channel down. Inbound
//! frames are dispatched to registered handlers in arrival order by a reader
//! task; a transport failure ends that task and flips the state to `Closed`,
//! from which an explicit `ensure_open` recovers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{ConnectError, SendError};
use crate::session::Session;
use crate::transport::{ChannelFactory, ChannelSink};
use crate::wire::OutgoingMessage;

// ----------------------------------------------------------------------------
// Connection State
// ----------------------------------------------------------------------------

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No channel; sends fail with `NotConnected`
    Closed,
    /// Channel live; frames flow both ways
    Open,
}

/// Callback invoked once per inbound frame, in arrival order.
pub type MessageHandler = Box<dyn Fn(&str) + Send + Sync>;

// ----------------------------------------------------------------------------
// Connection Manager
// ----------------------------------------------------------------------------

struct Inner {
    sink: Option<Box<dyn ChannelSink>>,
    reader: Option<JoinHandle<()>>,
    // Incremented per open so a stale reader's cleanup cannot clobber a
    // connection opened after it
    generation: u64,
}

/// Owns the single duplex chat channel.
pub struct ConnectionManager {
    factory: Box<dyn ChannelFactory>,
    inner: Arc<Mutex<Inner>>,
    handlers: Arc<Mutex<Vec<MessageHandler>>>,
}

impl ConnectionManager {
    pub fn new(factory: Box<dyn ChannelFactory>) -> Self {
        Self {
            factory,
            inner: Arc::new(Mutex::new(Inner {
                sink: None,
                reader: None,
                generation: 0,
            })),
            handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ConnectionState {
        if self.inner.lock().await.sink.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Open the channel for an authenticated session.
    ///
    /// Idempotent: a no-op when a connection is already open, and a no-op
    /// when the session has no token. The lock is held across the handshake,
    /// so at most one channel instance can ever exist.
    pub async fn ensure_open(&self, session: &Session) -> Result<(), ConnectError> {
        let mut inner = self.inner.lock().await;
        if inner.sink.is_some() {
            return Ok(());
        }
        let Some(token) = session.token() else {
            debug!("ensure_open without a token is a no-op");
            return Ok(());
        };

        let (sink, mut stream) = self.factory.open(token).await?;

        inner.generation += 1;
        let generation = inner.generation;
        let handlers = Arc::clone(&self.handlers);
        let shared = Arc::clone(&self.inner);

        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next_frame().await {
                let handlers = handlers.lock().await;
                for handler in handlers.iter() {
                    handler(&frame);
                }
            }
            // Stream ended: server close or transport failure either way
            let mut inner = shared.lock().await;
            if inner.generation == generation {
                warn!("chat channel closed by transport");
                inner.sink = None;
                inner.reader = None;
            }
        });

        inner.sink = Some(sink);
        inner.reader = Some(reader);
        info!("chat connection opened");
        Ok(())
    }

    /// Tear down the channel. Idempotent; closing while `Closed` is a no-op.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(reader) = inner.reader.take() {
            reader.abort();
        }
        if let Some(mut sink) = inner.sink.take() {
            sink.close().await;
            info!("chat connection closed");
        }
    }

    /// Serialize `{ content }` and transmit it over the open channel.
    ///
    /// Fails with `NotConnected` when no connection is open. A transport
    /// failure tears the connection down before surfacing the error.
    pub async fn send(&self, content: &str) -> Result<(), SendError> {
        let mut inner = self.inner.lock().await;
        let sink = inner.sink.as_mut().ok_or(SendError::NotConnected)?;

        let frame = serde_json::to_string(&OutgoingMessage::new(content)).map_err(|e| {
            SendError::TransportFailure {
                reason: format!("payload serialization failed: {}", e),
            }
        })?;

        match sink.send_text(&frame).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("send failed, closing connection: {}", e);
                inner.sink = None;
                if let Some(reader) = inner.reader.take() {
                    reader.abort();
                }
                Err(e)
            }
        }
    }

    /// Register a handler for inbound frames.
    ///
    /// Handlers run once per frame in arrival order for as long as a
    /// connection is open. There is no buffering or replay: a reconnect
    /// starts a fresh, empty stream.
    pub async fn on_message<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.handlers.lock().await.push(Box::new(handler));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::MockChannelFactory;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    fn manager() -> (ConnectionManager, Arc<crate::transport::testing::MockNet>) {
        let (factory, net) = MockChannelFactory::new();
        (ConnectionManager::new(Box::new(factory)), net)
    }

    fn authed() -> Session {
        Session::authenticated("test-token", "testuser")
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_ensure_open_requires_token() {
        let (manager, net) = manager();
        manager.ensure_open(&Session::empty()).await.unwrap();
        assert_eq!(net.open_count(), 0);
        assert_eq!(manager.state().await, ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_ensure_open_opens_exactly_once() {
        let (manager, net) = manager();
        manager.ensure_open(&authed()).await.unwrap();
        manager.ensure_open(&authed()).await.unwrap();

        assert_eq!(net.open_count(), 1);
        assert_eq!(net.tokens_seen(), vec!["test-token"]);
        assert_eq!(manager.state().await, ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_send_without_connection_fails() {
        let (manager, _net) = manager();
        let err = manager.send("Test message").await.unwrap_err();
        assert!(matches!(err, SendError::NotConnected));
    }

    #[tokio::test]
    async fn test_send_transmits_exact_payload() {
        let (manager, net) = manager();
        manager.ensure_open(&authed()).await.unwrap();

        manager.send("Test message").await.unwrap();
        assert_eq!(net.sent_frames(), vec![r#"{"content":"Test message"}"#]);
    }

    #[tokio::test]
    async fn test_handlers_run_in_arrival_order() {
        let (manager, net) = manager();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        {
            let seen = seen.clone();
            manager
                .on_message(move |frame| seen.lock().unwrap().push(frame.to_string()))
                .await;
        }

        manager.ensure_open(&authed()).await.unwrap();
        net.push_inbound("one");
        net.push_inbound("two");
        net.push_inbound("three");
        settle().await;

        assert_eq!(*seen.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_transport_failure_transitions_to_closed() {
        let (manager, net) = manager();
        manager.ensure_open(&authed()).await.unwrap();

        net.drop_stream();
        settle().await;

        assert_eq!(manager.state().await, ConnectionState::Closed);
        let err = manager.send("hello").await.unwrap_err();
        assert!(matches!(err, SendError::NotConnected));
    }

    #[tokio::test]
    async fn test_reconnect_starts_fresh_stream() {
        let (manager, net) = manager();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        {
            let seen = seen.clone();
            manager
                .on_message(move |frame| seen.lock().unwrap().push(frame.to_string()))
                .await;
        }

        manager.ensure_open(&authed()).await.unwrap();
        net.drop_stream();
        settle().await;

        manager.ensure_open(&authed()).await.unwrap();
        assert_eq!(net.open_count(), 2);
        assert_eq!(manager.state().await, ConnectionState::Open);

        net.push_inbound("after-reconnect");
        settle().await;
        assert_eq!(*seen.lock().unwrap(), vec!["after-reconnect"]);
    }

    #[tokio::test]
    async fn test_send_failure_closes_connection() {
        let (manager, net) = manager();
        manager.ensure_open(&authed()).await.unwrap();

        net.set_fail_sends(true);
        let err = manager.send("doomed").await.unwrap_err();
        assert!(matches!(err, SendError::TransportFailure { .. }));
        assert_eq!(manager.state().await, ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (manager, net) = manager();
        manager.ensure_open(&authed()).await.unwrap();

        manager.close().await;
        manager.close().await;
        assert_eq!(manager.state().await, ConnectionState::Closed);

        // And the manager can come back afterwards
        manager.ensure_open(&authed()).await.unwrap();
        assert_eq!(net.open_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_open_leaves_state_closed() {
        let (manager, net) = manager();
        net.set_fail_opens(true);

        let err = manager.ensure_open(&authed()).await.unwrap_err();
        assert!(matches!(err, ConnectError::Transport { .. }));
        assert_eq!(manager.state().await, ConnectionState::Closed);
    }
}
