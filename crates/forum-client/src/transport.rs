//! Duplex channel transport
//!
//! The chat connection is a capability: something that can be opened with a
//! session token and then split into a write half and a read half. The
//! [`ChannelFactory`] seam lets the connection manager run against the real
//! WebSocket transport or an in-memory pair in tests.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::errors::{ConnectError, SendError};

// ----------------------------------------------------------------------------
// Channel Traits
// ----------------------------------------------------------------------------

/// Write half of an open duplex channel.
#[async_trait]
pub trait ChannelSink: Send {
    /// Transmit one UTF-8 text frame.
    async fn send_text(&mut self, frame: &str) -> Result<(), SendError>;

    /// Best-effort close of the underlying transport.
    async fn close(&mut self);
}

/// Read half of an open duplex channel.
#[async_trait]
pub trait ChannelStream: Send {
    /// Next inbound text frame, in arrival order. `None` once the channel
    /// has closed or failed; the two are indistinguishable to the caller,
    /// which treats both as a transition to `Closed`.
    async fn next_frame(&mut self) -> Option<String>;
}

/// Opens duplex channels against the chat endpoint.
#[async_trait]
pub trait ChannelFactory: Send + Sync {
    async fn open(
        &self,
        token: &str,
    ) -> Result<(Box<dyn ChannelSink>, Box<dyn ChannelStream>), ConnectError>;
}

// ----------------------------------------------------------------------------
// WebSocket Implementation
// ----------------------------------------------------------------------------

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production factory: WebSocket with the session token presented as a
/// `Authorization: Bearer` handshake header, which is how the forum server
/// authenticates the upgrade.
pub struct WebSocketChannelFactory {
    url: String,
}

impl WebSocketChannelFactory {
    /// `url` is the full chat endpoint, e.g. `ws://host:port/ws/chat`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ChannelFactory for WebSocketChannelFactory {
    async fn open(
        &self,
        token: &str,
    ) -> Result<(Box<dyn ChannelSink>, Box<dyn ChannelStream>), ConnectError> {
        let mut request =
            self.url
                .as_str()
                .into_client_request()
                .map_err(|e| ConnectError::Handshake {
                    reason: format!("invalid chat URL: {}", e),
                })?;

        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
            ConnectError::Handshake {
                reason: format!("token not header-safe: {}", e),
            }
        })?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| ConnectError::Transport {
                reason: e.to_string(),
            })?;
        debug!(url = %self.url, "duplex channel opened");

        let (write, read) = stream.split();
        Ok((
            Box::new(WebSocketSink { write }),
            Box::new(WebSocketChannelStream { read }),
        ))
    }
}

struct WebSocketSink {
    write: SplitSink<WsStream, Message>,
}

#[async_trait]
impl ChannelSink for WebSocketSink {
    async fn send_text(&mut self, frame: &str) -> Result<(), SendError> {
        self.write
            .send(Message::Text(frame.to_string()))
            .await
            .map_err(|e| SendError::TransportFailure {
                reason: e.to_string(),
            })
    }

    async fn close(&mut self) {
        if let Err(e) = self.write.send(Message::Close(None)).await {
            debug!("close frame not delivered: {}", e);
        }
    }
}

struct WebSocketChannelStream {
    read: SplitStream<WsStream>,
}

#[async_trait]
impl ChannelStream for WebSocketChannelStream {
    async fn next_frame(&mut self) -> Option<String> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => return Some(text),
                Ok(Message::Close(_)) => return None,
                Ok(Message::Binary(_)) => {
                    debug!("ignoring binary frame on chat channel");
                }
                // Ping/pong are answered by tungstenite itself
                Ok(_) => {}
                Err(e) => {
                    warn!("chat channel read failed: {}", e);
                    return None;
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Test Support
// ----------------------------------------------------------------------------
