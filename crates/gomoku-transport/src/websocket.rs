//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! Each accepted socket is split in two: the write half is driven by a
//! dedicated writer task fed from an unbounded channel (that is what makes
//! [`WebSocketConnection::send`] fire-and-forget), and the read half is
//! handed back to the caller as a [`WebSocketReceiver`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// Listens for incoming WebSocket connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    /// Returns the local address the transport is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for and accepts the next incoming connection.
    ///
    /// Returns the send handle (to register with the connection registry)
    /// and the receive half (for the per-connection message loop).
    pub async fn accept(
        &mut self,
    ) -> Result<(Arc<WebSocketConnection>, WebSocketReceiver), TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            TransportError::AcceptFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        let (sink, stream) = ws.split();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_pump(id, sink, rx));

        Ok((
            Arc::new(WebSocketConnection { id, tx }),
            WebSocketReceiver { id, stream },
        ))
    }
}

/// Drains the outbound channel into the socket until either side closes.
async fn write_pump(
    id: ConnectionId,
    mut sink: SplitSink<WsStream, Message>,
    mut rx: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    while let Some(payload) = rx.recv().await {
        if let Err(e) = sink.send(Message::Binary(payload.into())).await {
            tracing::debug!(%id, error = %e, "write failed, stopping pump");
            break;
        }
    }
    let _ = sink.close().await;
    tracing::debug!(%id, "writer stopped");
}

/// The send half of an accepted WebSocket connection.
pub struct WebSocketConnection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl Connection for WebSocketConnection {
    fn send(&self, payload: &[u8]) {
        if self.tx.send(payload.to_vec()).is_err() {
            tracing::debug!(id = %self.id, "writer gone, payload dropped");
        }
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// The receive half of an accepted WebSocket connection.
pub struct WebSocketReceiver {
    id: ConnectionId,
    stream: SplitStream<WsStream>,
}

impl WebSocketReceiver {
    /// Receives the next data frame.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed. Control
    /// frames (ping/pong) are skipped.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    /// Returns the identifier shared with the send half.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

// =========================================================================
// Tests
// =========================================================================
