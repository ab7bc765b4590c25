//! Transport surface consumed by the gomoku coordination core.
//!
//! The core never talks to sockets directly. It sees two things:
//!
//! - [`Connection`] — an opaque handle to a live client connection with a
//!   fire-and-forget `send`. The registries borrow these handles; they never
//!   own the underlying socket.
//! - [`set_timer`] — a cancellable delayed action, used by the session
//!   manager to expire idle sessions.
//!
//! Two connection implementations are provided: [`ChannelConnection`]
//! (in-process, for embedding and tests) and [`WebSocketConnection`]
//! (tokio-tungstenite, behind the default `websocket` feature).

mod channel;
mod error;
mod timer;
#[cfg(feature = "websocket")]
mod websocket;

pub use channel::ChannelConnection;
pub use error::TransportError;
pub use timer::{set_timer, TimerHandle};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketReceiver, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A handle to a live client connection.
///
/// `send` is fire-and-forget: it enqueues the payload for delivery and
/// returns immediately, so it is safe to call while holding a lock. If the
/// peer is already gone the payload is dropped and logged — a dead
/// connection is detected by the lifecycle callbacks, not by send failures.
///
/// Object-safe on purpose: registries store `Arc<dyn Connection>` so the
/// same maps serve WebSocket connections in production and channel-backed
/// connections in tests.
pub trait Connection: Send + Sync + 'static {
    /// Enqueues a payload for delivery to the peer.
    fn send(&self, payload: &[u8]);

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
