//! In-process connection backed by a tokio channel.
//!
//! The production server wraps WebSockets, but everything above the
//! transport layer only needs the [`Connection`] trait — so tests (and
//! embedded setups) use this channel-backed handle and assert on the
//! receiver side instead of opening sockets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{Connection, ConnectionId};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A [`Connection`] whose outbound frames land on an in-process channel.
pub struct ChannelConnection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelConnection {
    /// Creates a connection handle and the receiver its frames land on.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        (Arc::new(Self { id, tx }), rx)
    }
}

impl Connection for ChannelConnection {
    fn send(&self, payload: &[u8]) {
        if self.tx.send(payload.to_vec()).is_err() {
            tracing::debug!(id = %self.id, "receiver gone, payload dropped");
        }
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_delivers_payload_to_receiver() {
        let (conn, mut rx) = ChannelConnection::new();

        conn.send(b"hello");

        assert_eq!(rx.recv().await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_does_not_panic() {
        let (conn, rx) = ChannelConnection::new();
        drop(rx);

        // Fire-and-forget: the payload is silently dropped.
        conn.send(b"into the void");
    }

    #[test]
    fn test_each_connection_gets_unique_id() {
        let (a, _rx_a) = ChannelConnection::new();
        let (b, _rx_b) = ChannelConnection::new();
        assert_ne!(a.id(), b.id());
    }
}
