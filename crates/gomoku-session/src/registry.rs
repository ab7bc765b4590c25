//! The connection registry: who is reachable, and in which context.

use std::collections::HashMap;
use std::sync::Arc;

use gomoku_protocol::UserId;
use gomoku_transport::Connection;
use tokio::sync::Mutex;

struct Maps {
    lobby: HashMap<UserId, Arc<dyn Connection>>,
    room: HashMap<UserId, Arc<dyn Connection>>,
}

/// Maps each player to their currently-active connection handle, separately
/// for the lobby and the room context.
///
/// One mutex covers both maps, so every operation here is atomic with
/// respect to every other. The registry only mutates the maps — it never
/// closes or notifies a connection; callers own those side effects. A uid
/// is expected to appear in at most one of the two maps at a time, but that
/// is a caller-maintained convention, not something the structure enforces.
///
/// A `None` from [`conn_from_lobby`]/[`conn_from_room`] is how the rest of
/// the server detects that a player is not reachable in that context: the
/// matchmaker drops unreachable players from a pairing, and a room treats
/// an absent mover as having forfeited.
///
/// [`conn_from_lobby`]: ConnectionRegistry::conn_from_lobby
/// [`conn_from_room`]: ConnectionRegistry::conn_from_room
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<Maps>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Maps {
                lobby: HashMap::new(),
                room: HashMap::new(),
            })),
        }
    }

    /// Registers `conn` as `uid`'s lobby connection. The newest handle wins
    /// if one was already registered.
    pub async fn enter_lobby(&self, uid: UserId, conn: Arc<dyn Connection>) {
        let mut maps = self.inner.lock().await;
        maps.lobby.insert(uid, conn);
        tracing::debug!(%uid, "entered lobby");
    }

    /// Removes `uid`'s lobby connection. No-op if absent.
    pub async fn exit_lobby(&self, uid: UserId) {
        let mut maps = self.inner.lock().await;
        maps.lobby.remove(&uid);
        tracing::debug!(%uid, "left lobby");
    }

    /// Registers `conn` as `uid`'s room connection.
    pub async fn enter_room(&self, uid: UserId, conn: Arc<dyn Connection>) {
        let mut maps = self.inner.lock().await;
        maps.room.insert(uid, conn);
        tracing::debug!(%uid, "entered room context");
    }

    /// Removes `uid`'s room connection. No-op if absent.
    pub async fn exit_room(&self, uid: UserId) {
        let mut maps = self.inner.lock().await;
        maps.room.remove(&uid);
        tracing::debug!(%uid, "left room context");
    }

    /// Is the player currently reachable in the lobby?
    pub async fn in_lobby(&self, uid: UserId) -> bool {
        self.inner.lock().await.lobby.contains_key(&uid)
    }

    /// Is the player currently reachable in a room?
    pub async fn in_room(&self, uid: UserId) -> bool {
        self.inner.lock().await.room.contains_key(&uid)
    }

    /// The player's lobby connection, or `None` if unreachable there.
    pub async fn conn_from_lobby(&self, uid: UserId) -> Option<Arc<dyn Connection>> {
        self.inner.lock().await.lobby.get(&uid).cloned()
    }

    /// The player's room connection, or `None` if unreachable there.
    pub async fn conn_from_room(&self, uid: UserId) -> Option<Arc<dyn Connection>> {
        self.inner.lock().await.room.get(&uid).cloned()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_transport::ChannelConnection;

    fn uid(id: u64) -> UserId {
        UserId(id)
    }

    #[tokio::test]
    async fn test_enter_lobby_makes_player_reachable() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = ChannelConnection::new();

        registry.enter_lobby(uid(1), conn).await;

        assert!(registry.in_lobby(uid(1)).await);
        assert!(registry.conn_from_lobby(uid(1)).await.is_some());
        // Lobby presence says nothing about room presence.
        assert!(!registry.in_room(uid(1)).await);
    }

    #[tokio::test]
    async fn test_exit_lobby_removes_reachability() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = ChannelConnection::new();
        registry.enter_lobby(uid(1), conn).await;

        registry.exit_lobby(uid(1)).await;

        assert!(!registry.in_lobby(uid(1)).await);
        assert!(registry.conn_from_lobby(uid(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_exit_absent_player_is_noop() {
        let registry = ConnectionRegistry::new();
        registry.exit_lobby(uid(9)).await;
        registry.exit_room(uid(9)).await;
    }

    #[tokio::test]
    async fn test_lobby_and_room_maps_are_independent() {
        let registry = ConnectionRegistry::new();
        let (lobby_conn, _rx1) = ChannelConnection::new();
        let (room_conn, _rx2) = ChannelConnection::new();

        registry.enter_lobby(uid(1), lobby_conn).await;
        registry.enter_room(uid(2), room_conn).await;

        assert!(registry.in_lobby(uid(1)).await);
        assert!(!registry.in_room(uid(1)).await);
        assert!(registry.in_room(uid(2)).await);
        assert!(!registry.in_lobby(uid(2)).await);
    }

    #[tokio::test]
    async fn test_reentering_replaces_connection() {
        let registry = ConnectionRegistry::new();
        let (old_conn, _old_rx) = ChannelConnection::new();
        let (new_conn, mut new_rx) = ChannelConnection::new();

        registry.enter_lobby(uid(1), old_conn).await;
        registry.enter_lobby(uid(1), new_conn).await;

        let stored = registry.conn_from_lobby(uid(1)).await.unwrap();
        stored.send(b"hi");
        assert_eq!(new_rx.recv().await.unwrap(), b"hi", "newest handle wins");
    }
}
