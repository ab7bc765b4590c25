//! `GameCore`: the coordination core behind the network edge.
//!
//! This is where the registries, the session table, the matchmaker, and the
//! room manager are wired together and exposed as lifecycle entry points.
//! The surrounding server (or an embedding test) calls these when a
//! connection opens, closes, or delivers a message; nothing in here knows
//! about sockets.

use std::sync::Arc;
use std::time::Duration;

use gomoku_lobby::Matcher;
use gomoku_protocol::{Codec, JsonCodec, Request, Response, SessionId, UserId};
use gomoku_room::RoomManager;
use gomoku_session::{ConnectionRegistry, Expiry, LoginState, Session, SessionManager};
use gomoku_store::{UserProfile, UserStore};
use gomoku_transport::Connection;

use crate::ServerError;

/// Tunables for the coordination core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// How long a session survives with no lobby or room connection.
    /// While the player occupies either context the session is pinned and
    /// this does not apply.
    pub session_ttl: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(30),
        }
    }
}

/// The assembled coordination core.
///
/// Owns every registry as an injected service object — there is no global
/// state. Construction spawns the matchmaking workers, so it must happen
/// inside a tokio runtime.
pub struct GameCore {
    registry: ConnectionRegistry,
    sessions: SessionManager,
    rooms: RoomManager,
    matcher: Matcher,
    store: Arc<dyn UserStore>,
    codec: JsonCodec,
    config: CoreConfig,
}

impl GameCore {
    /// Builds a core around the given store with default settings.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self::with_config(store, CoreConfig::default())
    }

    /// Builds a core around the given store.
    pub fn with_config(store: Arc<dyn UserStore>, config: CoreConfig) -> Self {
        let registry = ConnectionRegistry::new();
        let sessions = SessionManager::new();
        let rooms = RoomManager::new(registry.clone(), Arc::clone(&store));
        let matcher = Matcher::new(registry.clone(), rooms.clone(), Arc::clone(&store));

        Self {
            registry,
            sessions,
            rooms,
            matcher,
            store,
            codec: JsonCodec,
            config,
        }
    }

    /// The session table (used by the edge to validate hellos).
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// The room manager.
    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    // ---------------------------------------------------------------------
    // Account flows
    // ---------------------------------------------------------------------

    /// Registers a new account with the store.
    pub fn register(&self, username: &str, password: &str) -> Result<UserProfile, ServerError> {
        Ok(self.store.create_user(username, password)?)
    }

    /// Checks credentials against the store and opens a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ServerError> {
        let profile = self.store.lookup_by_credentials(username, password)?;
        Ok(self.on_login(profile.uid).await)
    }

    /// Opens a logged-in session for an already-authenticated player.
    ///
    /// The session starts on the idle clock; connecting to the lobby or a
    /// room pins it.
    pub async fn on_login(&self, uid: UserId) -> Session {
        let session = self.sessions.create_session(uid, LoginState::LoggedIn).await;
        self.sessions
            .set_expiry(session.sid, Expiry::After(self.config.session_ttl))
            .await;
        session
    }

    /// Activity on a session outside the lobby/room contexts: restart the
    /// idle clock.
    pub async fn on_session_touch(&self, sid: SessionId) {
        self.sessions
            .set_expiry(sid, Expiry::After(self.config.session_ttl))
            .await;
    }

    // ---------------------------------------------------------------------
    // Lobby lifecycle
    // ---------------------------------------------------------------------

    /// A player's lobby connection opened.
    pub async fn on_lobby_connect(&self, uid: UserId, conn: Arc<dyn Connection>) {
        self.registry.enter_lobby(uid, conn).await;
        self.pin_session(uid).await;
    }

    /// A player's lobby connection closed: drop them from the registry and
    /// from any matchmaking queue, and start the idle clock.
    pub async fn on_lobby_disconnect(&self, uid: UserId) {
        self.registry.exit_lobby(uid).await;
        self.matcher.remove(uid).await;
        self.unpin_session(uid).await;
    }

    /// A lobby message arrived. Replies go to the player's lobby
    /// connection; matchmaking success is delivered later by the tier
    /// workers.
    pub async fn on_lobby_message(&self, uid: UserId, req: &Request) {
        match req {
            Request::MatchStart => {
                if let Err(e) = self.matcher.add(uid).await {
                    tracing::warn!(%uid, error = %e, "match request failed");
                    self.reply_lobby(uid, &Response::error("matchmaking unavailable"))
                        .await;
                }
            }
            Request::MatchStop => {
                self.matcher.remove(uid).await;
                self.reply_lobby(uid, &Response::MatchStop { result: true })
                    .await;
            }
            other => {
                tracing::debug!(%uid, ?other, "unexpected lobby message");
                self.reply_lobby(uid, &Response::error("unknown request"))
                    .await;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Room lifecycle
    // ---------------------------------------------------------------------

    /// A player's room connection opened: register it and tell them who
    /// plays which color.
    pub async fn on_room_connect(&self, uid: UserId, conn: Arc<dyn Connection>) {
        self.registry.enter_room(uid, Arc::clone(&conn)).await;
        self.pin_session(uid).await;

        match self.rooms.room_by_uid(uid).await {
            Some(room) => {
                let room = room.lock().await;
                let ready = Response::RoomReady {
                    result: true,
                    room_id: room.rid(),
                    uid,
                    white_id: room.white_uid(),
                    black_id: room.black_uid(),
                };
                self.send_to(&conn, &ready);
            }
            None => {
                tracing::warn!(%uid, "room connection without a room");
                self.send_to(&conn, &Response::error("no room for player"));
            }
        }
    }

    /// A player's room connection closed: unregister it, run the room's
    /// exit handling (forfeit, destruction when empty), start the idle
    /// clock.
    pub async fn on_room_disconnect(&self, uid: UserId) {
        self.registry.exit_room(uid).await;
        self.rooms.remove_user(uid).await;
        self.unpin_session(uid).await;
    }

    /// A room message arrived: route it into the player's room.
    pub async fn on_room_message(&self, uid: UserId, req: &Request) {
        match self.rooms.room_by_uid(uid).await {
            Some(room) => {
                room.lock().await.handle_request(req).await;
            }
            None => {
                tracing::debug!(%uid, "room message from player without a room");
                self.reply_room(uid, &Response::error("no room for player"))
                    .await;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    async fn pin_session(&self, uid: UserId) {
        if let Some(sid) = self.sessions.sid_for_uid(uid).await {
            self.sessions.set_expiry(sid, Expiry::Forever).await;
        }
    }

    async fn unpin_session(&self, uid: UserId) {
        if let Some(sid) = self.sessions.sid_for_uid(uid).await {
            self.sessions
                .set_expiry(sid, Expiry::After(self.config.session_ttl))
                .await;
        }
    }

    async fn reply_lobby(&self, uid: UserId, resp: &Response) {
        if let Some(conn) = self.registry.conn_from_lobby(uid).await {
            self.send_to(&conn, resp);
        }
    }

    async fn reply_room(&self, uid: UserId, resp: &Response) {
        if let Some(conn) = self.registry.conn_from_room(uid).await {
            self.send_to(&conn, resp);
        }
    }

    fn send_to(&self, conn: &Arc<dyn Connection>, resp: &Response) {
        match self.codec.encode(resp) {
            Ok(payload) => conn.send(&payload),
            Err(e) => tracing::error!(error = %e, "failed to encode reply"),
        }
    }
}
