//! Unified error type for the server crate.

use gomoku_lobby::LobbyError;
use gomoku_protocol::ProtocolError;
use gomoku_room::RoomError;
use gomoku_session::SessionError;
use gomoku_store::StoreError;
use gomoku_transport::TransportError;

/// Top-level error that wraps every layer's error.
///
/// The `#[from]` attributes let `?` convert layer errors automatically, so
/// callers embedding the server deal with one type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (unknown or logged-out session).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A storage-level error (lookup, credentials, registration).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A matchmaking error.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A room pairing error.
    #[error(transparent)]
    Room(#[from] RoomError),
}
