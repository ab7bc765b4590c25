//! Error types for the room layer.

use gomoku_protocol::UserId;

/// Errors that can occur while pairing players into a room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The player left the lobby between matching and room creation.
    #[error("player {0} is not in the lobby")]
    NotInLobby(UserId),

    /// Both sides of the pair are the same player.
    #[error("player {0} cannot be paired with themself")]
    DuplicatePlayer(UserId),
}
