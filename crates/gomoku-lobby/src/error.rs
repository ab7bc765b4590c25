//! Error types for the matchmaking layer.

use gomoku_store::StoreError;

/// Errors that can occur while managing the matchmaking queues.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The score lookup needed to pick a tier failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
