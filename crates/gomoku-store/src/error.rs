//! Error types for the storage layer.

use gomoku_protocol::UserId;

/// Errors that can occur in the user store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No user exists with this id.
    #[error("user {0} not found")]
    NotFound(UserId),

    /// The username/password pair matched no account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The requested username is already registered.
    #[error("username '{0}' already taken")]
    UsernameTaken(String),

    /// The backing store could not be reached or answered garbage.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
