//! Error types for the session layer.

use gomoku_protocol::SessionId;

/// Errors that can occur during session checks.
///
/// Absence of a session is ordinary (it expired, or never existed) — these
/// errors exist so callers validating a client-supplied token can report a
/// precise reason, not because anything here is fatal.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given token.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session exists but its player never logged in.
    #[error("session {0} is not logged in")]
    NotLoggedIn(SessionId),
}
