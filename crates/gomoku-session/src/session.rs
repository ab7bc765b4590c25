//! Session types.

use std::time::Duration;

use gomoku_protocol::{SessionId, UserId};

/// Whether the session's player has authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    LoggedOut,
    LoggedIn,
}

/// A player's session, as handed out by the [`SessionManager`].
///
/// This is a snapshot value: the expiry timer stays inside the manager,
/// so copies of a `Session` can travel freely without extending or
/// shortening anything's lifetime.
///
/// [`SessionManager`]: crate::SessionManager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The session's unique, monotonically assigned token.
    pub sid: SessionId,
    /// The player this session belongs to.
    pub uid: UserId,
    /// Login state at creation (or as last updated).
    pub login: LoginState,
}

impl Session {
    /// Returns `true` if the player behind this session is logged in.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.login, LoginState::LoggedIn)
    }
}

/// How long a session should live from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Never auto-expire. Used while the player occupies the lobby or an
    /// active room.
    Forever,
    /// Auto-expire after the given idle duration.
    After(Duration),
}
