//! Session lifetime and connection presence.
//!
//! Two registries live here, both keyed by player identity:
//!
//! - [`SessionManager`] — maps a session token to who the player is and
//!   whether they are logged in, and owns the per-session expiry timer.
//!   A session is "pinned" ([`Expiry::Forever`]) while its player occupies
//!   the lobby or a room, and reverts to a finite idle timeout otherwise.
//! - [`ConnectionRegistry`] — maps a player to their currently-active
//!   connection handle, separately for the lobby and the room context.
//!   This is how the matchmaker and rooms detect disconnects.
//!
//! # The expiry race
//!
//! Re-arming or pinning a session whose timer is already scheduled is the
//! delicate part: cancelling a timer does not guarantee an already-in-flight
//! callback is suppressed. See [`SessionManager::set_expiry`] for the
//! cancel / clear / deferred-re-insert protocol that makes the worst case a
//! transient removal which is immediately corrected, instead of a lost or
//! duplicated session.

mod error;
mod manager;
mod registry;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use registry::ConnectionRegistry;
pub use session::{Expiry, LoginState, Session};
