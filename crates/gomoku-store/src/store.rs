//! The [`UserStore`] trait and the profile record it serves.

use gomoku_protocol::UserId;

use crate::StoreError;

/// Score every freshly registered account starts with.
pub const INITIAL_SCORE: i64 = 1000;

/// Points gained by a win and lost by a loss.
pub const SCORE_DELTA: i64 = 30;

/// A player's persistent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// The player's unique id, minted by the store at registration.
    pub uid: UserId,
    /// Display name, unique across the store.
    pub username: String,
    /// Matchmaking score. Signed: a long losing streak can go below zero.
    pub score: i64,
    /// Total games played.
    pub play_count: u32,
    /// Total games won.
    pub win_count: u32,
}

/// Persistent user storage, as seen by the coordination core.
///
/// Methods are synchronous and the trait is object-safe: the core holds an
/// `Arc<dyn UserStore>` and calls it from matchmaking workers and room
/// handlers. Implementations must answer quickly — a slow backend should
/// cache or queue internally rather than block callers.
///
/// Storage failures are surfaced as [`StoreError`] and propagated to the
/// operation that triggered the call (a failed lookup fails the match-add,
/// a failed credential check fails the login). The core never retries.
pub trait UserStore: Send + Sync + 'static {
    /// Fetches the profile for a uid.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no such user exists.
    fn lookup_by_uid(&self, uid: UserId) -> Result<UserProfile, StoreError>;

    /// Fetches the profile matching a username/password pair.
    ///
    /// # Errors
    /// [`StoreError::InvalidCredentials`] if the pair doesn't match any
    /// account.
    fn lookup_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, StoreError>;

    /// Registers a new account and returns its fresh profile.
    ///
    /// New accounts start at [`INITIAL_SCORE`] with zero plays and wins.
    ///
    /// # Errors
    /// [`StoreError::UsernameTaken`] if the name is already registered.
    fn create_user(&self, username: &str, password: &str)
        -> Result<UserProfile, StoreError>;

    /// Records a win: +[`SCORE_DELTA`] score, +1 play, +1 win.
    fn record_win(&self, uid: UserId) -> Result<(), StoreError>;

    /// Records a loss: -[`SCORE_DELTA`] score, +1 play.
    fn record_loss(&self, uid: UserId) -> Result<(), StoreError>;
}
