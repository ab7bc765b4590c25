//! User storage interface for the gomoku server.
//!
//! The coordination core treats persistent user data as an external
//! collaborator: everything it needs is behind the [`UserStore`] trait —
//! profile lookups for matchmaking tiers, credential checks for login, and
//! win/loss updates when a game ends.
//!
//! [`MemoryStore`] is the in-process reference implementation, used by the
//! bundled server binary and by tests. A deployment that wants durable
//! accounts implements [`UserStore`] against its own database and hands the
//! core an `Arc` of it; nothing above this crate changes.

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{UserProfile, UserStore, INITIAL_SCORE, SCORE_DELTA};
