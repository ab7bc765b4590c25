//! Skill-tiered matchmaking.
//!
//! Players waiting for a game sit in one of three FIFO queues — bronze,
//! silver, gold — bucketed by their score at enqueue time. Each queue is
//! drained by its own long-running worker task that pairs the two oldest
//! waiters, double-checks both are still reachable in the lobby, asks the
//! room manager for a room, and notifies both players.
//!
//! Pairing is FIFO by arrival but pairing *success* is only eventual: a
//! player requeued because their would-be opponent vanished goes to the
//! back of the queue and is paired on a later cycle.

mod error;
mod matcher;
mod queue;

pub use error::LobbyError;
pub use matcher::{Matcher, Tier, BRONZE_CEILING, SILVER_CEILING};
pub use queue::MatchQueue;
