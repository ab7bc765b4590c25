//! # Gomoku server
//!
//! The real-time coordination core of a two-player online gomoku game:
//! connection registries, skill-tiered matchmaking, game rooms with win
//! arbitration, and session lifetime with expiring timers.
//!
//! The layering, bottom to top:
//!
//! ```text
//! gomoku-protocol    wire messages and codecs
//! gomoku-transport   connection handles + timer primitive
//! gomoku-store       user profiles, scores, credentials (trait)
//! gomoku-session     session table + connection registry
//! gomoku-room        rooms, boards, win/forfeit logic
//! gomoku-lobby       tiered matchmaking workers
//! gomoku (this)      GameCore entry points + WebSocket edge
//! ```
//!
//! Embedders construct a [`GameCore`] directly and drive its lifecycle
//! entry points; the bundled [`Server`] does that wiring over WebSockets.

mod core;
mod error;
mod server;

pub use crate::core::{CoreConfig, GameCore};
pub use error::ServerError;
pub use server::{Server, ServerBuilder};
