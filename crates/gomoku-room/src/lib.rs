//! Game rooms for the gomoku server.
//!
//! A [`Room`] owns one two-player game: the board, the win/forfeit logic,
//! and the broadcast of every outcome to both players. The [`RoomManager`]
//! owns all rooms in an arena keyed by room id, plus a uid → rid
//! back-reference, and is the single place rooms are created and destroyed.
//!
//! # Ownership
//!
//! The rid index owns its rooms (`Arc<Mutex<Room>>`); the uid index stores
//! only rids. In-flight handlers hold a cloned `Arc` while they work, so
//! destroying a room never invalidates a handler mid-request — the room
//! simply becomes unreachable for the next lookup.

mod board;
mod error;
mod manager;
mod room;

pub use board::{Board, Cell, BOARD_COLS, BOARD_ROWS, WIN_LENGTH};
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{Room, RoomStatus};
