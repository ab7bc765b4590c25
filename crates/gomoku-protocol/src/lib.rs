//! Wire protocol for the gomoku coordination core.
//!
//! This crate defines the "language" spoken between the browser client and
//! the server:
//!
//! - **Identity types** ([`UserId`], [`SessionId`], [`RoomId`]) — opaque
//!   newtype ids that flow through every layer.
//! - **Messages** ([`Request`], [`Response`]) — the key/value records that
//!   travel on the wire, tagged by their `optype` field.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become bytes.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It knows nothing about
//! connections, sessions, or rooms — it only knows how messages look:
//!
//! ```text
//! Transport (bytes) → Protocol (Request/Response) → Lobby / Room handlers
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{Request, Response};
pub use types::{RoomId, SessionId, UserId};
