//! Codec trait and the JSON implementation.
//!
//! A codec converts between message types and raw bytes. The rest of the
//! server never calls `serde_json` directly — it goes through the [`Codec`]
//! trait, so the wire format can be swapped (e.g. to a binary codec) without
//! touching any handler code.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes messages to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because the codec is shared by every connection
/// task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// JSON keeps the wire human-readable — messages can be inspected in the
/// browser's dev tools — which is worth the size overhead for a turn-based
/// game. Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

// =========================================================================
// Tests
// =========================================================================
