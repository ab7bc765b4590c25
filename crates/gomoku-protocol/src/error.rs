//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or wrong
    /// data types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates a protocol rule (e.g. an id of 0
    /// where a real id is required).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
