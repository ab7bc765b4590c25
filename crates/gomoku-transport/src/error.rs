//! Error types for the transport layer.

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
