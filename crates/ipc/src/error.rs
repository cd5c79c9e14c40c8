//! Error types for the command/notification bridge.

/// Errors raised while encoding, decoding, or interpreting bridge messages.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to (de)serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Invalid color {0:?}: expected #rgb or #rrggbb")]
    InvalidColor(String),
}
