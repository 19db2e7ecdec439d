use thiserror::Error;

use crate::Identifier;

/// Errors raised when turning a custom payload back into a typed packet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// The payload arrived on a channel other than the one the packet uses
    #[error("Expected payload on channel {expected}, got {actual}")]
    WrongChannel {
        expected: Identifier,
        actual: Identifier,
    },

    /// The payload bytes do not decode as the expected packet
    #[error("Malformed payload on channel {channel}")]
    Malformed { channel: Identifier },

    /// Decoding finished with payload bytes left over
    #[error("Payload on channel {channel} has {bytes} trailing bytes")]
    TrailingBytes { channel: Identifier, bytes: usize },
}
