use thiserror::Error;

use crate::connection::error::ConnectionError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// A handshake packet could not be handed to the connection
    #[error("Handshake packet could not be sent: {0}")]
    Connection(#[from] ConnectionError),
}
