use thiserror::Error;

use crate::{
    connection::{connection::ConnectionKey, error::ConnectionError},
    handshake::error::HandshakeError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacadeServerError {
    #[error("No connection with key {key:?}")]
    UnknownConnection { key: ConnectionKey },

    /// Sync was requested for a connection still in the join handshake
    #[error("Connection {key:?} has not finished joining")]
    JoinPending { key: ConnectionKey },

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Handshake(#[from] HandshakeError),
}
