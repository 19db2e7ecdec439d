use thiserror::Error;

use crate::connection::connection::ConnectionKey;

/// Errors raised when handing packets to a connection's outbound channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The outbound channel's receiving side has gone away
    #[error("Outbound channel of connection {key:?} is closed")]
    ChannelClosed { key: ConnectionKey },

    /// The connection was disconnected and accepts no further packets
    #[error("Connection {key:?} has already been disconnected")]
    Disconnected { key: ConnectionKey },
}
