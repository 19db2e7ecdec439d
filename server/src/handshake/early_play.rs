use facade_shared::BundleStatus;

use crate::{
    connection::connection::Connection,
    handshake::{error::HandshakeError, verified_peers::VerifiedPeers},
};

/// Outcome of feeding an event to an early-play handler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeProgress {
    /// Still waiting on the peer
    Pending,
    /// Continue with the normal join
    Finalized,
    /// The peer was disconnected
    Disconnected,
}

/// Handles a connection between identification and normal play.
///
/// Chosen per connection. Only that connection's inbound events drive it.
pub trait EarlyPlayHandler: Send {
    fn progress(&self) -> HandshakeProgress;

    fn on_status_event(
        &mut self,
        connection: &mut Connection,
        verified_peers: &dyn VerifiedPeers,
        status: BundleStatus,
    ) -> Result<HandshakeProgress, HandshakeError>;

    fn on_keepalive_reply(
        &mut self,
        connection: &mut Connection,
        parameter: i32,
    ) -> Result<HandshakeProgress, HandshakeError>;
}
