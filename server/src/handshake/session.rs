/// Where a joining peer stands in the asset bundle handshake
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakePhase {
    /// Placeholder scene being sent
    Placeholder,
    /// Bundle pushed, waiting for the peer's status report
    AwaitingStatus,
    /// Keepalive `0` sent, waiting for the peer to echo it
    AwaitingAck,
    /// Handed off to normal join
    Finalized,
    /// The peer was disconnected
    Disconnected,
}

impl HandshakePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandshakePhase::Finalized | HandshakePhase::Disconnected)
    }
}

/// Per-peer handshake record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeSession {
    /// Whether declining the bundle ends the connection
    pub required: bool,
    /// The peer reported it accepted the bundle
    pub accepted: bool,
    /// The peer reported it loaded the bundle
    pub loaded: bool,
    pub phase: HandshakePhase,
}

impl HandshakeSession {
    pub fn new(required: bool) -> Self {
        Self {
            required,
            accepted: false,
            loaded: false,
            phase: HandshakePhase::Placeholder,
        }
    }
}
