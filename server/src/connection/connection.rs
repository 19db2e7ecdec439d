use log::{info, warn};
use smol::channel::{Sender, TrySendError};

use facade_shared::{ClientboundPacket, PeerId, Text};

use crate::connection::{
    capability_gate::CapabilityGate,
    error::ConnectionError,
    interceptor::{InterceptContext, InterceptorChain, PacketInterceptor},
};

// ConnectionKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct ConnectionKey(u64);

impl ConnectionKey {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

// Connection

/// One peer's connection: its outbound channel, the interceptors on its send
/// path and its capability gate.
pub struct Connection {
    key: ConnectionKey,
    peer: PeerId,
    gate: CapabilityGate,
    sender: Sender<ClientboundPacket>,
    interceptors: InterceptorChain,
    disconnected: bool,
}

impl Connection {
    pub fn new(key: ConnectionKey, peer: PeerId, sender: Sender<ClientboundPacket>) -> Self {
        Self {
            key,
            peer,
            gate: CapabilityGate::new(),
            sender,
            interceptors: InterceptorChain::new(),
            disconnected: false,
        }
    }

    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    /// Whether virtualization packets may be sent to this peer
    pub fn is_capable(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Opens the capability gate. Returns whether this call changed it.
    pub fn enable_capability(&mut self) -> bool {
        let changed = self.gate.enable();
        if changed {
            info!("Connection {:?}: capability gate opened", self.key);
        }
        changed
    }

    pub fn add_interceptor(&mut self, interceptor: Box<dyn PacketInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Runs `packet` through the interceptor chain and enqueues the result
    pub fn send(&self, packet: ClientboundPacket) -> Result<(), ConnectionError> {
        let context = InterceptContext {
            key: self.key,
            capable: self.is_capable(),
        };
        for outgoing in self.interceptors.dispatch(packet, &context) {
            self.enqueue(outgoing)?;
        }
        Ok(())
    }

    /// Enqueues `packet` as is, skipping the interceptor chain
    pub fn send_direct(&self, packet: ClientboundPacket) -> Result<(), ConnectionError> {
        self.enqueue(packet)
    }

    /// Sends a disconnect with `reason` and closes the outbound channel.
    /// Later sends fail with `ConnectionError::Disconnected`.
    pub fn disconnect(&mut self, reason: Text) -> Result<(), ConnectionError> {
        if self.disconnected {
            return Err(ConnectionError::Disconnected { key: self.key });
        }
        info!("Connection {:?}: disconnecting ({:?})", self.key, reason);

        let result = self.enqueue(ClientboundPacket::Disconnect { reason });
        self.disconnected = true;
        self.sender.close();
        result
    }

    fn enqueue(&self, packet: ClientboundPacket) -> Result<(), ConnectionError> {
        if self.disconnected {
            return Err(ConnectionError::Disconnected { key: self.key });
        }
        match self.sender.try_send(packet) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) | Err(TrySendError::Full(_)) => {
                warn!("Connection {:?}: outbound channel closed", self.key);
                Err(ConnectionError::ChannelClosed { key: self.key })
            }
        }
    }
}
