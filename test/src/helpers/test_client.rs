use smol::channel::Receiver;

use facade_server::ConnectionKey;
use facade_shared::{
    ClientboundPacket, CustomChannel, RegistryPagePacket, SectionUpdatePacket,
};

/// The receiving side of one connection, as a client would see it
pub struct TestClient {
    pub key: ConnectionKey,
    receiver: Receiver<ClientboundPacket>,
}

impl TestClient {
    pub fn new(key: ConnectionKey, receiver: Receiver<ClientboundPacket>) -> Self {
        Self { key, receiver }
    }

    /// Every packet enqueued since the last call
    pub fn drain(&self) -> Vec<ClientboundPacket> {
        std::iter::from_fn(|| self.receiver.try_recv().ok()).collect()
    }

    /// Whether the server closed the outbound channel
    pub fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }

    /// Drained packets that are custom payloads on `channel`
    pub fn drain_channel(&self, channel: CustomChannel) -> Vec<ClientboundPacket> {
        self.drain()
            .into_iter()
            .filter(|packet| {
                packet
                    .as_custom_payload()
                    .map_or(false, |payload| payload.is_on(channel))
            })
            .collect()
    }

    pub fn drain_registry_pages(&self) -> Vec<RegistryPagePacket> {
        self.drain()
            .iter()
            .filter_map(ClientboundPacket::as_custom_payload)
            .filter(|payload| {
                payload.is_on(CustomChannel::ContentRegistry)
                    || payload.is_on(CustomChannel::StateRegistry)
            })
            .map(|payload| RegistryPagePacket::from_payload(payload).expect("registry page"))
            .collect()
    }

    pub fn drain_section_updates(&self) -> Vec<SectionUpdatePacket> {
        self.drain()
            .iter()
            .filter_map(ClientboundPacket::as_custom_payload)
            .filter(|payload| payload.is_on(CustomChannel::SectionUpdate))
            .map(|payload| SectionUpdatePacket::from_payload(payload).expect("section update"))
            .collect()
    }
}
