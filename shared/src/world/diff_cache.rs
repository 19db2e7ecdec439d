use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use crate::packets::clientbound::ClientboundPacket;

/// Pre-built section diff packets for one chunk.
///
/// Shared between every connection that is sent the chunk. Building is a pure
/// function of the chunk's contents, so concurrent builders may each compute
/// the list; the first one to publish wins and the others adopt its result.
#[derive(Default)]
pub struct SectionDiffCache {
    packets: OnceCell<Arc<[ClientboundPacket]>>,
}

impl SectionDiffCache {
    pub fn new() -> Self {
        Self {
            packets: OnceCell::new(),
        }
    }

    /// The cached packet list, if one has been published
    pub fn get(&self) -> Option<Arc<[ClientboundPacket]>> {
        self.packets.get().cloned()
    }

    pub fn is_built(&self) -> bool {
        self.packets.get().is_some()
    }

    /// Publishes `packets` unless another builder got there first, and
    /// returns the list that is now cached
    pub fn publish(&self, packets: Vec<ClientboundPacket>) -> Arc<[ClientboundPacket]> {
        match self.packets.try_insert(packets.into()) {
            Ok(published) => published.clone(),
            Err((existing, _discarded)) => {
                debug!("SectionDiffCache: lost publish race, adopting existing diff");
                existing.clone()
            }
        }
    }

    /// Returns the cached list, building and publishing it first when absent
    pub fn get_or_build<F>(&self, build: F) -> Arc<[ClientboundPacket]>
    where
        F: FnOnce() -> Vec<ClientboundPacket>,
    {
        if let Some(packets) = self.get() {
            return packets;
        }
        self.publish(build())
    }

    /// Drops the cached list so the next access rebuilds it
    pub fn invalidate(&mut self) {
        self.packets.take();
    }
}
