use std::{collections::HashSet, sync::RwLock};

use facade_shared::PeerId;

/// Remembers which peers have confirmed the asset bundle. Peers found here
/// skip the placeholder scene on their next join.
pub trait VerifiedPeers: Send + Sync {
    fn is_verified(&self, peer: &PeerId) -> bool;

    fn set_verified(&self, peer: &PeerId, verified: bool);
}

/// Process-local `VerifiedPeers`, forgotten on restart
#[derive(Default)]
pub struct InMemoryVerifiedPeers {
    peers: RwLock<HashSet<PeerId>>,
}

impl InMemoryVerifiedPeers {
    pub fn new() -> Self {
        Self {
            peers: RwLock::new(HashSet::new()),
        }
    }
}

impl VerifiedPeers for InMemoryVerifiedPeers {
    fn is_verified(&self, peer: &PeerId) -> bool {
        match self.peers.read() {
            Ok(peers) => peers.contains(peer),
            Err(poisoned) => poisoned.into_inner().contains(peer),
        }
    }

    fn set_verified(&self, peer: &PeerId, verified: bool) {
        let mut peers = match self.peers.write() {
            Ok(peers) => peers,
            Err(poisoned) => poisoned.into_inner(),
        };
        if verified {
            peers.insert(*peer);
        } else {
            peers.remove(peer);
        }
    }
}
