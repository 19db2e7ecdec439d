/// Whether a peer may receive virtualization packets.
///
/// Starts closed and can only ever be opened, once the peer has been proven
/// (or assumed) to have the asset bundle installed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityGate {
    enabled: bool,
}

impl CapabilityGate {
    pub fn new() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Opens the gate. Returns whether this call changed it.
    pub fn enable(&mut self) -> bool {
        let changed = !self.enabled;
        self.enabled = true;
        changed
    }
}
