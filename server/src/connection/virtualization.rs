use std::sync::Arc;

use facade_shared::{
    CellUpdatePacket, ClientboundPacket, IdentityRegistry, NativeCell, PackedCell,
    SectionUpdatePacket, SyncPacket,
};

use crate::connection::interceptor::{InterceptContext, Interception, PacketInterceptor};

/// Rewrites native cell updates so that they only ever name built-in states.
///
/// Synthetic states are replaced with their safe visual state. When the peer
/// is capable, the matching virtualization packet follows the native one so
/// the client can swap in the real content.
pub struct VirtualizationInterceptor {
    registry: Arc<IdentityRegistry>,
}

impl VirtualizationInterceptor {
    pub fn new(registry: Arc<IdentityRegistry>) -> Self {
        Self { registry }
    }
}

impl PacketInterceptor for VirtualizationInterceptor {
    fn intercept(&self, packet: &ClientboundPacket, context: &InterceptContext) -> Interception {
        match packet {
            ClientboundPacket::CellUpdate { pos, state } => {
                if !self.registry.is_synthetic(*state) {
                    return Interception::Forward;
                }

                let mut packets = vec![ClientboundPacket::CellUpdate {
                    pos: *pos,
                    state: self.registry.safe_visual_state(*state),
                }];
                if context.capable {
                    let virtual_packet = CellUpdatePacket {
                        pos: *pos,
                        raw_id: self.registry.raw_id(*state),
                    };
                    packets.push(virtual_packet.to_payload().into());
                }
                Interception::Replace(packets)
            }
            ClientboundPacket::SectionCellsUpdate { section, cells } => {
                let synthetic: Vec<PackedCell> = cells
                    .iter()
                    .filter(|cell| self.registry.is_synthetic(cell.state))
                    .map(|cell| PackedCell::new(self.registry.raw_id(cell.state), cell.local))
                    .collect();
                if synthetic.is_empty() {
                    return Interception::Forward;
                }

                let visual_cells = cells
                    .iter()
                    .map(|cell| NativeCell {
                        local: cell.local,
                        state: self.registry.safe_visual_state(cell.state),
                    })
                    .collect();
                let mut packets = vec![ClientboundPacket::SectionCellsUpdate {
                    section: *section,
                    cells: visual_cells,
                }];
                if context.capable {
                    let virtual_packet = SectionUpdatePacket {
                        section: *section,
                        cells: synthetic,
                    };
                    packets.push(virtual_packet.to_payload().into());
                }
                Interception::Replace(packets)
            }
            _ => Interception::Forward,
        }
    }
}
