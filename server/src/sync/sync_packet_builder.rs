use std::sync::Arc;

use log::{debug, info};

use facade_shared::{
    CellPos, CellUpdatePacket, Chunk, ClientboundPacket, IdentityRegistry, LocalPos, PackedCell,
    RegistryEntry, RegistryKind, RegistryPagePacket, SectionDiffCache, SectionPos,
    SectionUpdatePacket, StateId, SyncPacket,
};

use crate::{
    connection::{connection::Connection, error::ConnectionError},
    server::server_config::SyncConfig,
};

/// Most registry entries a single page may carry
pub const REGISTRY_PAGE_SIZE: usize = 61;

/// Encodes and sends the virtualization packets.
///
/// Every sending operation first checks the target connection's capability
/// gate and returns `Ok(false)` / `Ok(0)` without sending anything when it is
/// closed.
pub struct SyncPacketBuilder {
    registry: Arc<IdentityRegistry>,
    page_size: usize,
}

impl SyncPacketBuilder {
    pub fn new(registry: Arc<IdentityRegistry>, config: &SyncConfig) -> Self {
        Self {
            registry,
            page_size: config.page_size.clamp(1, REGISTRY_PAGE_SIZE),
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Entries per registry page, never above `REGISTRY_PAGE_SIZE`
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // Cells

    /// Sends the virtual state of one cell. Returns whether a packet was sent.
    pub fn single_cell_update(
        &self,
        connection: &Connection,
        pos: CellPos,
        state: StateId,
    ) -> Result<bool, ConnectionError> {
        if !connection.is_capable() {
            return Ok(false);
        }

        let packet = CellUpdatePacket {
            pos,
            raw_id: self.registry.raw_id(state),
        };
        connection.send_direct(packet.to_payload().into())?;
        Ok(true)
    }

    /// Sends the virtual states of several cells of one section in a single
    /// packet. Returns whether a packet was sent.
    ///
    /// # Panics
    ///
    /// Panics if `positions` and `states` differ in length.
    pub fn multi_cell_update(
        &self,
        connection: &Connection,
        section: SectionPos,
        positions: &[LocalPos],
        states: &[StateId],
    ) -> Result<bool, ConnectionError> {
        assert_eq!(
            positions.len(),
            states.len(),
            "multi_cell_update: every position needs exactly one state"
        );
        if !connection.is_capable() {
            return Ok(false);
        }

        let packet = self.section_update(section, positions, states);
        connection.send_direct(packet.to_payload().into())?;
        Ok(true)
    }

    /// Builds the section update for `positions`/`states` without sending it
    ///
    /// # Panics
    ///
    /// Panics if `positions` and `states` differ in length.
    pub fn section_update(
        &self,
        section: SectionPos,
        positions: &[LocalPos],
        states: &[StateId],
    ) -> SectionUpdatePacket {
        assert_eq!(positions.len(), states.len());
        let cells = positions
            .iter()
            .zip(states.iter())
            .map(|(local, state)| PackedCell::new(self.registry.raw_id(*state), *local))
            .collect();
        SectionUpdatePacket { section, cells }
    }

    // Chunks

    /// Sends the section diff of `chunk`: one section update per section that
    /// holds a synthetic cell. With a cache, a previously built list is
    /// replayed verbatim and a fresh one is published into it. Returns the
    /// number of packets sent.
    pub fn chunk_diff_packets(
        &self,
        connection: &Connection,
        cache: Option<&SectionDiffCache>,
        chunk: &Chunk,
    ) -> Result<usize, ConnectionError> {
        if !connection.is_capable() {
            return Ok(0);
        }

        let packets: Arc<[ClientboundPacket]> = match cache {
            Some(cache) => cache.get_or_build(|| self.build_chunk_diff(chunk)),
            None => self.build_chunk_diff(chunk).into(),
        };
        for packet in packets.iter() {
            connection.send_direct(packet.clone())?;
        }
        Ok(packets.len())
    }

    /// Section updates for every section of `chunk` holding synthetic cells,
    /// bottom section first
    pub fn build_chunk_diff(&self, chunk: &Chunk) -> Vec<ClientboundPacket> {
        let packets: Vec<ClientboundPacket> = chunk
            .sections()
            .iter()
            .filter(|section| section.has_synthetic())
            .map(|section| {
                let cells = section
                    .synthetic_positions()
                    .map(|local| PackedCell::new(self.registry.raw_id(section.state(local)), local))
                    .collect();
                let packet = SectionUpdatePacket {
                    section: chunk.section_pos(section),
                    cells,
                };
                ClientboundPacket::from(packet.to_payload())
            })
            .collect();

        debug!(
            "SyncPacketBuilder: built {} section packets for chunk {:?}",
            packets.len(),
            chunk.pos()
        );
        packets
    }

    // Registries

    /// Sends every synthetic content entry, then every synthetic state, in
    /// pages. Returns the number of pages sent.
    pub fn sync_all_registries(&self, connection: &Connection) -> Result<usize, ConnectionError> {
        if !connection.is_capable() {
            return Ok(0);
        }

        let mut sent = 0;
        for kind in [RegistryKind::Content, RegistryKind::State] {
            let pages = self.registry_pages(kind);
            for page in pages.iter() {
                connection.send_direct(page.to_payload().into())?;
            }
            info!(
                "SyncPacketBuilder: sent {} {:?} registry pages to {:?}",
                pages.len(),
                kind,
                connection.key()
            );
            sent += pages.len();
        }
        Ok(sent)
    }

    /// Synthetic records of one registry, in registration order
    pub fn registry_entries(&self, kind: RegistryKind) -> Vec<RegistryEntry> {
        let content = self.registry.content();
        match kind {
            RegistryKind::Content => content
                .contents()
                .filter(|entry| entry.is_synthetic())
                .map(|entry| RegistryEntry {
                    identifier: entry.identifier().clone(),
                    raw_index: entry.kind().0,
                    label: entry.label().to_string(),
                    visual_raw_id: self.registry.safe_visual_state(entry.default_state()).0,
                })
                .collect(),
            RegistryKind::State => content
                .synthetic_states()
                .iter()
                .filter_map(|state| {
                    let owner = content.content(state.kind())?;
                    Some(RegistryEntry {
                        identifier: owner.identifier().clone(),
                        raw_index: self.registry.raw_id(state.id()),
                        label: state.properties().to_string(),
                        visual_raw_id: self.registry.safe_visual_state(state.id()).0,
                    })
                })
                .collect(),
        }
    }

    /// The records of one registry split into pages. A page is flushed as
    /// soon as it holds `page_size` entries, and a non-empty remainder is
    /// flushed at the end, so no page is empty.
    pub fn registry_pages(&self, kind: RegistryKind) -> Vec<RegistryPagePacket> {
        paginate(self.registry_entries(kind), self.page_size)
            .into_iter()
            .map(|entries| RegistryPagePacket { kind, entries })
            .collect()
    }
}

fn paginate<T>(entries: Vec<T>, page_size: usize) -> Vec<Vec<T>> {
    let mut pages = Vec::new();
    let mut page = Vec::with_capacity(page_size);
    for entry in entries {
        page.push(entry);
        if page.len() >= page_size {
            pages.push(std::mem::replace(&mut page, Vec::with_capacity(page_size)));
        }
    }
    if !page.is_empty() {
        pages.push(page);
    }
    pages
}
