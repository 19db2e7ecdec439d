use crate::{
    content::{content_registry::StateId, identity_registry::IdentityRegistry},
    types::{CellPos, SectionPos},
    world::{diff_cache::SectionDiffCache, section::ChunkSection},
};

/// Column position of a chunk, in chunk coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// A vertical column of sections. Owns the diff cache of its synthetic cells,
/// which is reset on every mutation made through this type.
pub struct Chunk {
    pos: ChunkPos,
    min_section_y: i32,
    sections: Vec<ChunkSection>,
    diff_cache: SectionDiffCache,
}

impl Chunk {
    /// Creates a chunk of `section_count` sections starting at section height
    /// `min_section_y`, every cell holding `fill`
    pub fn new(
        pos: ChunkPos,
        min_section_y: i32,
        section_count: usize,
        fill: StateId,
        registry: &IdentityRegistry,
    ) -> Self {
        let sections = (0..section_count)
            .map(|index| ChunkSection::new(min_section_y + index as i32, fill, registry))
            .collect();

        Self {
            pos,
            min_section_y,
            sections,
            diff_cache: SectionDiffCache::new(),
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn sections(&self) -> &[ChunkSection] {
        &self.sections
    }

    pub fn section_pos(&self, section: &ChunkSection) -> SectionPos {
        SectionPos::new(self.pos.x, section.y(), self.pos.z)
    }

    pub fn diff_cache(&self) -> &SectionDiffCache {
        &self.diff_cache
    }

    pub fn has_synthetic(&self) -> bool {
        self.sections.iter().any(ChunkSection::has_synthetic)
    }

    fn section_index(&self, pos: &CellPos) -> Option<usize> {
        let section = pos.section();
        if section.x != self.pos.x || section.z != self.pos.z {
            return None;
        }
        let index = section.y - self.min_section_y;
        if index < 0 || index as usize >= self.sections.len() {
            return None;
        }
        Some(index as usize)
    }

    /// State at `pos`, or `None` when the position lies outside this chunk
    pub fn state(&self, pos: &CellPos) -> Option<StateId> {
        let index = self.section_index(pos)?;
        Some(self.sections[index].state(pos.local()))
    }

    /// Replaces the state at `pos` and invalidates the diff cache. Returns the
    /// previous state, or `None` when the position lies outside this chunk.
    pub fn set_state(
        &mut self,
        pos: &CellPos,
        state: StateId,
        registry: &IdentityRegistry,
    ) -> Option<StateId> {
        let index = self.section_index(pos)?;
        let previous = self.sections[index].set_state(pos.local(), state, registry);
        self.diff_cache.invalidate();
        Some(previous)
    }
}
