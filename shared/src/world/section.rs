use std::collections::BTreeSet;

use crate::{
    content::{content_registry::StateId, identity_registry::IdentityRegistry},
    types::{LocalPos, SECTION_VOLUME},
};

/// One 16x16x16 section of a chunk, with the set of cells holding synthetic
/// states kept alongside the state array
#[derive(Clone)]
pub struct ChunkSection {
    y: i32,
    states: Box<[StateId]>,
    synthetic: BTreeSet<LocalPos>,
}

impl ChunkSection {
    /// Creates a section at section height `y` filled with `fill`
    pub fn new(y: i32, fill: StateId, registry: &IdentityRegistry) -> Self {
        let synthetic = if registry.is_synthetic(fill) {
            (0..=LocalPos::MAX).map(LocalPos::from_packed).collect()
        } else {
            BTreeSet::new()
        };

        Self {
            y,
            states: vec![fill; SECTION_VOLUME].into_boxed_slice(),
            synthetic,
        }
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn state(&self, local: LocalPos) -> StateId {
        self.states[local.index()]
    }

    /// Replaces the state at `local`, returning the previous one
    pub fn set_state(
        &mut self,
        local: LocalPos,
        state: StateId,
        registry: &IdentityRegistry,
    ) -> StateId {
        let previous = std::mem::replace(&mut self.states[local.index()], state);

        if registry.is_synthetic(state) {
            self.synthetic.insert(local);
        } else {
            self.synthetic.remove(&local);
        }

        previous
    }

    pub fn has_synthetic(&self) -> bool {
        !self.synthetic.is_empty()
    }

    pub fn synthetic_count(&self) -> usize {
        self.synthetic.len()
    }

    /// Cells holding synthetic states, in ascending packed order. The order
    /// is stable for an unchanged section.
    pub fn synthetic_positions(&self) -> impl Iterator<Item = LocalPos> + '_ {
        self.synthetic.iter().copied()
    }
}
