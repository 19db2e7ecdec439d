use log::warn;

use crate::content::{
    content_registry::{ContentRegistry, StateId},
    error::IdentityError,
    MAX_VISUAL_DEPTH,
};

/// Raw id reserved for "not synthetic, use the real representation"
pub const NO_RAW_ID: u32 = 0;

/// Maps synthetic states onto the bounded raw-id space sent to clients.
///
/// A synthetic state `s` maps to `s - offset + 1`; every other state maps to
/// the sentinel `0`. The mapping is a bijection on the synthetic subset, so
/// `state_from_raw_id(raw_id(s)) == Some(s)` for every synthetic `s`.
pub struct IdentityRegistry {
    content: ContentRegistry,
}

impl IdentityRegistry {
    pub fn new(content: ContentRegistry) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    pub fn is_synthetic(&self, state: StateId) -> bool {
        self.content.is_synthetic(state)
    }

    /// Largest raw id `raw_id` can produce
    pub fn max_raw_id(&self) -> u32 {
        self.content.synthetic_states().len() as u32
    }

    /// Raw id sent on the wire for `state`, `0` when it is not synthetic
    pub fn raw_id(&self, state: StateId) -> u32 {
        if self.content.is_synthetic(state) {
            state.0 - self.content.offset() + 1
        } else {
            NO_RAW_ID
        }
    }

    /// Resolves a raw id back to its synthetic state. `0` yields `None`: the
    /// cell holds a real state that needs no translation.
    ///
    /// # Panics
    ///
    /// Panics if `raw_id` was not produced by `raw_id`. Raw ids only ever
    /// originate in this registry, so a miss is a programming error.
    pub fn state_from_raw_id(&self, raw_id: u32) -> Option<StateId> {
        match self.try_state_from_raw_id(raw_id) {
            Ok(state) => state,
            Err(error) => panic!("IdentityRegistry: {}", error),
        }
    }

    /// Non-panicking form of `state_from_raw_id`
    pub fn try_state_from_raw_id(&self, raw_id: u32) -> Result<Option<StateId>, IdentityError> {
        if raw_id == NO_RAW_ID {
            return Ok(None);
        }

        let max_raw_id = self.max_raw_id();
        if raw_id > max_raw_id {
            return Err(IdentityError::RawIdOutOfRange { raw_id, max_raw_id });
        }

        Ok(Some(StateId(raw_id + self.content.offset() - 1)))
    }

    /// The built-in state a client without the asset bundle should render for
    /// `state`. Fallback chains through other synthetic states are followed
    /// up to `MAX_VISUAL_DEPTH` hops; a chain that never reaches a built-in
    /// state, or an unknown state, resolves to the registry's error state.
    pub fn safe_visual_state(&self, state: StateId) -> StateId {
        let mut current = state;

        for _ in 0..MAX_VISUAL_DEPTH {
            let Some(entry) = self.content.state(current) else {
                break;
            };
            if !self.content.is_synthetic(current) {
                return current;
            }
            match entry.visual() {
                Some(visual) => current = visual,
                None => break,
            }
        }

        warn!(
            "IdentityRegistry: state {:?} has no built-in visual within {} hops, using error state",
            state, MAX_VISUAL_DEPTH
        );
        self.content.error_state()
    }
}
