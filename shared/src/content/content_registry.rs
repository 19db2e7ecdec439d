use std::collections::HashMap;

use facade_serde::{BitReader, BitWrite, Serde, SerdeErr, VarInt};
use log::info;

use crate::{
    content::{error::ContentError, DEFAULT_SYNTHETIC_STATE_OFFSET},
    Identifier,
};

/// Numeric id of a state in the server's state table. Built-in states occupy
/// `0..builtin_count`, synthetic states start at the registry offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl Serde for StateId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        VarInt::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(VarInt::de(reader)?.try_to()?))
    }

    fn bit_length(&self) -> u32 {
        VarInt::new(self.0).bit_length()
    }
}

/// Raw index of a content type in the content registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKind(pub u32);

// ContentEntry

#[derive(Debug, Clone)]
pub struct ContentEntry {
    identifier: Identifier,
    kind: ContentKind,
    label: String,
    synthetic: bool,
    states: Vec<StateId>,
}

impl ContentEntry {
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn default_state(&self) -> StateId {
        self.states[0]
    }
}

// StateEntry

#[derive(Debug, Clone)]
pub struct StateEntry {
    id: StateId,
    kind: ContentKind,
    properties: String,
    visual: Option<StateId>,
}

impl StateEntry {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Property description such as `facing=north`, empty for single-state content
    pub fn properties(&self) -> &str {
        &self.properties
    }

    /// The state a client without the asset bundle renders in place of this
    /// one. Only synthetic states carry one.
    pub fn visual(&self) -> Option<StateId> {
        self.visual
    }
}

/// A synthetic state declaration: its properties and the state it falls back to
#[derive(Debug, Clone)]
pub struct SyntheticState {
    pub properties: String,
    pub visual: StateId,
}

impl SyntheticState {
    pub fn new(properties: &str, visual: StateId) -> Self {
        Self {
            properties: properties.to_string(),
            visual,
        }
    }
}

/// Handle returned for each registered content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredContent {
    pub kind: ContentKind,
    pub states: Vec<StateId>,
}

impl RegisteredContent {
    pub fn default_state(&self) -> StateId {
        self.states[0]
    }
}

// ContentRegistryBuilder

/// Collects built-in and synthetic content at bootstrap. Once built the
/// registry is immutable.
pub struct ContentRegistryBuilder {
    offset: u32,
    error_state: StateId,
    contents: Vec<ContentEntry>,
    builtin_states: Vec<StateEntry>,
    synthetic_states: Vec<StateEntry>,
    by_identifier: HashMap<Identifier, ContentKind>,
}

impl ContentRegistryBuilder {
    pub fn new() -> Self {
        Self::with_offset(DEFAULT_SYNTHETIC_STATE_OFFSET)
    }

    pub fn with_offset(offset: u32) -> Self {
        Self {
            offset,
            error_state: StateId(0),
            contents: Vec::new(),
            builtin_states: Vec::new(),
            synthetic_states: Vec::new(),
            by_identifier: HashMap::new(),
        }
    }

    /// Built-in state used when a visual fallback chain never reaches a
    /// built-in state
    pub fn error_state(&mut self, state: StateId) -> &mut Self {
        self.error_state = state;
        self
    }

    pub fn add_builtin(
        &mut self,
        identifier: Identifier,
        label: &str,
        properties: &[&str],
    ) -> Result<RegisteredContent, ContentError> {
        let kind = self.claim_kind(&identifier, properties.is_empty())?;

        let mut states = Vec::with_capacity(properties.len());
        for property in properties {
            let id = StateId(self.builtin_states.len() as u32);
            self.builtin_states.push(StateEntry {
                id,
                kind,
                properties: property.to_string(),
                visual: None,
            });
            states.push(id);
        }

        Ok(self.push_content(identifier, kind, label, false, states))
    }

    pub fn add_synthetic(
        &mut self,
        identifier: Identifier,
        label: &str,
        states: Vec<SyntheticState>,
    ) -> Result<RegisteredContent, ContentError> {
        let kind = self.claim_kind(&identifier, states.is_empty())?;

        // the whole range must fit before any state is recorded
        let first = self.synthetic_states.len() as u32;
        let total = first.saturating_add(states.len() as u32);
        if self.offset.checked_add(total - 1).is_none() {
            return Err(ContentError::TooManySyntheticStates {
                synthetic_states: total,
                offset: self.offset,
            });
        }

        let mut ids = Vec::with_capacity(states.len());
        for (index, state) in (first..).zip(states) {
            let id = StateId(self.offset + index);
            self.synthetic_states.push(StateEntry {
                id,
                kind,
                properties: state.properties,
                visual: Some(state.visual),
            });
            ids.push(id);
        }

        Ok(self.push_content(identifier, kind, label, true, ids))
    }

    pub fn build(self) -> Result<ContentRegistry, ContentError> {
        let builtin_count = self.builtin_states.len() as u32;
        if builtin_count > self.offset {
            return Err(ContentError::OffsetTooSmall {
                builtin_states: builtin_count,
                offset: self.offset,
            });
        }

        if self.error_state.0 >= builtin_count {
            return Err(ContentError::InvalidErrorState {
                state: self.error_state.0,
            });
        }

        let registry = ContentRegistry {
            offset: self.offset,
            error_state: self.error_state,
            contents: self.contents,
            builtin_states: self.builtin_states,
            synthetic_states: self.synthetic_states,
            by_identifier: self.by_identifier,
        };

        for state in registry.synthetic_states.iter() {
            let Some(visual) = state.visual else {
                continue;
            };
            if registry.state(visual).is_none() {
                return Err(ContentError::UnknownVisual {
                    identifier: registry.contents[state.kind.0 as usize].identifier.clone(),
                    state: visual.0,
                });
            }
        }

        info!(
            "ContentRegistry: {} content types, {} built-in states, {} synthetic states",
            registry.contents.len(),
            registry.builtin_states.len(),
            registry.synthetic_states.len()
        );

        Ok(registry)
    }

    fn claim_kind(
        &self,
        identifier: &Identifier,
        no_states: bool,
    ) -> Result<ContentKind, ContentError> {
        if self.by_identifier.contains_key(identifier) {
            return Err(ContentError::DuplicateIdentifier {
                identifier: identifier.clone(),
            });
        }
        if no_states {
            return Err(ContentError::NoStates {
                identifier: identifier.clone(),
            });
        }
        Ok(ContentKind(self.contents.len() as u32))
    }

    fn push_content(
        &mut self,
        identifier: Identifier,
        kind: ContentKind,
        label: &str,
        synthetic: bool,
        states: Vec<StateId>,
    ) -> RegisteredContent {
        self.by_identifier.insert(identifier.clone(), kind);
        self.contents.push(ContentEntry {
            identifier,
            kind,
            label: label.to_string(),
            synthetic,
            states: states.clone(),
        });
        RegisteredContent { kind, states }
    }
}

impl Default for ContentRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ContentRegistry

/// The content-type registry together with the global state table
pub struct ContentRegistry {
    offset: u32,
    error_state: StateId,
    contents: Vec<ContentEntry>,
    builtin_states: Vec<StateEntry>,
    synthetic_states: Vec<StateEntry>,
    by_identifier: HashMap<Identifier, ContentKind>,
}

impl ContentRegistry {
    pub fn builder() -> ContentRegistryBuilder {
        ContentRegistryBuilder::new()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn error_state(&self) -> StateId {
        self.error_state
    }

    pub fn content(&self, kind: ContentKind) -> Option<&ContentEntry> {
        self.contents.get(kind.0 as usize)
    }

    pub fn content_by_identifier(&self, identifier: &Identifier) -> Option<&ContentEntry> {
        self.by_identifier
            .get(identifier)
            .and_then(|kind| self.content(*kind))
    }

    /// Content types in raw index order
    pub fn contents(&self) -> impl Iterator<Item = &ContentEntry> {
        self.contents.iter()
    }

    pub fn state(&self, id: StateId) -> Option<&StateEntry> {
        if id.0 >= self.offset {
            self.synthetic_states.get((id.0 - self.offset) as usize)
        } else {
            self.builtin_states.get(id.0 as usize)
        }
    }

    /// Every registered state in numeric order, built-in states first
    pub fn states(&self) -> impl Iterator<Item = &StateEntry> {
        self.builtin_states.iter().chain(self.synthetic_states.iter())
    }

    pub fn synthetic_states(&self) -> &[StateEntry] {
        &self.synthetic_states
    }

    pub fn builtin_state_count(&self) -> usize {
        self.builtin_states.len()
    }

    /// Whether the state exists and belongs to synthetic content
    pub fn is_synthetic(&self, id: StateId) -> bool {
        self.state(id)
            .and_then(|state| self.content(state.kind))
            .is_some_and(ContentEntry::is_synthetic)
    }
}
