use thiserror::Error;

use crate::Identifier;

/// Errors raised while building a ContentRegistry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// Two entries were registered under the same identifier
    #[error("Content {identifier} is already registered")]
    DuplicateIdentifier { identifier: Identifier },

    /// A content entry was declared without any state
    #[error("Content {identifier} declares no states")]
    NoStates { identifier: Identifier },

    /// Built-in states would collide with the synthetic id range
    #[error("{builtin_states} built-in states do not fit below the synthetic offset {offset}")]
    OffsetTooSmall { builtin_states: u32, offset: u32 },

    /// Synthetic states would overflow the numeric state space
    #[error("{synthetic_states} synthetic states overflow the state id space above offset {offset}")]
    TooManySyntheticStates { synthetic_states: u32, offset: u32 },

    /// A synthetic state names a visual fallback that is not registered
    #[error("Content {identifier} uses unknown visual fallback state {state}")]
    UnknownVisual { identifier: Identifier, state: u32 },

    /// The configured error state is missing or itself synthetic
    #[error("Error state {state} is not a registered built-in state")]
    InvalidErrorState { state: u32 },
}

/// Errors raised while translating between states and raw ids
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// A raw id outside of the range produced by `raw_id` was supplied
    #[error("Raw id {raw_id} is outside the synthetic range 1..={max_raw_id}")]
    RawIdOutOfRange { raw_id: u32, max_raw_id: u32 },
}
