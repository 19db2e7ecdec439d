pub mod content_registry;
pub mod error;
pub mod identity_registry;

/// Default first numeric id of synthetic states, far above any built-in state
/// table so the two ranges can never overlap
pub const DEFAULT_SYNTHETIC_STATE_OFFSET: u32 = i32::MAX as u32 - 64 * 64 * 64 * 64;

/// How many synthetic hops `safe_visual_state` follows before giving up
pub const MAX_VISUAL_DEPTH: usize = 32;
