pub mod asset_bundle;
pub mod early_play;
pub mod error;
pub mod join_handshake;
pub mod placeholder;
pub mod session;
pub mod verified_peers;
