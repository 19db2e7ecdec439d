use std::default::Default;

use facade_shared::{GameMode, Identifier, Text};

use crate::{handshake::asset_bundle::AssetBundle, sync::sync_packet_builder::REGISTRY_PAGE_SIZE};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Used to configure the asset bundle join handshake
    pub handshake: HandshakeConfig,
    /// Used to configure virtualization packet syncing
    pub sync: SyncConfig,
}

/// Join handshake policy
#[derive(Clone)]
pub struct HandshakeConfig {
    /// Disconnect peers that decline or fail to load the bundle
    pub require_bundle: bool,
    /// Requires the bundle regardless of `require_bundle`. Set by
    /// compatibility layers that cannot work without it.
    pub force_required: bool,
    /// The bundle pushed to unverified peers. Without one there is nothing to
    /// gate on, and every peer joins without the capability.
    pub bundle: Option<AssetBundle>,
    /// Prompt shown alongside the bundle request
    pub prompt_message: Option<Text>,
    /// Server brand, suffixed with `/loading-asset-bundle` while the
    /// placeholder scene is shown
    pub brand: String,
    pub placeholder: PlaceholderConfig,
}

impl HandshakeConfig {
    /// Whether declining the bundle ends the connection
    pub fn is_required(&self) -> bool {
        self.require_bundle || self.force_required
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            require_bundle: false,
            force_required: false,
            bundle: None,
            prompt_message: None,
            brand: "facade".to_string(),
            placeholder: PlaceholderConfig::default(),
        }
    }
}

/// The throwaway scene an unverified peer waits in
#[derive(Clone)]
pub struct PlaceholderConfig {
    /// Entity id of the peer in the placeholder scene
    pub entity_id: i32,
    /// Entity id of the inert marker the camera is attached to
    pub marker_entity_id: i32,
    pub marker_kind: Identifier,
    pub marker_position: (f64, f64, f64),
    pub scene: Identifier,
    pub game_mode: GameMode,
    pub max_players: u32,
    pub view_distance: u32,
    pub simulation_distance: u32,
    /// Fixed time of day shown while waiting
    pub time_of_day: i64,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            entity_id: 0,
            marker_entity_id: 1,
            marker_kind: Identifier::new("minecraft", "armor_stand"),
            marker_position: (0.0, 64.0, 0.0),
            scene: Identifier::new("facade", "placeholder"),
            game_mode: GameMode::Spectator,
            max_players: 20,
            view_distance: 2,
            simulation_distance: 2,
            time_of_day: 18_000,
        }
    }
}

/// Virtualization packet syncing
#[derive(Clone)]
pub struct SyncConfig {
    /// Most entries per registry page. Clamped to `1..=REGISTRY_PAGE_SIZE`.
    pub page_size: usize,
    /// Send the synthetic registries to each capable peer as it joins
    pub sync_registries_on_join: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: REGISTRY_PAGE_SIZE,
            sync_registries_on_join: true,
        }
    }
}
