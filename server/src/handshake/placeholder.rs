use facade_shared::{
    AssetBundlePush, ClientboundPacket, CustomChannel, CustomPayload, EntityAttributes,
    PlaceholderJoin, SpawnEntity, TimeUpdate,
};

use crate::server::server_config::PlaceholderConfig;

/// Suffix appended to the brand while a peer waits in the placeholder scene
pub const LOADING_BRAND_SUFFIX: &str = "loading-asset-bundle";

/// The packets that park a peer in the placeholder scene and ask for the
/// bundle, in send order: join, marker spawn and attributes, camera, brand,
/// time, bundle push. None of them reveal real world state.
pub fn placeholder_packets(
    config: &PlaceholderConfig,
    brand: &str,
    push: AssetBundlePush,
) -> Vec<ClientboundPacket> {
    let (x, y, z) = config.marker_position;
    let brand = format!("{}/{}", brand, LOADING_BRAND_SUFFIX);

    vec![
        ClientboundPacket::Join(PlaceholderJoin {
            entity_id: config.entity_id,
            game_mode: config.game_mode,
            scene: config.scene.clone(),
            max_players: config.max_players,
            view_distance: config.view_distance,
            simulation_distance: config.simulation_distance,
            reduced_debug_info: false,
            flat: true,
        }),
        ClientboundPacket::SpawnEntity(SpawnEntity {
            entity_id: config.marker_entity_id,
            uuid: fastrand::u128(..),
            kind: config.marker_kind.clone(),
            x,
            y,
            z,
        }),
        ClientboundPacket::EntityAttributes(EntityAttributes {
            entity_id: config.marker_entity_id,
            invisible: true,
            no_gravity: true,
            marker: true,
        }),
        ClientboundPacket::SetCamera {
            entity_id: config.marker_entity_id,
        },
        ClientboundPacket::CustomPayload(CustomPayload::encode(CustomChannel::Brand, &brand)),
        ClientboundPacket::TimeUpdate(TimeUpdate {
            world_age: 0,
            time_of_day: config.time_of_day,
            advance_time: false,
        }),
        ClientboundPacket::AssetBundlePush(push),
    ]
}
