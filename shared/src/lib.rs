//! # Facade Shared
//! Content identity, world model and packet definitions shared between the
//! facade server and anything that speaks its protocol.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use facade_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger,
    UnsignedVariableInteger, VarInt,
};

mod content;
mod identifier;
mod packets;
mod types;
mod world;

pub use content::{
    content_registry::{
        ContentEntry, ContentKind, ContentRegistry, ContentRegistryBuilder, RegisteredContent,
        StateEntry, StateId, SyntheticState,
    },
    error::{ContentError, IdentityError},
    identity_registry::{IdentityRegistry, NO_RAW_ID},
    DEFAULT_SYNTHETIC_STATE_OFFSET, MAX_VISUAL_DEPTH,
};
pub use identifier::{Identifier, IdentifierError};
pub use packets::{
    channels::{CustomChannel, CHANNEL_NAMESPACE},
    clientbound::{ClientboundPacket, CustomPayload, NativeCell},
    error::PacketError,
    handshake::{
        AssetBundlePush, BundleHash, BundleStatus, EntityAttributes, GameMode, PlaceholderJoin,
        SpawnEntity, TimeUpdate,
    },
    serverbound::ServerboundPacket,
    sync::{
        CellUpdatePacket, PackedCell, RegistryEntry, RegistryKind, RegistryPagePacket,
        SectionUpdatePacket, SyncPacket,
    },
    text::Text,
};
pub use types::{CellPos, LocalPos, PeerId, SectionPos, SECTION_EDGE, SECTION_VOLUME};
pub use world::{
    chunk::{Chunk, ChunkPos},
    diff_cache::SectionDiffCache,
    section::ChunkSection,
};
