//! # Facade Server
//! A server that presents synthetic, server-only content to clients that
//! only know a fixed set of built-in content. Synthetic states are remapped
//! onto the client's raw id space, and exposure to them is gated behind an
//! asset bundle join handshake.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use facade_shared::{
        BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger,
        UnsignedVariableInteger, VarInt,
    };
}

mod connection;
mod error;
mod events;
mod handshake;
mod server;
mod sync;

pub use connection::{
    capability_gate::CapabilityGate,
    connection::{Connection, ConnectionKey},
    error::ConnectionError,
    interceptor::{InterceptContext, Interception, InterceptorChain, PacketInterceptor},
    virtualization::VirtualizationInterceptor,
};
pub use error::FacadeServerError;
pub use events::{DisconnectEvent, ErrorEvent, Event, Events, JoinEvent};
pub use handshake::{
    asset_bundle::AssetBundle,
    early_play::{EarlyPlayHandler, HandshakeProgress},
    error::HandshakeError,
    join_handshake::{JoinHandshake, BUNDLE_FAILURE_KEY, HANDSHAKE_KEEPALIVE},
    placeholder::{placeholder_packets, LOADING_BRAND_SUFFIX},
    session::{HandshakePhase, HandshakeSession},
    verified_peers::{InMemoryVerifiedPeers, VerifiedPeers},
};
pub use server::{HandshakeConfig, PlaceholderConfig, Server, ServerConfig, SyncConfig};
pub use sync::sync_packet_builder::{SyncPacketBuilder, REGISTRY_PAGE_SIZE};
