mod server;
pub use server::Server;

pub mod server_config;
pub use server_config::{HandshakeConfig, PlaceholderConfig, ServerConfig, SyncConfig};
