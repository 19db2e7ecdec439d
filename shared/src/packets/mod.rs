pub mod channels;
pub mod clientbound;
pub mod error;
pub mod handshake;
pub mod serverbound;
pub mod sync;
pub mod text;
