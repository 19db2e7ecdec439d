pub mod capability_gate;
pub mod connection;
pub mod error;
pub mod interceptor;
pub mod virtualization;
