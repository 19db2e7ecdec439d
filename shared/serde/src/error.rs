use thiserror::Error;

/// Returned when a value cannot be read back from a bit stream, either
/// because the stream ran out or because the data read is not a valid
/// encoding of the requested type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to deserialize value from bit stream")]
pub struct SerdeErr;
