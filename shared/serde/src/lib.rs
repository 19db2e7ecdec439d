//! # Facade Serde
//! Bit-level serialization shared by the facade protocol crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitCounter, BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::{SerdeInteger, UnsignedInteger, UnsignedVariableInteger};
pub use impls::{MAX_COLLECTION_LENGTH, MAX_STRING_LENGTH};
pub use serde::{ConstBitLength, Serde};

/// Variable-length unsigned integer with 7-bit groups, used for every length
/// prefix and id on the wire
pub type VarInt = UnsignedVariableInteger<7>;
