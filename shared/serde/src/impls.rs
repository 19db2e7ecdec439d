use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength,
    VarInt,
};

/// Longest string, in bytes, accepted when reading
pub const MAX_STRING_LENGTH: usize = 32_767;
/// Longest byte buffer or element sequence accepted when reading
pub const MAX_COLLECTION_LENGTH: usize = 2_097_152;

// bool

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for bool {
    fn const_bit_length() -> u32 {
        1
    }
}

// Fixed width numbers, little-endian bytes

macro_rules! impl_serde_for_number {
    ($impl_type:ty) => {
        impl Serde for $impl_type {
            fn ser(&self, writer: &mut dyn BitWrite) {
                for byte in self.to_le_bytes() {
                    writer.write_byte(byte);
                }
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$impl_type>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$impl_type>::from_le_bytes(bytes))
            }

            fn bit_length(&self) -> u32 {
                <Self as ConstBitLength>::const_bit_length()
            }
        }

        impl ConstBitLength for $impl_type {
            fn const_bit_length() -> u32 {
                (std::mem::size_of::<$impl_type>() as u32) * 8
            }
        }
    };
}

impl_serde_for_number!(u8);
impl_serde_for_number!(u16);
impl_serde_for_number!(u32);
impl_serde_for_number!(u64);
impl_serde_for_number!(u128);
impl_serde_for_number!(i32);
impl_serde_for_number!(i64);
impl_serde_for_number!(f64);

// Length prefixes

fn ser_length(length: usize, writer: &mut dyn BitWrite) {
    VarInt::new(length as u64).ser(writer);
}

fn de_length(reader: &mut BitReader, max: usize) -> Result<usize, SerdeErr> {
    let length: usize = VarInt::de(reader)?.try_to()?;
    if length > max {
        return Err(SerdeErr);
    }
    Ok(length)
}

fn length_bit_length(length: usize) -> u32 {
    VarInt::new(length as u64).bit_length()
}

// String

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_length(self.len(), writer);
        for byte in self.as_bytes() {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = de_length(reader, MAX_STRING_LENGTH)?;
        let mut bytes = Vec::with_capacity(length);
        for _ in 0..length {
            bytes.push(reader.read_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        length_bit_length(self.len()) + (self.len() as u32) * 8
    }
}

// Byte buffers

impl Serde for Box<[u8]> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_length(self.len(), writer);
        for byte in self.iter() {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = de_length(reader, MAX_COLLECTION_LENGTH)?;
        let mut bytes = Vec::with_capacity(length.min(reader.bytes_remaining()));
        for _ in 0..length {
            bytes.push(reader.read_byte()?);
        }
        Ok(bytes.into_boxed_slice())
    }

    fn bit_length(&self) -> u32 {
        length_bit_length(self.len()) + (self.len() as u32) * 8
    }
}

impl<const N: usize> Serde for [u8; N] {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for byte in self {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output = [0u8; N];
        for byte in output.iter_mut() {
            *byte = reader.read_byte()?;
        }
        Ok(output)
    }

    fn bit_length(&self) -> u32 {
        (N as u32) * 8
    }
}

// Option

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }

    fn bit_length(&self) -> u32 {
        1 + self.as_ref().map_or(0, Serde::bit_length)
    }
}

// Vec

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_length(self.len(), writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = de_length(reader, MAX_COLLECTION_LENGTH)?;
        // every element needs at least one bit, so the remaining input bounds the allocation
        let mut output = Vec::with_capacity(length.min(reader.bytes_remaining() * 8));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }

    fn bit_length(&self) -> u32 {
        length_bit_length(self.len()) + self.iter().map(Serde::bit_length).sum::<u32>()
    }
}
