use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength,
};

/// Unsigned integer written as exactly `BITS` bits, least significant first
pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, BITS>;

/// Unsigned integer written as groups of `BITS` bits, each group preceded by
/// a bit telling whether another group follows
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<true, BITS>;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const VARIABLE: bool, const BITS: u8> {
    value: u64,
}

impl<const VARIABLE: bool, const BITS: u8> SerdeInteger<VARIABLE, BITS> {
    /// # Panics
    ///
    /// Panics if `BITS` is not in `1..64`, or if a fixed-width integer
    /// cannot hold `value`.
    pub fn new<T: Into<u64>>(value: T) -> Self {
        assert!(
            BITS > 0 && BITS < 64,
            "SerdeInteger: {} bits is not a supported group width",
            BITS
        );
        let value = value.into();
        if !VARIABLE {
            assert!(
                value >> BITS == 0,
                "SerdeInteger: {} does not fit in {} bits",
                value,
                BITS
            );
        }
        Self { value }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Converts into `T`, failing when the value does not fit. Use this for
    /// values that came off the wire.
    pub fn try_to<T: TryFrom<u64>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.value).map_err(|_| SerdeErr)
    }

    // groups needed to carry every significant bit, at least one
    fn groups(&self) -> u32 {
        if !VARIABLE {
            return 1;
        }
        let significant = u64::BITS - self.value.leading_zeros();
        significant.div_ceil(BITS as u32).max(1)
    }

    // most groups a well-formed variable integer can span
    fn max_groups() -> u32 {
        if VARIABLE {
            u64::BITS.div_ceil(BITS as u32)
        } else {
            1
        }
    }
}

impl<const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let groups = self.groups();
        let mut value = self.value;
        for group in 1..=groups {
            if VARIABLE {
                writer.write_bit(group < groups);
            }
            for _ in 0..BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;

        for _ in 0..Self::max_groups() {
            let proceed = VARIABLE && reader.read_bit()?;
            for _ in 0..BITS {
                if reader.read_bit()? {
                    if shift >= u64::BITS {
                        return Err(SerdeErr);
                    }
                    value |= 1 << shift;
                }
                shift += 1;
            }
            if !proceed {
                return Ok(Self { value });
            }
        }

        // continuation bit set on the last possible group
        Err(SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        let group_bits = BITS as u32 + u32::from(VARIABLE);
        self.groups() * group_bits
    }
}

impl<const BITS: u8> ConstBitLength for SerdeInteger<false, BITS> {
    fn const_bit_length() -> u32 {
        BITS as u32
    }
}

impl<const VARIABLE: bool, const BITS: u8, T: Into<u64>> From<T> for SerdeInteger<VARIABLE, BITS> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
