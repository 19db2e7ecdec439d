use facade_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

/// Cells along each edge of a section
pub const SECTION_EDGE: i32 = 16;
/// Cells in one section
pub const SECTION_VOLUME: usize = 4096;

/// Stable identity of a remote peer across reconnects (the account id)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u128);

// CellPos

/// Absolute position of a single grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn section(&self) -> SectionPos {
        SectionPos::new(
            self.x >> 4,
            self.y >> 4,
            self.z >> 4,
        )
    }

    pub fn local(&self) -> LocalPos {
        LocalPos::new(
            (self.x & 15) as u8,
            (self.y & 15) as u8,
            (self.z & 15) as u8,
        )
    }

    // 26 bits of x, 26 bits of z, 12 bits of y, the layout native clients expect
    fn pack(&self) -> u64 {
        ((self.x as u64 & 0x3FF_FFFF) << 38)
            | ((self.z as u64 & 0x3FF_FFFF) << 12)
            | (self.y as u64 & 0xFFF)
    }

    fn unpack(packed: u64) -> Self {
        let packed = packed as i64;
        Self {
            x: (packed >> 38) as i32,
            y: ((packed << 52) >> 52) as i32,
            z: ((packed << 26) >> 38) as i32,
        }
    }
}

impl Serde for CellPos {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.pack().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self::unpack(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for CellPos {
    fn const_bit_length() -> u32 {
        <u64 as ConstBitLength>::const_bit_length()
    }
}

// SectionPos

/// Position of a 16x16x16 section, in section coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectionPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SectionPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Absolute position of the cell at `local` inside this section
    pub fn cell(&self, local: LocalPos) -> CellPos {
        CellPos::new(
            self.x * SECTION_EDGE + local.x() as i32,
            self.y * SECTION_EDGE + local.y() as i32,
            self.z * SECTION_EDGE + local.z() as i32,
        )
    }

    // 22 bits of x, 22 bits of z, 20 bits of y
    fn pack(&self) -> u64 {
        ((self.x as u64 & 0x3F_FFFF) << 42)
            | ((self.z as u64 & 0x3F_FFFF) << 20)
            | (self.y as u64 & 0xF_FFFF)
    }

    fn unpack(packed: u64) -> Self {
        let packed = packed as i64;
        Self {
            x: (packed >> 42) as i32,
            y: ((packed << 44) >> 44) as i32,
            z: ((packed << 22) >> 42) as i32,
        }
    }
}

impl Serde for SectionPos {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.pack().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self::unpack(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for SectionPos {
    fn const_bit_length() -> u32 {
        <u64 as ConstBitLength>::const_bit_length()
    }
}

// LocalPos

/// A cell position inside one section, packed into 12 bits as `x << 8 | z << 4 | y`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos(u16);

impl LocalPos {
    /// Highest packed value a local position can take
    pub const MAX: u16 = 0x0FFF;

    pub fn new(x: u8, y: u8, z: u8) -> Self {
        assert!(x < 16 && y < 16 && z < 16, "local coordinates must be below 16");
        Self(((x as u16) << 8) | ((z as u16) << 4) | y as u16)
    }

    /// Wraps an already packed value
    ///
    /// # Panics
    ///
    /// Panics if `packed` does not fit in 12 bits.
    pub fn from_packed(packed: u16) -> Self {
        assert!(packed <= Self::MAX, "local position {packed:#x} does not fit in 12 bits");
        Self(packed)
    }

    pub fn packed(&self) -> u16 {
        self.0
    }

    pub fn x(&self) -> u8 {
        ((self.0 >> 8) & 15) as u8
    }

    pub fn y(&self) -> u8 {
        (self.0 & 15) as u8
    }

    pub fn z(&self) -> u8 {
        ((self.0 >> 4) & 15) as u8
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}
