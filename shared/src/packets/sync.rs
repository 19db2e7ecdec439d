use facade_serde::{BitReader, BitWrite, Serde, SerdeErr, VarInt};

use crate::{
    packets::{channels::CustomChannel, clientbound::CustomPayload, error::PacketError},
    types::{CellPos, LocalPos, SectionPos},
    Identifier,
};

/// A packet carried on one of the custom payload channels
pub trait SyncPacket: Serde {
    fn channel(&self) -> CustomChannel;

    fn to_payload(&self) -> CustomPayload {
        CustomPayload::encode(self.channel(), self)
    }
}

// CellUpdatePacket

/// Virtualized state of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellUpdatePacket {
    pub pos: CellPos,
    pub raw_id: u32,
}

impl CellUpdatePacket {
    pub fn from_payload(payload: &CustomPayload) -> Result<Self, PacketError> {
        payload.decode(CustomChannel::CellUpdate)
    }
}

impl SyncPacket for CellUpdatePacket {
    fn channel(&self) -> CustomChannel {
        CustomChannel::CellUpdate
    }
}

impl Serde for CellUpdatePacket {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.pos.ser(writer);
        VarInt::new(self.raw_id).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            pos: CellPos::de(reader)?,
            raw_id: VarInt::de(reader)?.try_to()?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.pos.bit_length() + VarInt::new(self.raw_id).bit_length()
    }
}

// PackedCell

/// `raw_id << 12 | local`, written as a variable-length long
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedCell(u64);

impl PackedCell {
    pub fn new(raw_id: u32, local: LocalPos) -> Self {
        Self(((raw_id as u64) << 12) | local.packed() as u64)
    }

    pub fn raw_id(&self) -> u32 {
        (self.0 >> 12) as u32
    }

    pub fn local(&self) -> LocalPos {
        LocalPos::from_packed((self.0 & LocalPos::MAX as u64) as u16)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Serde for PackedCell {
    fn ser(&self, writer: &mut dyn BitWrite) {
        VarInt::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value: u64 = VarInt::de(reader)?.try_to()?;
        // raw ids are u32, so anything above 44 bits cannot have been packed by us
        if value >> 44 != 0 {
            return Err(SerdeErr);
        }
        Ok(Self(value))
    }

    fn bit_length(&self) -> u32 {
        VarInt::new(self.0).bit_length()
    }
}

// SectionUpdatePacket

/// Virtualized states of several cells inside one section
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionUpdatePacket {
    pub section: SectionPos,
    pub cells: Vec<PackedCell>,
}

impl SectionUpdatePacket {
    pub fn from_payload(payload: &CustomPayload) -> Result<Self, PacketError> {
        payload.decode(CustomChannel::SectionUpdate)
    }
}

impl SyncPacket for SectionUpdatePacket {
    fn channel(&self) -> CustomChannel {
        CustomChannel::SectionUpdate
    }
}

impl Serde for SectionUpdatePacket {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.section.ser(writer);
        self.cells.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            section: SectionPos::de(reader)?,
            cells: Vec::<PackedCell>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.section.bit_length() + self.cells.bit_length()
    }
}

// Registry pages

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    /// Content types, one record per synthetic content entry
    Content,
    /// States, one record per synthetic state
    State,
}

impl RegistryKind {
    pub fn channel(&self) -> CustomChannel {
        match self {
            RegistryKind::Content => CustomChannel::ContentRegistry,
            RegistryKind::State => CustomChannel::StateRegistry,
        }
    }
}

/// One synthetic registry record as the client sees it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    pub identifier: Identifier,
    pub raw_index: u32,
    pub label: String,
    /// Real state id the client renders this entry as
    pub visual_raw_id: u32,
}

impl Serde for RegistryEntry {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.identifier.ser(writer);
        VarInt::new(self.raw_index).ser(writer);
        self.label.ser(writer);
        VarInt::new(self.visual_raw_id).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            identifier: Identifier::de(reader)?,
            raw_index: VarInt::de(reader)?.try_to()?,
            label: String::de(reader)?,
            visual_raw_id: VarInt::de(reader)?.try_to()?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.identifier.bit_length()
            + VarInt::new(self.raw_index).bit_length()
            + self.label.bit_length()
            + VarInt::new(self.visual_raw_id).bit_length()
    }
}

/// One page of a registry sync. The kind selects the channel and is not
/// written into the payload itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryPagePacket {
    pub kind: RegistryKind,
    pub entries: Vec<RegistryEntry>,
}

impl RegistryPagePacket {
    pub fn from_payload(payload: &CustomPayload) -> Result<Self, PacketError> {
        let kind = if payload.is_on(CustomChannel::StateRegistry) {
            RegistryKind::State
        } else {
            RegistryKind::Content
        };
        let entries = payload.decode::<Vec<RegistryEntry>>(kind.channel())?;
        Ok(Self { kind, entries })
    }
}

impl SyncPacket for RegistryPagePacket {
    fn channel(&self) -> CustomChannel {
        self.kind.channel()
    }

    fn to_payload(&self) -> CustomPayload {
        CustomPayload::encode(self.channel(), &self.entries)
    }
}

impl Serde for RegistryPagePacket {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (self.kind == RegistryKind::State).ser(writer);
        self.entries.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let kind = if bool::de(reader)? {
            RegistryKind::State
        } else {
            RegistryKind::Content
        };
        Ok(Self {
            kind,
            entries: Vec::<RegistryEntry>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        1 + self.entries.bit_length()
    }
}
