use facade_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger, VarInt,
};

use crate::{
    content::content_registry::StateId,
    packets::{
        channels::CustomChannel,
        error::PacketError,
        handshake::{AssetBundlePush, EntityAttributes, PlaceholderJoin, SpawnEntity, TimeUpdate},
        text::Text,
    },
    types::{CellPos, LocalPos, SectionPos},
    Identifier,
};

// CustomPayload

/// Opaque payload on a named channel. The base protocol carries these
/// without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPayload {
    pub channel: Identifier,
    pub data: Box<[u8]>,
}

impl CustomPayload {
    /// Serializes `value` onto `channel`
    pub fn encode<T: Serde>(channel: CustomChannel, value: &T) -> Self {
        let mut writer = BitWriter::with_capacity(((value.bit_length() + 7) / 8) as usize);
        value.ser(&mut writer);
        Self {
            channel: channel.identifier(),
            data: writer.to_bytes(),
        }
    }

    /// Decodes the payload as `T`, which must own the whole of `data`
    pub fn decode<T: Serde>(&self, channel: CustomChannel) -> Result<T, PacketError> {
        let expected = channel.identifier();
        if self.channel != expected {
            return Err(PacketError::WrongChannel {
                expected,
                actual: self.channel.clone(),
            });
        }

        let mut reader = BitReader::new(&self.data);
        let value = T::de(&mut reader).map_err(|_| PacketError::Malformed {
            channel: self.channel.clone(),
        })?;

        let bytes = reader.bytes_remaining();
        if bytes > 0 {
            return Err(PacketError::TrailingBytes {
                channel: self.channel.clone(),
                bytes,
            });
        }

        Ok(value)
    }

    pub fn is_on(&self, channel: CustomChannel) -> bool {
        self.channel == channel.identifier()
    }
}

impl Serde for CustomPayload {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.channel.ser(writer);
        self.data.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            channel: Identifier::de(reader)?,
            data: Box::<[u8]>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.channel.bit_length() + self.data.bit_length()
    }
}

// NativeCell

/// One entry of a native section update, carrying the real state id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeCell {
    pub local: LocalPos,
    pub state: StateId,
}

impl Serde for NativeCell {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let packed = ((self.state.0 as u64) << 12) | self.local.packed() as u64;
        VarInt::new(packed).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let packed: u64 = VarInt::de(reader)?.try_to()?;
        let state = u32::try_from(packed >> 12).map_err(|_| SerdeErr)?;
        Ok(Self {
            local: LocalPos::from_packed((packed & LocalPos::MAX as u64) as u16),
            state: StateId(state),
        })
    }

    fn bit_length(&self) -> u32 {
        let packed = ((self.state.0 as u64) << 12) | self.local.packed() as u64;
        VarInt::new(packed).bit_length()
    }
}

// ClientboundPacket

/// Every packet the server may hand to a connection's outbound channel
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundPacket {
    CustomPayload(CustomPayload),
    /// Native single cell change
    CellUpdate { pos: CellPos, state: StateId },
    /// Native batch of cell changes within one section
    SectionCellsUpdate {
        section: SectionPos,
        cells: Vec<NativeCell>,
    },
    Join(PlaceholderJoin),
    SpawnEntity(SpawnEntity),
    EntityAttributes(EntityAttributes),
    SetCamera { entity_id: i32 },
    TimeUpdate(TimeUpdate),
    AssetBundlePush(AssetBundlePush),
    KeepAlive { parameter: i32 },
    Disconnect { reason: Text },
}

type PacketIndex = UnsignedInteger<4>;

impl ClientboundPacket {
    fn index(&self) -> u8 {
        match self {
            ClientboundPacket::CustomPayload(_) => 0,
            ClientboundPacket::CellUpdate { .. } => 1,
            ClientboundPacket::SectionCellsUpdate { .. } => 2,
            ClientboundPacket::Join(_) => 3,
            ClientboundPacket::SpawnEntity(_) => 4,
            ClientboundPacket::EntityAttributes(_) => 5,
            ClientboundPacket::SetCamera { .. } => 6,
            ClientboundPacket::TimeUpdate(_) => 7,
            ClientboundPacket::AssetBundlePush(_) => 8,
            ClientboundPacket::KeepAlive { .. } => 9,
            ClientboundPacket::Disconnect { .. } => 10,
        }
    }

    /// The custom payload carried by this packet, if it is one
    pub fn as_custom_payload(&self) -> Option<&CustomPayload> {
        match self {
            ClientboundPacket::CustomPayload(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<CustomPayload> for ClientboundPacket {
    fn from(payload: CustomPayload) -> Self {
        ClientboundPacket::CustomPayload(payload)
    }
}

impl Serde for ClientboundPacket {
    fn ser(&self, writer: &mut dyn BitWrite) {
        PacketIndex::new(self.index()).ser(writer);
        match self {
            ClientboundPacket::CustomPayload(payload) => payload.ser(writer),
            ClientboundPacket::CellUpdate { pos, state } => {
                pos.ser(writer);
                state.ser(writer);
            }
            ClientboundPacket::SectionCellsUpdate { section, cells } => {
                section.ser(writer);
                cells.ser(writer);
            }
            ClientboundPacket::Join(join) => join.ser(writer),
            ClientboundPacket::SpawnEntity(spawn) => spawn.ser(writer),
            ClientboundPacket::EntityAttributes(attributes) => attributes.ser(writer),
            ClientboundPacket::SetCamera { entity_id } => entity_id.ser(writer),
            ClientboundPacket::TimeUpdate(time) => time.ser(writer),
            ClientboundPacket::AssetBundlePush(push) => push.ser(writer),
            ClientboundPacket::KeepAlive { parameter } => parameter.ser(writer),
            ClientboundPacket::Disconnect { reason } => reason.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let packet = match PacketIndex::de(reader)?.get() {
            0 => ClientboundPacket::CustomPayload(CustomPayload::de(reader)?),
            1 => ClientboundPacket::CellUpdate {
                pos: CellPos::de(reader)?,
                state: StateId::de(reader)?,
            },
            2 => ClientboundPacket::SectionCellsUpdate {
                section: SectionPos::de(reader)?,
                cells: Vec::<NativeCell>::de(reader)?,
            },
            3 => ClientboundPacket::Join(PlaceholderJoin::de(reader)?),
            4 => ClientboundPacket::SpawnEntity(SpawnEntity::de(reader)?),
            5 => ClientboundPacket::EntityAttributes(EntityAttributes::de(reader)?),
            6 => ClientboundPacket::SetCamera {
                entity_id: i32::de(reader)?,
            },
            7 => ClientboundPacket::TimeUpdate(TimeUpdate::de(reader)?),
            8 => ClientboundPacket::AssetBundlePush(AssetBundlePush::de(reader)?),
            9 => ClientboundPacket::KeepAlive {
                parameter: i32::de(reader)?,
            },
            10 => ClientboundPacket::Disconnect {
                reason: Text::de(reader)?,
            },
            _ => return Err(SerdeErr),
        };
        Ok(packet)
    }

    fn bit_length(&self) -> u32 {
        let body = match self {
            ClientboundPacket::CustomPayload(payload) => payload.bit_length(),
            ClientboundPacket::CellUpdate { pos, state } => pos.bit_length() + state.bit_length(),
            ClientboundPacket::SectionCellsUpdate { section, cells } => {
                section.bit_length() + cells.bit_length()
            }
            ClientboundPacket::Join(join) => join.bit_length(),
            ClientboundPacket::SpawnEntity(spawn) => spawn.bit_length(),
            ClientboundPacket::EntityAttributes(attributes) => attributes.bit_length(),
            ClientboundPacket::SetCamera { entity_id } => entity_id.bit_length(),
            ClientboundPacket::TimeUpdate(time) => time.bit_length(),
            ClientboundPacket::AssetBundlePush(push) => push.bit_length(),
            ClientboundPacket::KeepAlive { parameter } => parameter.bit_length(),
            ClientboundPacket::Disconnect { reason } => reason.bit_length(),
        };
        <PacketIndex as ConstBitLength>::const_bit_length() + body
    }
}
