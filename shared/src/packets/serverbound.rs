use facade_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::packets::handshake::BundleStatus;

/// Packets a peer sends during early play that the server acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerboundPacket {
    BundleStatus(BundleStatus),
    KeepAliveReply { parameter: i32 },
}

type PacketIndex = UnsignedInteger<1>;

impl Serde for ServerboundPacket {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            ServerboundPacket::BundleStatus(status) => {
                PacketIndex::new(0u8).ser(writer);
                status.ser(writer);
            }
            ServerboundPacket::KeepAliveReply { parameter } => {
                PacketIndex::new(1u8).ser(writer);
                parameter.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match PacketIndex::de(reader)?.get() {
            0 => Ok(ServerboundPacket::BundleStatus(BundleStatus::de(reader)?)),
            1 => Ok(ServerboundPacket::KeepAliveReply {
                parameter: i32::de(reader)?,
            }),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let body = match self {
            ServerboundPacket::BundleStatus(status) => status.bit_length(),
            ServerboundPacket::KeepAliveReply { parameter } => parameter.bit_length(),
        };
        <PacketIndex as ConstBitLength>::const_bit_length() + body
    }
}
