use std::fmt;

use facade_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::{packets::text::Text, Identifier};

// GameMode

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl Serde for GameMode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let index: u8 = match self {
            GameMode::Survival => 0,
            GameMode::Creative => 1,
            GameMode::Adventure => 2,
            GameMode::Spectator => 3,
        };
        UnsignedInteger::<2>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(GameMode::Survival),
            1 => Ok(GameMode::Creative),
            2 => Ok(GameMode::Adventure),
            3 => Ok(GameMode::Spectator),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        <UnsignedInteger<2> as ConstBitLength>::const_bit_length()
    }
}

// PlaceholderJoin

/// Join descriptor that drops the peer into a throwaway scene as a
/// non-interactive spectator. Carries no real world data.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderJoin {
    pub entity_id: i32,
    pub game_mode: GameMode,
    pub scene: Identifier,
    pub max_players: u32,
    pub view_distance: u32,
    pub simulation_distance: u32,
    pub reduced_debug_info: bool,
    pub flat: bool,
}

impl Serde for PlaceholderJoin {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity_id.ser(writer);
        self.game_mode.ser(writer);
        self.scene.ser(writer);
        self.max_players.ser(writer);
        self.view_distance.ser(writer);
        self.simulation_distance.ser(writer);
        self.reduced_debug_info.ser(writer);
        self.flat.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: i32::de(reader)?,
            game_mode: GameMode::de(reader)?,
            scene: Identifier::de(reader)?,
            max_players: u32::de(reader)?,
            view_distance: u32::de(reader)?,
            simulation_distance: u32::de(reader)?,
            reduced_debug_info: bool::de(reader)?,
            flat: bool::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.entity_id.bit_length()
            + self.game_mode.bit_length()
            + self.scene.bit_length()
            + self.max_players.bit_length()
            + self.view_distance.bit_length()
            + self.simulation_distance.bit_length()
            + self.reduced_debug_info.bit_length()
            + self.flat.bit_length()
    }
}

// SpawnEntity

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnEntity {
    pub entity_id: i32,
    pub uuid: u128,
    pub kind: Identifier,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Serde for SpawnEntity {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity_id.ser(writer);
        self.uuid.ser(writer);
        self.kind.ser(writer);
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: i32::de(reader)?,
            uuid: u128::de(reader)?,
            kind: Identifier::de(reader)?,
            x: f64::de(reader)?,
            y: f64::de(reader)?,
            z: f64::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.entity_id.bit_length()
            + self.uuid.bit_length()
            + self.kind.bit_length()
            + self.x.bit_length() * 3
    }
}

// EntityAttributes

/// Attribute snapshot of a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityAttributes {
    pub entity_id: i32,
    pub invisible: bool,
    pub no_gravity: bool,
    pub marker: bool,
}

impl Serde for EntityAttributes {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity_id.ser(writer);
        self.invisible.ser(writer);
        self.no_gravity.ser(writer);
        self.marker.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity_id: i32::de(reader)?,
            invisible: bool::de(reader)?,
            no_gravity: bool::de(reader)?,
            marker: bool::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.entity_id.bit_length() + 3
    }
}

// TimeUpdate

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUpdate {
    pub world_age: i64,
    pub time_of_day: i64,
    pub advance_time: bool,
}

impl Serde for TimeUpdate {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.world_age.ser(writer);
        self.time_of_day.ser(writer);
        self.advance_time.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            world_age: i64::de(reader)?,
            time_of_day: i64::de(reader)?,
            advance_time: bool::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.world_age.bit_length() + self.time_of_day.bit_length() + 1
    }
}

// BundleHash

/// SHA-1 digest of an asset bundle, sent as 40 lowercase hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BundleHash(pub [u8; 20]);

impl BundleHash {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{:02x}", byte)).collect()
    }

    pub fn from_hex(value: &str) -> Option<Self> {
        if value.len() != 40 || !value.is_ascii() {
            return None;
        }
        let mut output = [0u8; 20];
        for (index, byte) in output.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&value[index * 2..index * 2 + 2], 16).ok()?;
        }
        Some(Self(output))
    }
}

impl fmt::Debug for BundleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BundleHash({})", self.to_hex())
    }
}

impl Serde for BundleHash {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_hex().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Self::from_hex(&String::de(reader)?).ok_or(SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        self.to_hex().bit_length()
    }
}

// AssetBundlePush

/// Asks the client to download and apply an asset bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundlePush {
    pub address: String,
    pub hash: BundleHash,
    pub required: bool,
    pub message: Option<Text>,
}

impl Serde for AssetBundlePush {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.address.ser(writer);
        self.hash.ser(writer);
        self.required.ser(writer);
        self.message.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            address: String::de(reader)?,
            hash: BundleHash::de(reader)?,
            required: bool::de(reader)?,
            message: Option::<Text>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.address.bit_length()
            + self.hash.bit_length()
            + self.required.bit_length()
            + self.message.bit_length()
    }
}

// BundleStatus

/// Client report on an asset bundle push
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BundleStatus {
    Accepted,
    SuccessfullyLoaded,
    Declined,
    FailedDownload,
}

impl Serde for BundleStatus {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let index: u8 = match self {
            BundleStatus::SuccessfullyLoaded => 0,
            BundleStatus::Declined => 1,
            BundleStatus::FailedDownload => 2,
            BundleStatus::Accepted => 3,
        };
        UnsignedInteger::<2>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(BundleStatus::SuccessfullyLoaded),
            1 => Ok(BundleStatus::Declined),
            2 => Ok(BundleStatus::FailedDownload),
            3 => Ok(BundleStatus::Accepted),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        <UnsignedInteger<2> as ConstBitLength>::const_bit_length()
    }
}
