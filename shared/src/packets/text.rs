use facade_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// User-visible text: either literal or a translation key resolved by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Literal(String),
    Translatable(String),
}

impl Text {
    pub fn literal(value: &str) -> Self {
        Text::Literal(value.to_string())
    }

    pub fn translatable(key: &str) -> Self {
        Text::Translatable(key.to_string())
    }
}

impl Serde for Text {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Text::Literal(value) => {
                false.ser(writer);
                value.ser(writer);
            }
            Text::Translatable(key) => {
                true.ser(writer);
                key.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Text::Translatable(String::de(reader)?))
        } else {
            Ok(Text::Literal(String::de(reader)?))
        }
    }

    fn bit_length(&self) -> u32 {
        match self {
            Text::Literal(value) | Text::Translatable(value) => 1 + value.bit_length(),
        }
    }
}
