use crate::error::SerdeErr;

// BitReader

pub struct BitReader<'b> {
    buffer: &'b [u8],
    buffer_index: usize,
    scratch: u8,
    scratch_index: u8,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            buffer_index: 0,
            scratch: 0,
            scratch_index: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.scratch_index == 0 {
            let Some(byte) = self.buffer.get(self.buffer_index) else {
                return Err(SerdeErr);
            };
            self.buffer_index += 1;
            self.scratch = *byte;
            self.scratch_index = 8;
        }

        let value = self.scratch & 1;
        self.scratch >>= 1;
        self.scratch_index -= 1;

        Ok(value != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0;
        for i in 0..8 {
            if self.read_bit()? {
                output |= 1 << i;
            }
        }
        Ok(output)
    }

    /// Number of whole bytes not yet touched by the reader
    pub fn bytes_remaining(&self) -> usize {
        self.buffer.len() - self.buffer_index
    }

    /// Whether every bit of the buffer has been consumed, ignoring the zero
    /// padding of the final byte
    pub fn is_exhausted(&self) -> bool {
        self.bytes_remaining() == 0 && self.scratch == 0
    }
}
