use crate::error::DecodeError;

/// Most-significant-bit-first reader over a compressed sprite.
///
/// The cursor only ever moves forward. Reading past the end of the buffer is
/// reported as [`DecodeError::OutOfData`] instead of panicking.
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    byte_offset: usize,
    bit_index: u8,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_offset: 0,
            bit_index: 7,
        }
    }

    pub(crate) fn read_bit(&mut self) -> Result<bool, DecodeError> {
        let byte = *self
            .data
            .get(self.byte_offset)
            .ok_or(DecodeError::OutOfData {
                bytes: self.data.len(),
            })?;

        let bit = (byte >> self.bit_index) & 1;

        if self.bit_index == 0 {
            self.bit_index = 7;
            self.byte_offset += 1;
        } else {
            self.bit_index -= 1;
        }

        Ok(bit != 0)
    }

    /// Reads `count` bits as a big-endian unsigned integer.
    pub(crate) fn read_int(&mut self, mut count: u32) -> Result<usize, DecodeError> {
        debug_assert!(count <= 16);

        let mut n = 0;

        while count > 0 {
            n <<= 1;
            n |= self.read_bit()? as usize;
            count -= 1;
        }

        Ok(n)
    }

    /// Counts `1` bits up to the terminating `0`.
    ///
    /// Gives up with [`DecodeError::InvalidRunLength`] once `limit` ones have
    /// been read, without looking for the terminator.
    pub(crate) fn read_unary(&mut self, limit: u32) -> Result<u32, DecodeError> {
        let mut n = 0;

        while self.read_bit()? {
            n += 1;

            if n >= limit {
                return Err(DecodeError::InvalidRunLength(n));
            }
        }

        Ok(n)
    }
}

/// Most-significant-bit-first writer, the mirror of [`BitReader`].
pub(crate) struct BitWriter {
    buf: Vec<u8>,
    cur: u8,
    bit_index: u8,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::new(),
            cur: 0,
            bit_index: 7,
        }
    }

    pub(crate) fn write_bit(&mut self, bit: bool) {
        if bit {
            self.cur |= 1 << self.bit_index;
        }

        if self.bit_index == 0 {
            self.buf.push(self.cur);
            self.cur = 0;
            self.bit_index = 7;
        } else {
            self.bit_index -= 1;
        }
    }

    /// Writes the low `count` bits of `value`, most significant first.
    pub(crate) fn write_int(&mut self, value: usize, count: u32) {
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 != 0);
        }
    }

    #[cfg(test)]
    pub(crate) fn bit_len(&self) -> usize {
        self.buf.len() * 8 + (7 - self.bit_index) as usize
    }

    /// Flushes the final partial byte, padded with zeroes.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.bit_index != 7 {
            self.buf.push(self.cur);
        }

        self.buf
    }
}
