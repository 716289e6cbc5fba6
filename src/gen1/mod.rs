//! Generation I (Red, Blue, Yellow) sprite compression.
//!
//! A compressed sprite starts with its width in tiles (stored twice), the plane
//! order bit, the first bit-plane, the plane mode and then the second
//! bit-plane. The decoded planes are interleaved into Game Boy 2bpp tiles.

use log::debug;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{DecodeError, LayoutError};

mod compress;
mod gray;
mod plane;
mod transpose;

pub use compress::{compress, compress_with};
pub use transpose::transpose;

const TILESIZE: usize = 8;
const TILE_BYTES: usize = 16;

/// Widest sprite, in tiles, the 4-bit header can describe.
pub const MAX_WIDTH: usize = 15;

/// How the second bit-plane is stored relative to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Both planes are coded on their own.
    Independent,
    /// The second plane is the raw XOR delta against the decoded first plane.
    Delta,
    /// The second plane is a coded XOR delta against the decoded first plane.
    DecodedDelta,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Independent, Mode::Delta, Mode::DecodedDelta];

    /// The value as stored in the stream, 0 to 2.
    pub fn index(self) -> u8 {
        match self {
            Mode::Independent => 0,
            Mode::Delta => 1,
            Mode::DecodedDelta => 2,
        }
    }

    // `0`, `10` or `11`: the second bit is only present after a `1`.
    fn read(data: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(if data.read_bit()? {
            if data.read_bit()? {
                Mode::DecodedDelta
            } else {
                Mode::Delta
            }
        } else {
            Mode::Independent
        })
    }

    fn write(self, writer: &mut BitWriter) {
        match self {
            Mode::Independent => writer.write_bit(false),
            Mode::Delta => writer.write_int(0b10, 2),
            Mode::DecodedDelta => writer.write_int(0b11, 2),
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mode::ALL.get(value as usize).copied().ok_or(value)
    }
}

/// Fields read from a compressed sprite while decoding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Width and height in tiles.
    pub width: usize,
    /// The first plane in the stream is the high (odd byte) plane.
    pub order_reversed: bool,
    pub mode: Mode,
}

impl Header {
    /// Size of the decompressed 2bpp data.
    pub fn decompressed_len(&self) -> usize {
        decompressed_len(self.width)
    }
}

/// Size of the decompressed 2bpp data for a sprite `width` tiles wide.
pub fn decompressed_len(width: usize) -> usize {
    width * width * TILE_BYTES
}

/// Width in tiles of a square sprite occupying `len` bytes of 2bpp data.
pub fn tile_width(len: usize) -> Result<usize, LayoutError> {
    if len % TILE_BYTES != 0 {
        return Err(LayoutError::NotSquare(len));
    }

    let tiles = len / TILE_BYTES;

    let mut width = 0;
    while width * width < tiles {
        width += 1;
    }

    if width * width != tiles {
        return Err(LayoutError::NotSquare(len));
    }

    if width > MAX_WIDTH {
        return Err(LayoutError::TooWide(width));
    }

    Ok(width)
}

/// State of a single decode call.
struct Decompressor<'a> {
    data: BitReader<'a>,
    width: usize,
}

impl<'a> Decompressor<'a> {
    fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut data = BitReader::new(data);

        let first = data.read_int(4)? as u8;
        let second = data.read_int(4)? as u8;

        if first != second {
            return Err(DecodeError::WidthMismatch { first, second });
        }

        Ok(Self {
            data,
            width: first as usize,
        })
    }

    fn decompress(&mut self) -> Result<(Header, Vec<u8>), DecodeError> {
        let order_reversed = self.data.read_bit()?;

        let mut primary = plane::fill_plane(&mut self.data, self.width)?;

        let mode = Mode::read(&mut self.data)?;

        let mut secondary = plane::fill_plane(&mut self.data, self.width)?;

        let header = Header {
            width: self.width,
            order_reversed,
            mode,
        };

        debug!("decoding {header:?}");

        gray::decode(&mut primary, self.width);

        if mode != Mode::Delta {
            gray::decode(&mut secondary, self.width);
        }

        if mode != Mode::Independent {
            xor(&primary, &mut secondary);
        }

        let (low, high) = if order_reversed {
            (&secondary, &primary)
        } else {
            (&primary, &secondary)
        };

        let mut result = Vec::with_capacity(header.decompressed_len());

        for (a, b) in low.iter().zip(high.iter()) {
            result.push(*a);
            result.push(*b);
        }

        transpose::transpose_tiles(&mut result, self.width);

        Ok((header, result))
    }
}

fn xor(ram0: &[u8], ram1: &mut [u8]) {
    for (b, a) in ram1.iter_mut().zip(ram0) {
        *b ^= a;
    }
}

/// Decompress Pokemon Gen I sprite data into row-major 2bpp tiles
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    decompress_with_header(input).map(|(_, data)| data)
}

/// Like [`decompress`], also returning the header fields of the stream.
pub fn decompress_with_header(input: &[u8]) -> Result<(Header, Vec<u8>), DecodeError> {
    Decompressor::new(input)?.decompress()
}
