use crate::error::{DecodeError, LayoutError};
use crate::gen1;

/// Decompressed sizes of the sprites found in the games, with their pixel
/// dimensions.
pub const KNOWN_SIZES: [(usize, usize, usize); 3] = [(400, 40, 40), (576, 48, 48), (784, 56, 56)];

/// Pixel dimensions of a known sprite size.
pub fn dimensions_for(len: usize) -> Option<(usize, usize)> {
    KNOWN_SIZES
        .iter()
        .find(|(size, _, _)| *size == len)
        .map(|&(_, width, height)| (width, height))
}

/// A decoded square sprite in row-major 2bpp tiles.
///
/// Each tile row is a pair of bytes, low bit-plane first, with the leftmost
/// pixel in the most significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width_tiles: usize,
    data: Vec<u8>,
}

impl Sprite {
    pub fn decode(compressed: &[u8]) -> Result<Self, DecodeError> {
        let (header, data) = gen1::decompress_with_header(compressed)?;

        Ok(Self {
            width_tiles: header.width,
            data,
        })
    }

    pub fn from_2bpp(data: Vec<u8>) -> Result<Self, LayoutError> {
        let width_tiles = gen1::tile_width(data.len())?;

        Ok(Self { width_tiles, data })
    }

    pub fn width_tiles(&self) -> usize {
        self.width_tiles
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width_tiles * 8
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.width()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Palette index (0 to 3) of the pixel at `x`, `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }

        let tile = (y / 8) * self.width_tiles + x / 8;
        let row = tile * 16 + (y % 8) * 2;
        let bit = 7 - (x % 8);

        let lo = (self.data[row] >> bit) & 1;
        let hi = (self.data[row + 1] >> bit) & 1;

        Some(hi << 1 | lo)
    }

    /// Palette indices of every pixel, row by row.
    pub fn indices(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.width() * self.height());

        for y in 0..self.height() {
            for x in 0..self.width() {
                result.extend(self.pixel(x, y));
            }
        }

        result
    }
}
