use std::io;
use thiserror::Error;

/// Reasons a compressed sprite stream can fail to decode.
///
/// None of these are recoverable for the image being decoded: the stream is
/// either corrupt or not in this format.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The two 4-bit width fields of the header disagree.
    #[error("header width fields disagree ({first} != {second})")]
    WidthMismatch { first: u8, second: u8 },

    /// A run length used a unary prefix of 16 bits or more.
    #[error("run length prefix of {0} bits exceeds the 15 bit limit")]
    InvalidRunLength(u32),

    /// The bit stream ended before the image was complete.
    #[error("compressed stream of {bytes} bytes ended before the image was complete")]
    OutOfData { bytes: usize },
}

/// A 2bpp buffer that does not describe a square sprite of at most 15x15 tiles.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{0} bytes is not a square number of 16 byte tiles")]
    NotSquare(usize),
    #[error("sprite is {0} tiles wide, the format allows at most 15")]
    TooWide(usize),
}

#[derive(Debug, Error)]
pub enum RomError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("offset {offset} is out of range for {len} bytes of ROM data")]
    OutOfRange { offset: usize, len: usize },
}
