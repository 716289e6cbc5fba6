use super::{tile_width, TILE_BYTES};
use crate::error::LayoutError;

/// Transpose square Pokemon Gen I sprite data, in place
///
/// Decompressed planes come out column-major; this swaps tiles across the
/// diagonal to give row-major order. Applying it twice restores the input.
pub fn transpose(data: &mut [u8]) -> Result<(), LayoutError> {
    let width = tile_width(data.len())?;

    transpose_tiles(data, width);

    Ok(())
}

/// `data` must hold at least `width * width` tiles.
pub(crate) fn transpose_tiles(data: &mut [u8], width: usize) {
    let size = width * width;

    for i in 0..size {
        let j = (i * width + i / width) % size;

        if i < j {
            let (head, tail) = data.split_at_mut(j * TILE_BYTES);

            head[i * TILE_BYTES..(i + 1) * TILE_BYTES].swap_with_slice(&mut tail[..TILE_BYTES]);
        }
    }
}
