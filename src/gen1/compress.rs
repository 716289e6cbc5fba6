use log::debug;

use super::{gray, plane, tile_width, transpose, xor, Mode};
use crate::bitstream::BitWriter;
use crate::error::LayoutError;

/// Compress row-major 2bpp sprite data into the Pokemon Gen I format
///
/// Every plane order and mode is tried and the shortest stream is kept.
pub fn compress(input: &[u8]) -> Result<Vec<u8>, LayoutError> {
    let width = tile_width(input.len())?;

    let mut best = (false, Mode::Independent, encode(input, width, false, Mode::Independent));

    for order_reversed in [false, true] {
        for mode in Mode::ALL {
            if (order_reversed, mode) == (false, Mode::Independent) {
                continue;
            }

            let stream = encode(input, width, order_reversed, mode);

            if stream.len() < best.2.len() {
                best = (order_reversed, mode, stream);
            }
        }
    }

    let (order_reversed, mode, stream) = best;

    debug!(
        "compressed {} bytes to {} (order_reversed: {order_reversed}, mode: {mode:?})",
        input.len(),
        stream.len()
    );

    Ok(stream)
}

/// Compress with a fixed plane order and mode.
pub fn compress_with(
    input: &[u8],
    order_reversed: bool,
    mode: Mode,
) -> Result<Vec<u8>, LayoutError> {
    let width = tile_width(input.len())?;

    Ok(encode(input, width, order_reversed, mode))
}

fn encode(input: &[u8], width: usize, order_reversed: bool, mode: Mode) -> Vec<u8> {
    let mut tiles = input.to_vec();
    transpose::transpose_tiles(&mut tiles, width);

    let low: Vec<u8> = tiles.iter().step_by(2).copied().collect();
    let high: Vec<u8> = tiles.iter().skip(1).step_by(2).copied().collect();

    let (mut primary, mut secondary) = if order_reversed {
        (high, low)
    } else {
        (low, high)
    };

    if mode != Mode::Independent {
        xor(&primary, &mut secondary);
    }

    if mode != Mode::Delta {
        gray::encode(&mut secondary, width);
    }

    gray::encode(&mut primary, width);

    let mut writer = BitWriter::new();

    writer.write_int(width, 4);
    writer.write_int(width, 4);
    writer.write_bit(order_reversed);

    plane::write_plane(&mut writer, &primary, width);
    mode.write(&mut writer);
    plane::write_plane(&mut writer, &secondary, width);

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen1::decompress;
    use rstest::rstest;

    #[test]
    fn ball() {
        let input = include_bytes!("../../fixtures/gen1/ball.2bpp");
        let expected = include_bytes!("../../fixtures/gen1/ball.pic");

        let actual = compress_with(input, false, Mode::Independent).unwrap();

        assert_eq!(actual, expected);
    }

    #[test]
    fn ring() {
        let input = include_bytes!("../../fixtures/gen1/ring.2bpp");
        let expected = include_bytes!("../../fixtures/gen1/ring.pic");

        let actual = compress_with(input, false, Mode::DecodedDelta).unwrap();

        assert_eq!(actual, expected);
    }

    #[test]
    fn badge() {
        let input = include_bytes!("../../fixtures/gen1/badge.2bpp");
        let expected = include_bytes!("../../fixtures/gen1/badge.pic");

        let actual = compress_with(input, true, Mode::Delta).unwrap();

        assert_eq!(actual, expected);
    }

    #[rstest]
    fn every_pair_decodes(
        #[values(false, true)] order_reversed: bool,
        #[values(Mode::Independent, Mode::Delta, Mode::DecodedDelta)] mode: Mode,
    ) {
        let input = include_bytes!("../../fixtures/gen1/ring.2bpp");

        let stream = compress_with(input, order_reversed, mode).unwrap();

        assert_eq!(decompress(&stream).unwrap(), input);
    }

    #[test]
    fn picks_shortest() {
        let input = include_bytes!("../../fixtures/gen1/badge.2bpp");

        let best = compress(input).unwrap();

        for order_reversed in [false, true] {
            for mode in Mode::ALL {
                let stream = compress_with(input, order_reversed, mode).unwrap();
                assert!(best.len() <= stream.len());
            }
        }

        assert_eq!(decompress(&best).unwrap(), input);
    }

    #[test]
    fn zero_width() {
        let stream = compress(&[]).unwrap();

        assert_eq!(decompress(&stream), Ok(Vec::new()));
    }

    #[rstest]
    #[case(17, LayoutError::NotSquare(17))]
    #[case(48, LayoutError::NotSquare(48))]
    #[case(16 * 16 * 16, LayoutError::TooWide(16))]
    fn rejects(#[case] len: usize, #[case] error: LayoutError) {
        assert_eq!(compress(&vec![0; len]), Err(error));
    }
}
