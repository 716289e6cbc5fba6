use log::trace;

use super::TILESIZE;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::DecodeError;

/// Smallest run length encoded by each unary prefix length.
const RUN_BASE: [usize; 16] = [
    0x0001, 0x0003, 0x0007, 0x000f, 0x001f, 0x003f, 0x007f, 0x00ff, 0x01ff, 0x03ff, 0x07ff,
    0x0fff, 0x1fff, 0x3fff, 0x7fff, 0xffff,
];

const MAX_RUN_PREFIX: u32 = RUN_BASE.len() as u32;

/// Decodes one bit-plane into `width * width * 8` packed bytes.
///
/// The stream alternates between literal passes (non-zero 2-bit groups ended
/// by a `00` group) and zero runs. The decoded groups are stored four rows
/// interleaved, so they are regrouped column by column before packing four
/// groups into each byte.
pub(crate) fn fill_plane(data: &mut BitReader, width: usize) -> Result<Vec<u8>, DecodeError> {
    let plane_width = width * TILESIZE;
    let size = plane_width * width * 4;

    let mut literal = data.read_bit()?;
    let mut passes = 0;

    trace!("plane starts with a {} pass", if literal { "literal" } else { "run" });

    let mut interlaced = Vec::with_capacity(size);

    while interlaced.len() < size {
        if literal {
            while interlaced.len() < size {
                let bitgroup = data.read_int(2)? as u8;

                if bitgroup == 0 {
                    break;
                }

                interlaced.push(bitgroup);
            }
        } else {
            let prefix = data.read_unary(MAX_RUN_PREFIX)?;
            let run = RUN_BASE[prefix as usize] + data.read_int(prefix + 1)?;
            let run = run.min(size - interlaced.len());

            interlaced.resize(interlaced.len() + run, 0);
        }

        literal = !literal;
        passes += 1;
    }

    trace!("plane filled in {passes} passes");

    let mut plane = Vec::with_capacity(size / 4);

    for y in 0..width {
        for x in 0..plane_width {
            let group = |row: usize| interlaced[(y * 4 + row) * plane_width + x];

            plane.push(group(0) << 6 | group(1) << 4 | group(2) << 2 | group(3));
        }
    }

    Ok(plane)
}

/// Encodes a packed plane so that [`fill_plane`] reproduces it.
pub(crate) fn write_plane(writer: &mut BitWriter, plane: &[u8], width: usize) {
    let plane_width = width * TILESIZE;
    let size = plane.len() * 4;

    let mut interlaced = vec![0u8; size];

    for y in 0..width {
        for x in 0..plane_width {
            let byte = plane[y * plane_width + x];

            for row in 0..4 {
                interlaced[(y * 4 + row) * plane_width + x] = (byte >> (6 - row * 2)) & 0b11;
            }
        }
    }

    let mut literal = interlaced.first().is_some_and(|&group| group != 0);
    writer.write_bit(literal);

    let mut pos = 0;

    while pos < size {
        if literal {
            while pos < size && interlaced[pos] != 0 {
                writer.write_int(interlaced[pos] as usize, 2);
                pos += 1;
            }

            if pos < size {
                writer.write_int(0, 2);
            }
        } else {
            let run = interlaced[pos..].iter().take_while(|&&group| group == 0).count();

            write_run(writer, run);
            pos += run;
        }

        literal = !literal;
    }
}

fn write_run(writer: &mut BitWriter, run: usize) {
    debug_assert!(run > 0 && run <= RUN_BASE[15] * 2);

    // Prefix `p` covers RUN_BASE[p] ..= RUN_BASE[p] * 2.
    let prefix = usize::BITS - (run + 1).leading_zeros() - 2;

    for _ in 0..prefix {
        writer.write_bit(true);
    }

    writer.write_bit(false);
    writer.write_int(run - RUN_BASE[prefix as usize], prefix + 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(stream: &[u8], width: usize) -> Result<Vec<u8>, DecodeError> {
        fill_plane(&mut BitReader::new(stream), width)
    }

    #[test]
    fn single_run() {
        // run pass, prefix 1111 0, extra bits 00001: 31 + 1 = 32 zero groups
        assert_eq!(decode(&[0b0111_1000, 0b0010_0000], 1), Ok(vec![0; 8]));
    }

    #[test]
    fn groups_are_regrouped_by_column() {
        let mut writer = BitWriter::new();

        // literal 3, end of literals, run of 7, literal 2, end, run of 23
        writer.write_bit(true);
        writer.write_int(3, 2);
        writer.write_int(0, 2);
        writer.write_int(0b110, 3);
        writer.write_int(0b000, 3);
        writer.write_int(2, 2);
        writer.write_int(0, 2);
        writer.write_int(0b1110, 4);
        writer.write_int(23 - 15, 4);

        let plane = decode(&writer.finish(), 1).unwrap();

        assert_eq!(plane, [0b1110_0000, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn run_is_clamped_to_plane() {
        let mut writer = BitWriter::new();

        writer.write_bit(false);
        writer.write_int(0x7fff, 15);
        writer.write_bit(false);
        writer.write_int(0xffff, 16);

        assert_eq!(decode(&writer.finish(), 2), Ok(vec![0; 32]));
    }

    #[test]
    fn run_prefix_too_long() {
        let stream = [0b0111_1111, 0b1111_1111, 0b1000_0000];

        assert_eq!(decode(&stream, 1), Err(DecodeError::InvalidRunLength(16)));
    }

    #[test]
    fn literal_pass_runs_out_of_data() {
        assert_eq!(
            decode(&[0b1010_1010], 1),
            Err(DecodeError::OutOfData { bytes: 1 })
        );
    }

    #[test]
    fn empty_plane() {
        assert_eq!(decode(&[0], 0), Ok(Vec::new()));
    }

    #[test]
    fn write_then_fill() {
        let plane: Vec<u8> = (0..72u32).map(|i| (i * 37 % 11) as u8 * 23).collect();
        let mut writer = BitWriter::new();

        write_plane(&mut writer, &plane, 3);

        assert_eq!(decode(&writer.finish(), 3), Ok(plane));
    }

    #[test]
    fn run_codes() {
        let mut writer = BitWriter::new();

        write_run(&mut writer, 1);
        write_run(&mut writer, 2);
        write_run(&mut writer, 3);
        write_run(&mut writer, 32);

        let bits = writer.bit_len();
        let stream = writer.finish();
        let mut reader = BitReader::new(&stream);

        assert_eq!(bits, 2 + 2 + 4 + 10);

        for expected in [1, 2, 3, 32] {
            let prefix = reader.read_unary(MAX_RUN_PREFIX).unwrap();
            let run = RUN_BASE[prefix as usize] + reader.read_int(prefix + 1).unwrap();

            assert_eq!(run, expected);
        }
    }
}
