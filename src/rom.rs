//! Reading compressed sprites out of a ROM image.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::RomError;

/// Read up to `max_len` bytes starting at `start`.
///
/// When `stop` is not empty, reading ends right after the first occurrence of
/// that byte sequence, which is kept in the result. Hitting the end of the
/// input is not an error, the result is just shorter.
pub fn read_range<R: Read + Seek>(
    reader: &mut R,
    start: u64,
    max_len: usize,
    stop: &[u8],
) -> Result<Vec<u8>, RomError> {
    reader.seek(SeekFrom::Start(start))?;

    let mut result = Vec::new();

    for byte in reader.take(max_len as u64).bytes() {
        result.push(byte?);

        if !stop.is_empty() && result.ends_with(stop) {
            break;
        }
    }

    Ok(result)
}

/// [`read_range`] over a ROM file.
pub fn read_file_range<P: AsRef<Path>>(
    path: P,
    start: u64,
    max_len: usize,
    stop: &[u8],
) -> Result<Vec<u8>, RomError> {
    let mut reader = BufReader::new(File::open(path)?);

    read_range(&mut reader, start, max_len, stop)
}

/// Little-endian 16-bit value at `offset`, as used by the ROM pointer tables.
pub fn read_le16(data: &[u8], offset: usize) -> Result<u16, RomError> {
    offset
        .checked_add(2)
        .and_then(|end| data.get(offset..end))
        .map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
        .ok_or(RomError::OutOfRange {
            offset,
            len: data.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ROM: [u8; 10] = [0x00, 0x11, 0x22, 0x50, 0x33, 0x44, 0x50, 0x55, 0x66, 0x77];

    #[test]
    fn plain_range() {
        let data = read_range(&mut Cursor::new(ROM), 2, 4, &[]).unwrap();

        assert_eq!(data, [0x22, 0x50, 0x33, 0x44]);
    }

    #[test]
    fn stops_after_sequence() {
        let data = read_range(&mut Cursor::new(ROM), 1, 8, &[0x50]).unwrap();
        assert_eq!(data, [0x11, 0x22, 0x50]);

        let data = read_range(&mut Cursor::new(ROM), 0, 10, &[0x44, 0x50]).unwrap();
        assert_eq!(data, &ROM[..7]);
    }

    #[test]
    fn max_len_before_stop() {
        let data = read_range(&mut Cursor::new(ROM), 4, 2, &[0x50]).unwrap();

        assert_eq!(data, [0x33, 0x44]);
    }

    #[test]
    fn end_of_input() {
        assert_eq!(read_range(&mut Cursor::new(ROM), 8, 16, &[]).unwrap(), [0x66, 0x77]);
        assert!(read_range(&mut Cursor::new(ROM), 32, 16, &[]).unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let err = read_file_range("fixtures/does-not-exist.gb", 0, 16, &[]).unwrap_err();

        assert!(matches!(err, RomError::Io(_)));
    }

    #[test]
    fn little_endian() {
        assert_eq!(read_le16(&ROM, 1).unwrap(), 0x2211);
        assert_eq!(read_le16(&ROM, 8).unwrap(), 0x7766);
        assert!(matches!(
            read_le16(&ROM, 9),
            Err(RomError::OutOfRange { offset: 9, len: 10 })
        ));
        assert!(matches!(
            read_le16(&ROM, usize::MAX),
            Err(RomError::OutOfRange { .. })
        ));
    }
}
