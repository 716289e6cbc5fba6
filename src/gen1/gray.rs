use super::TILESIZE;

#[rustfmt::skip]
const INV_XOR_TABLE: [[u8; 16]; 2] = [
    [0x0, 0x1, 0x3, 0x2, 0x7, 0x6, 0x4, 0x5, 0xf, 0xe, 0xc, 0xd, 0x8, 0x9, 0xb, 0xa],
    [0xf, 0xe, 0xc, 0xd, 0x8, 0x9, 0xb, 0xa, 0x0, 0x1, 0x3, 0x2, 0x7, 0x6, 0x4, 0x5], // prev ^ 0xf
];

/// Undoes the differential coding of a packed plane, in place.
///
/// Every pixel column is walked top to bottom with its own carry, which is
/// the low bit of the last decoded nibble.
pub(crate) fn decode(ram: &mut [u8], width: usize) {
    let plane_width = width * TILESIZE;

    for x in 0..plane_width {
        let mut bit = 0;
        for y in 0..width {
            let i = y * plane_width + x;

            let mut a = (ram[i] >> 4) & 0xf;
            let mut b = ram[i] & 0xf;

            a = INV_XOR_TABLE[bit as usize][a as usize];
            bit = a & 1;

            b = INV_XOR_TABLE[bit as usize][b as usize];
            bit = b & 1;

            ram[i] = (a << 4) | b;
        }
    }
}

/// Inverse of [`decode`] under the same column walk and carry.
pub(crate) fn encode(ram: &mut [u8], width: usize) {
    let plane_width = width * TILESIZE;

    for x in 0..plane_width {
        let mut bit = 0;
        for y in 0..width {
            let i = y * plane_width + x;

            let a = (ram[i] >> 4) & 0xf;
            let b = ram[i] & 0xf;

            let encoded_a = encode_nibble(a, bit);
            bit = a & 1;

            let encoded_b = encode_nibble(b, bit);
            bit = b & 1;

            ram[i] = (encoded_a << 4) | encoded_b;
        }
    }
}

fn encode_nibble(nibble: u8, carry: u8) -> u8 {
    (nibble ^ (nibble >> 1) ^ (carry << 3)) & 0xf
}
