//! Zig-zag scan order for flattening an 8x8 coefficient block.

use crate::dct::BLOCK_SIZE;

#[rustfmt::skip]
pub const ZIGZAG_ORDER: [usize; BLOCK_SIZE] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Reorders a row-major block into zig-zag scan order.
pub fn zigzag(block: &[i32; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
    let mut out = [0i32; BLOCK_SIZE];
    for (scan_pos, &src_pos) in ZIGZAG_ORDER.iter().enumerate() {
        out[scan_pos] = block[src_pos];
    }
    out
}

/// Inverse of [`zigzag`]: restores row-major order from a scan-ordered block.
pub fn inverse_zigzag(scan: &[i32; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
    let mut out = [0i32; BLOCK_SIZE];
    for (scan_pos, &src_pos) in ZIGZAG_ORDER.iter().enumerate() {
        out[src_pos] = scan[scan_pos];
    }
    out
}
