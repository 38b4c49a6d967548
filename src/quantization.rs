//! Fixed quantization tables and quality-scaled quantize/dequantize.

use crate::dct::BLOCK_SIZE;

/// Row 6 is `79, 64, 78, ...`, matching the reference table this crate
/// was modeled on exactly (not the commonly reprinted `49, 64, 78, ...`
/// variant).
#[rustfmt::skip]
pub const LUMINANCE_TABLE: [u16; BLOCK_SIZE] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    79, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

#[rustfmt::skip]
pub const CHROMINANCE_TABLE: [u16; BLOCK_SIZE] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// IJG-style quality-to-scale mapping, folded into the table lookup so
/// callers pass a single `quality_factor` through the whole pipeline.
pub fn quality_factor(quality: u32) -> f64 {
    let quality = quality.clamp(1, 100);
    let s = if quality < 50 {
        5000.0 / quality as f64
    } else {
        200.0 - 2.0 * quality as f64
    };
    // s lands on exactly 0 at quality 100. Used as a raw multiplicative
    // factor (unlike the per-entry table below, which clamps after
    // rounding) a literal zero would zero out every coefficient, so floor
    // it at the same minimum the per-entry table clamps to.
    s.max(1.0) / 100.0
}

fn scale_table(table: &[u16; BLOCK_SIZE], quality_factor: f64) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        out[i] = table[i] as f64 * quality_factor;
    }
    out
}

/// Scales a quantization table to a 1-100 quality level, the classic IJG
/// way: `(base * scale + 50) / 100`, clamped to `[1, 255]` per entry. This
/// is a standalone convenience for producing a literal 8x8 table; it is
/// not used by [`quantize`]/[`dequantize`], which divide by the raw
/// `quality_factor` scalar directly.
pub fn scaled_quant_table(table: &[u16; BLOCK_SIZE], quality: u32) -> [u16; BLOCK_SIZE] {
    let quality = quality.clamp(1, 100);
    let s = if quality < 50 { 5000 / quality } else { 200 - 2 * quality };
    let mut out = [0u16; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        let mut val = (table[i] as u32 * s + 50) / 100;
        if val == 0 {
            val = 1;
        }
        if val > 255 {
            val = 255;
        }
        out[i] = val as u16;
    }
    out
}

/// Rounds half away from zero and divides by `table[i] * quality_factor`.
pub fn quantize(coeffs: &[f64; BLOCK_SIZE], table: &[u16; BLOCK_SIZE], quality_factor: f64) -> [i32; BLOCK_SIZE] {
    let scaled = scale_table(table, quality_factor);
    let mut out = [0i32; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        let q = coeffs[i] / scaled[i];
        out[i] = if q >= 0.0 { (q + 0.5).floor() } else { (q - 0.5).ceil() } as i32;
    }
    out
}

pub fn dequantize(levels: &[i32; BLOCK_SIZE], table: &[u16; BLOCK_SIZE], quality_factor: f64) -> [f64; BLOCK_SIZE] {
    let scaled = scale_table(table, quality_factor);
    let mut out = [0.0; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        out[i] = levels[i] as f64 * scaled[i];
    }
    out
}
