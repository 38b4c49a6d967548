//! Top-level encode/decode driver: wires color transform, subsampling,
//! block partitioning, the DCT, quantization and entropy coding into a
//! single marker-less bitstream.
//!
//! Blocks are *not* interleaved into MCUs. All luma blocks are coded
//! first, in row-major order, followed by the chroma blocks, with Cb
//! and Cr interleaved per grid cell. This is a deliberate departure
//! from JFIF's MCU interleaving and makes the stream non-interoperable
//! with a standard JPEG decoder.

use crate::bitstream::{BitReader, BitWriter};
use crate::block::{self, BlockGrid};
use crate::coding::{decode_block, encode_block, DcPredictor};
use crate::color::{self, RgbImage};
use crate::dct::{forward_dct, inverse_dct, level_shift, unlevel_shift, BLOCK_SIZE};
use crate::error::{ChannelPhase, Result};
use crate::quantization::{self, CHROMINANCE_TABLE, LUMINANCE_TABLE};
use crate::zigzag::{inverse_zigzag, zigzag};

/// A coded image: dimensions needed to reconstruct the block grids,
/// plus the entropy-coded payload.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: usize,
    pub height: usize,
    pub chroma_width: usize,
    pub chroma_height: usize,
    pub bytes: Vec<u8>,
}

fn round_up_to_multiple_of_8(v: usize) -> usize {
    (v + 7) / 8 * 8
}

fn encode_plane(plane: &[u8], width: usize, height: usize, table: &[u16; BLOCK_SIZE], quality_factor: f64, writer: &mut BitWriter) {
    let grid = block::partition(plane, width, height);
    let mut predictor = DcPredictor::new();
    for block in &grid.blocks {
        let shifted = level_shift(block);
        let coeffs = forward_dct(&shifted);
        let levels = quantization::quantize(&coeffs, table, quality_factor);
        let scan = zigzag(&levels);
        encode_block(&scan, &mut predictor, writer);
    }
}

/// Encodes an RGB image into the marker-less two-phase bitstream.
///
/// Dimension and quality-factor validation is the caller's
/// responsibility (the bitmap reader and CLI argument parsing reject
/// those at the boundary); encoding itself cannot fail.
pub fn encode(rgb: &RgbImage, quality_factor: f64) -> EncodedImage {
    let ycbcr = color::rgb_to_ycbcr(rgb);
    let sub = color::subsample_420(&ycbcr);

    let mut writer = BitWriter::new();

    encode_plane(&sub.y, sub.width, sub.height, &LUMINANCE_TABLE, quality_factor, &mut writer);

    let cb_grid = block::partition(&sub.cb, sub.chroma_width, sub.chroma_height);
    let cr_grid = block::partition(&sub.cr, sub.chroma_width, sub.chroma_height);
    let mut cb_pred = DcPredictor::new();
    let mut cr_pred = DcPredictor::new();
    for i in 0..cb_grid.blocks.len() {
        let shifted = level_shift(&cb_grid.blocks[i]);
        let coeffs = forward_dct(&shifted);
        let levels = quantization::quantize(&coeffs, &CHROMINANCE_TABLE, quality_factor);
        let scan = zigzag(&levels);
        encode_block(&scan, &mut cb_pred, &mut writer);

        let shifted = level_shift(&cr_grid.blocks[i]);
        let coeffs = forward_dct(&shifted);
        let levels = quantization::quantize(&coeffs, &CHROMINANCE_TABLE, quality_factor);
        let scan = zigzag(&levels);
        encode_block(&scan, &mut cr_pred, &mut writer);
    }

    EncodedImage {
        width: rgb.width,
        height: rgb.height,
        chroma_width: sub.chroma_width,
        chroma_height: sub.chroma_height,
        bytes: writer.into_bytes(),
    }
}

fn decode_plane(
    reader: &mut BitReader,
    width: usize,
    height: usize,
    table: &[u16; BLOCK_SIZE],
    quality_factor: f64,
    phase: ChannelPhase,
) -> Result<Vec<u8>> {
    let padded_w = round_up_to_multiple_of_8(width);
    let padded_h = round_up_to_multiple_of_8(height);
    let blocks_wide = padded_w / 8;
    let blocks_high = padded_h / 8;
    let mut predictor = DcPredictor::new();
    let mut blocks = Vec::with_capacity(blocks_wide * blocks_high);
    for _ in 0..blocks_wide * blocks_high {
        let scan = decode_block(&mut predictor, reader, phase)?;
        let levels = inverse_zigzag(&scan);
        let coeffs = quantization::dequantize(&levels, table, quality_factor);
        blocks.push(unlevel_shift(&inverse_dct(&coeffs)));
    }
    let grid = BlockGrid {
        blocks_wide,
        blocks_high,
        width,
        height,
        blocks,
    };
    Ok(block::merge(&grid))
}

/// Decodes a bitstream produced by [`encode`] back into an RGB image.
pub fn decode(encoded: &EncodedImage, quality_factor: f64) -> Result<RgbImage> {
    let mut reader = BitReader::new(&encoded.bytes);

    let y = decode_plane(
        &mut reader,
        encoded.width,
        encoded.height,
        &LUMINANCE_TABLE,
        quality_factor,
        ChannelPhase::Luminance,
    )?;

    let padded_cw = round_up_to_multiple_of_8(encoded.chroma_width);
    let padded_ch = round_up_to_multiple_of_8(encoded.chroma_height);
    let blocks_wide = padded_cw / 8;
    let blocks_high = padded_ch / 8;
    let mut cb_pred = DcPredictor::new();
    let mut cr_pred = DcPredictor::new();
    let mut cb_blocks = Vec::with_capacity(blocks_wide * blocks_high);
    let mut cr_blocks = Vec::with_capacity(blocks_wide * blocks_high);
    for _ in 0..blocks_wide * blocks_high {
        let scan = decode_block(&mut cb_pred, &mut reader, ChannelPhase::ChromaBlue)?;
        let levels = inverse_zigzag(&scan);
        let coeffs = quantization::dequantize(&levels, &CHROMINANCE_TABLE, quality_factor);
        cb_blocks.push(unlevel_shift(&inverse_dct(&coeffs)));

        let scan = decode_block(&mut cr_pred, &mut reader, ChannelPhase::ChromaRed)?;
        let levels = inverse_zigzag(&scan);
        let coeffs = quantization::dequantize(&levels, &CHROMINANCE_TABLE, quality_factor);
        cr_blocks.push(unlevel_shift(&inverse_dct(&coeffs)));
    }
    let cb = block::merge(&BlockGrid {
        blocks_wide,
        blocks_high,
        width: encoded.chroma_width,
        height: encoded.chroma_height,
        blocks: cb_blocks,
    });
    let cr = block::merge(&BlockGrid {
        blocks_wide,
        blocks_high,
        width: encoded.chroma_width,
        height: encoded.chroma_height,
        blocks: cr_blocks,
    });

    let sub = crate::color::YCbCrImage420 {
        width: encoded.width,
        height: encoded.height,
        chroma_width: encoded.chroma_width,
        chroma_height: encoded.chroma_height,
        y,
        cb,
        cr,
    };
    let full = color::upsample_420(&sub);
    Ok(color::ycbcr_to_rgb(&full))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: usize, height: usize) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 20u8 } else { 230u8 };
                img.r[y * width + x] = v;
                img.g[y * width + x] = 255 - v;
                img.b[y * width + x] = v / 2;
            }
        }
        img
    }

    #[test]
    fn flat_image_roundtrips_exactly_at_high_quality() {
        let mut img = RgbImage::new(16, 16);
        img.r.fill(100);
        img.g.fill(150);
        img.b.fill(200);
        let encoded = encode(&img, quantization::quality_factor(95));
        let decoded = decode(&encoded, quantization::quality_factor(95)).unwrap();
        assert_eq!(decoded.width, img.width);
        assert_eq!(decoded.height, img.height);
        for i in 0..img.r.len() {
            assert!((decoded.r[i] as i32 - img.r[i] as i32).abs() <= 2);
        }
    }

    #[test]
    fn checkerboard_roundtrips_within_lossy_tolerance() {
        let img = checkerboard(16, 16);
        let encoded = encode(&img, quantization::quality_factor(90));
        let decoded = decode(&encoded, quantization::quality_factor(90)).unwrap();
        assert_eq!(decoded.width, 16);
        assert_eq!(decoded.height, 16);
    }

    #[test]
    fn non_multiple_of_eight_dimensions_roundtrip() {
        let img = checkerboard(10, 6);
        let encoded = encode(&img, quantization::quality_factor(85));
        let decoded = decode(&encoded, quantization::quality_factor(85)).unwrap();
        assert_eq!(decoded.width, 10);
        assert_eq!(decoded.height, 6);
    }

    #[test]
    fn quality_one_hundred_is_a_small_nonzero_factor() {
        let img = checkerboard(8, 8);
        let quality_factor = quantization::quality_factor(100);
        assert!(quality_factor > 0.0 && quality_factor <= 0.01);
        let encoded = encode(&img, quality_factor);
        let decoded = decode(&encoded, quality_factor).unwrap();
        assert_eq!(decoded.width, 8);
        assert_eq!(decoded.height, 8);
    }
}
