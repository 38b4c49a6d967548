//! DC differential and AC run-length entropy coding of one zig-zag
//! scanned coefficient block.

use crate::bitstream::{BitReader, BitWriter};
use crate::dct::BLOCK_SIZE;
use crate::error::{ChannelPhase, CodecError, Result};
use crate::huffman::{self, ac_tree, category, decode_dc_category, decode_value, mantissa_bits, DC_PREFIX};

/// Tracks the previous block's DC coefficient for differential coding.
/// One instance per channel (Y, Cb, Cr).
#[derive(Debug, Default, Clone, Copy)]
pub struct DcPredictor {
    previous: i32,
}

impl DcPredictor {
    pub fn new() -> Self {
        Self { previous: 0 }
    }
}

/// Encodes one zig-zag ordered block: DC diff, then AC run-length
/// coded coefficients terminated by EOB (or nothing, if the last
/// coefficient is non-zero).
pub fn encode_block(scan: &[i32; BLOCK_SIZE], predictor: &mut DcPredictor, writer: &mut BitWriter) {
    let dc = scan[0];
    let diff = dc - predictor.previous;
    predictor.previous = dc;

    let dc_cat = category(diff);
    writer.write_bits_str(DC_PREFIX[dc_cat as usize]);
    if dc_cat > 0 {
        writer.write_bits_int(mantissa_bits(diff, dc_cat), dc_cat);
    }

    let mut zero_run = 0u8;
    let mut last_nonzero = 0usize;
    for (i, &v) in scan.iter().enumerate().skip(1) {
        if v != 0 {
            last_nonzero = i;
        }
    }

    for &v in scan.iter().take(last_nonzero + 1).skip(1) {
        if v == 0 {
            zero_run += 1;
            if zero_run == 16 {
                writer.write_bits_str(huffman::AC_PREFIX[15][0].unwrap());
                zero_run = 0;
            }
            continue;
        }
        let cat = category(v);
        writer.write_bits_str(huffman::AC_PREFIX[zero_run as usize][cat as usize].unwrap());
        writer.write_bits_int(mantissa_bits(v, cat), cat);
        zero_run = 0;
    }

    if last_nonzero < BLOCK_SIZE - 1 {
        writer.write_bits_str(huffman::AC_PREFIX[0][0].unwrap());
    }
}

/// Decodes one zig-zag ordered block, reversing [`encode_block`].
pub fn decode_block(
    predictor: &mut DcPredictor,
    reader: &mut BitReader,
    phase: ChannelPhase,
) -> Result<[i32; BLOCK_SIZE]> {
    let mut scan = [0i32; BLOCK_SIZE];

    let dc_cat = decode_dc_category(reader, phase)?;
    let diff = if dc_cat > 0 {
        let bits = reader.read_bits(dc_cat, phase)?;
        decode_value(bits, dc_cat)
    } else {
        0
    };
    let dc = predictor.previous + diff;
    predictor.previous = dc;
    scan[0] = dc;

    let tree = ac_tree();
    let mut p = 1usize;
    while p < BLOCK_SIZE {
        let (run, cat) = tree.decode(reader, phase)?;
        if run == 0 && cat == 0 {
            break; // EOB
        }
        if run == 15 && cat == 0 {
            p += 16;
            continue;
        }
        p += run as usize;
        if p >= BLOCK_SIZE {
            return Err(CodecError::OverflowPosition { p, phase });
        }
        let bits = reader.read_bits(cat, phase)?;
        scan[p] = decode_value(bits, cat);
        p += 1;
    }

    Ok(scan)
}
