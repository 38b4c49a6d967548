//! Canonical JPEG DC/AC prefix tables and the AC prefix tree decoder.
//!
//! The bit patterns below are the ITU-T T.81 Annex K luminance tables,
//! transcribed bit-for-bit from the reference C implementation this crate
//! was modeled on (`huffman_ac_prefix`/`huffman_dc_prefix`).

use std::sync::OnceLock;

use crate::error::{ChannelPhase, CodecError, Result};

pub const MAX_RUN: usize = 16;
pub const MAX_CATEGORY: usize = 12;

/// DC category (0..=11) -> prefix code.
pub const DC_PREFIX: [&str; MAX_CATEGORY] = [
    "010", "011", "100", "00", "101", "110", "1110", "11110", "111110", "1111110", "11111110",
    "111111110",
];

/// AC (run, category) -> prefix code. `None` marks an unused cell.
/// (0,0) = EOB, (15,0) = ZRL.
#[rustfmt::skip]
pub const AC_PREFIX: [[Option<&str>; MAX_CATEGORY]; MAX_RUN] = [
    [Some("1010"), Some("00"), Some("01"), Some("100"), Some("1011"), Some("11010"), Some("111000"), Some("1111000"), Some("1111110110"), Some("1111111110000010"), Some("1111111110000011"), None],
    [None, Some("1100"), Some("111001"), Some("1111001"), Some("111110110"), Some("11111110110"), Some("1111111110000100"), Some("1111111110000101"), Some("1111111110000110"), Some("1111111110000111"), Some("1111111110001000"), None],
    [None, Some("11011"), Some("11111000"), Some("1111110111"), Some("1111111110001001"), Some("1111111110001010"), Some("1111111110001011"), Some("1111111110001100"), Some("1111111110001101"), Some("1111111110001110"), Some("1111111110001111"), None],
    [None, Some("111010"), Some("111110111"), Some("11111110111"), Some("1111111110010000"), Some("1111111110010001"), Some("1111111110010010"), Some("1111111110010011"), Some("1111111110010100"), Some("1111111110010101"), Some("1111111110010110"), None],
    [None, Some("111011"), Some("1111111000"), Some("1111111110010111"), Some("1111111110011000"), Some("1111111110011001"), Some("1111111110011010"), Some("1111111110011011"), Some("1111111110011100"), Some("1111111110011101"), Some("1111111110011110"), None],
    [None, Some("1111010"), Some("1111111001"), Some("1111111110011111"), Some("1111111110100000"), Some("1111111110100001"), Some("1111111110100010"), Some("1111111110100011"), Some("1111111110100100"), Some("1111111110100101"), Some("1111111110100110"), None],
    [None, Some("1111011"), Some("11111111000"), Some("1111111110100111"), Some("1111111110101000"), Some("1111111110101001"), Some("1111111110101010"), Some("1111111110101011"), Some("1111111110101100"), Some("1111111110101101"), Some("1111111110101110"), None],
    [None, Some("11111001"), Some("11111111001"), Some("1111111110101111"), Some("1111111110110000"), Some("1111111110110001"), Some("1111111110110010"), Some("1111111110110011"), Some("1111111110110100"), Some("1111111110110101"), Some("1111111110110110"), None],
    [None, Some("11111010"), Some("111111111000000"), Some("1111111110110111"), Some("1111111110111000"), Some("1111111110111001"), Some("1111111110111010"), Some("1111111110111011"), Some("1111111110111100"), Some("1111111110111101"), Some("1111111110111110"), None],
    [None, Some("111111000"), Some("1111111110111111"), Some("1111111111000000"), Some("1111111111000001"), Some("1111111111000010"), Some("1111111111000011"), Some("1111111111000100"), Some("1111111111000101"), Some("1111111111000110"), Some("1111111111000111"), None],
    [None, Some("111111001"), Some("1111111111001000"), Some("1111111111001001"), Some("1111111111001010"), Some("1111111111001011"), Some("1111111111001100"), Some("1111111111001101"), Some("1111111111001110"), Some("1111111111001111"), Some("1111111111010000"), None],
    [None, Some("111111010"), Some("1111111111010001"), Some("1111111111010010"), Some("1111111111010011"), Some("1111111111010100"), Some("1111111111010101"), Some("1111111111010110"), Some("1111111111010111"), Some("1111111111011000"), Some("1111111111011001"), None],
    [None, Some("1111111010"), Some("1111111111011010"), Some("1111111111011011"), Some("1111111111011100"), Some("1111111111011101"), Some("1111111111011110"), Some("1111111111011111"), Some("1111111111100000"), Some("1111111111100001"), Some("1111111111100010"), None],
    [None, Some("11111111010"), Some("1111111111100011"), Some("1111111111100100"), Some("1111111111100101"), Some("1111111111100110"), Some("1111111111100111"), Some("1111111111101000"), Some("1111111111101001"), Some("1111111111101010"), Some("1111111111101011"), None],
    [None, Some("111111110110"), Some("1111111111101100"), Some("1111111111101101"), Some("1111111111101110"), Some("1111111111101111"), Some("1111111111110000"), Some("1111111111110001"), Some("1111111111110010"), Some("1111111111110011"), Some("1111111111110100"), None],
    [Some("111111110111"), Some("1111111111110101"), Some("1111111111110110"), Some("1111111111110111"), Some("1111111111111000"), Some("1111111111111001"), Some("1111111111111010"), Some("1111111111111011"), Some("1111111111111100"), Some("1111111111111101"), Some("1111111111111110"), Some("1111111111111111")],
];

/// Category of a signed coefficient: `category(0) = 0`, else
/// `floor(log2(|v|)) + 1`.
pub fn category(v: i32) -> u8 {
    if v == 0 {
        return 0;
    }
    (32 - (v.unsigned_abs()).leading_zeros()) as u8
}

/// Category-width mantissa for a signed value: positive values stored
/// as-is, negatives as one's complement of the magnitude truncated to
/// `cat` bits.
pub fn mantissa_bits(v: i32, cat: u8) -> u32 {
    if cat == 0 {
        return 0;
    }
    let mask = (1u32 << cat) - 1;
    if v > 0 {
        v as u32
    } else {
        (!((-v) as u32)) & mask
    }
}

/// Reconstructs a signed value from a category-width mantissa.
pub fn decode_value(mantissa: u32, cat: u8) -> i32 {
    if cat == 0 {
        return 0;
    }
    let threshold = 1u32 << (cat - 1);
    if mantissa >= threshold {
        mantissa as i32
    } else {
        let mask = (1u32 << cat) - 1;
        -(((!mantissa) & mask) as i32)
    }
}

#[derive(Default)]
struct TreeNode {
    leaf: Option<(u8, u8)>,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn insert(&mut self, prefix: &str, run: u8, cat: u8) {
        let mut node = self;
        for c in prefix.chars() {
            node = match c {
                '0' => node.left.get_or_insert_with(|| Box::new(TreeNode::default())),
                _ => node.right.get_or_insert_with(|| Box::new(TreeNode::default())),
            };
        }
        node.leaf = Some((run, cat));
    }
}

/// Binary prefix tree for AC symbol decoding, built once from
/// [`AC_PREFIX`] and shared read-only thereafter.
pub struct HuffmanTree {
    root: TreeNode,
}

impl HuffmanTree {
    fn build() -> Self {
        let mut root = TreeNode::default();
        for (run, row) in AC_PREFIX.iter().enumerate() {
            for (cat, entry) in row.iter().enumerate() {
                if let Some(prefix) = entry {
                    root.insert(prefix, run as u8, cat as u8);
                }
            }
        }
        Self { root }
    }

    /// Walks bits from `reader` until a leaf is reached, returning
    /// `(run, category)`.
    pub fn decode(
        &self,
        reader: &mut crate::bitstream::BitReader,
        phase: ChannelPhase,
    ) -> Result<(u8, u8)> {
        let mut node = &self.root;
        loop {
            let bit = reader.read_bit(phase)?;
            node = match bit {
                0 => node.left.as_deref(),
                _ => node.right.as_deref(),
            }
            .ok_or(CodecError::BadPrefix {
                bit_offset: reader.bit_offset(),
                phase,
            })?;
            if let Some(leaf) = node.leaf {
                return Ok(leaf);
            }
        }
    }
}

static AC_TREE: OnceLock<HuffmanTree> = OnceLock::new();

pub fn ac_tree() -> &'static HuffmanTree {
    AC_TREE.get_or_init(HuffmanTree::build)
}

/// Reads bits one at a time, growing a prefix, until it matches a DC
/// category code. Fails if no match is found within 10 bits.
pub fn decode_dc_category(
    reader: &mut crate::bitstream::BitReader,
    phase: ChannelPhase,
) -> Result<u8> {
    let mut code = 0u32;
    for len in 1..=10u8 {
        let bit = reader.read_bit(phase)?;
        code = (code << 1) | bit as u32;
        for (cat, prefix) in DC_PREFIX.iter().enumerate() {
            if prefix.len() as u8 == len && u32::from_str_radix(prefix, 2).unwrap() == code {
                return Ok(cat as u8);
            }
        }
    }
    Err(CodecError::BadPrefix {
        bit_offset: reader.bit_offset(),
        phase,
    })
}
