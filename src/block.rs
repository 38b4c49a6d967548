//! Partitions a sample plane into 8x8 blocks (edge-replicated up to a
//! multiple of 8 in each dimension) and merges them back.

use crate::dct::{BLOCK_SIDE, BLOCK_SIZE};

/// Blocks in row-major order over the padded plane, plus enough to
/// reconstruct the original (unpadded) extent on merge.
pub struct BlockGrid {
    pub blocks_wide: usize,
    pub blocks_high: usize,
    pub width: usize,
    pub height: usize,
    pub blocks: Vec<[u8; BLOCK_SIZE]>,
}

fn round_up_to_multiple_of_8(v: usize) -> usize {
    (v + 7) / 8 * 8
}

/// Splits `plane` (`width` x `height`, row-major) into 8x8 blocks,
/// replicating the last row/column to pad up to a multiple of 8.
pub fn partition(plane: &[u8], width: usize, height: usize) -> BlockGrid {
    let padded_w = round_up_to_multiple_of_8(width);
    let padded_h = round_up_to_multiple_of_8(height);
    let blocks_wide = padded_w / BLOCK_SIDE;
    let blocks_high = padded_h / BLOCK_SIDE;

    let sample = |x: usize, y: usize| -> u8 {
        let cx = x.min(width - 1);
        let cy = y.min(height - 1);
        plane[cy * width + cx]
    };

    let mut blocks = Vec::with_capacity(blocks_wide * blocks_high);
    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let mut block = [0u8; BLOCK_SIZE];
            for i in 0..BLOCK_SIDE {
                for j in 0..BLOCK_SIDE {
                    block[i * BLOCK_SIDE + j] = sample(bx * BLOCK_SIDE + j, by * BLOCK_SIDE + i);
                }
            }
            blocks.push(block);
        }
    }

    BlockGrid {
        blocks_wide,
        blocks_high,
        width,
        height,
        blocks,
    }
}

/// Reassembles a padded block grid back into a `width` x `height` plane,
/// discarding the replicated padding.
pub fn merge(grid: &BlockGrid) -> Vec<u8> {
    let mut plane = vec![0u8; grid.width * grid.height];
    for by in 0..grid.blocks_high {
        for bx in 0..grid.blocks_wide {
            let block = &grid.blocks[by * grid.blocks_wide + bx];
            for i in 0..BLOCK_SIDE {
                let y = by * BLOCK_SIDE + i;
                if y >= grid.height {
                    continue;
                }
                for j in 0..BLOCK_SIDE {
                    let x = bx * BLOCK_SIDE + j;
                    if x >= grid.width {
                        continue;
                    }
                    plane[y * grid.width + x] = block[i * BLOCK_SIDE + j];
                }
            }
        }
    }
    plane
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_of_eight_roundtrips() {
        let mut plane = vec![0u8; 16 * 8];
        for (i, v) in plane.iter_mut().enumerate() {
            *v = (i % 256) as u8;
        }
        let grid = partition(&plane, 16, 8);
        assert_eq!(grid.blocks.len(), 2);
        assert_eq!(merge(&grid), plane);
    }

    #[test]
    fn non_multiple_pads_and_crops_back() {
        let mut plane = vec![0u8; 10 * 10];
        for (i, v) in plane.iter_mut().enumerate() {
            *v = (i % 256) as u8;
        }
        let grid = partition(&plane, 10, 10);
        assert_eq!(grid.blocks_wide, 2);
        assert_eq!(grid.blocks_high, 2);
        assert_eq!(merge(&grid), plane);
    }

    #[test]
    fn padding_replicates_edge_samples() {
        let plane = vec![42u8; 3 * 3];
        let grid = partition(&plane, 3, 3);
        let block = &grid.blocks[0];
        assert!(block.iter().all(|&v| v == 42));
    }
}
