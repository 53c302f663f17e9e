//! The packed block layout contract shared by the CPU packer and the
//! GPU shaders.
//!
//! A WxH plane is split into 8x8 blocks in raster order. In the packed
//! texture each block's 64 coefficients occupy 64 consecutive texels on
//! one row; W/64 blocks fill a packed row before wrapping. The GPU
//! programs only do direct pixel addressing, so contiguity turns "the
//! k-th coefficient of this block" into a horizontal offset.

use anyhow::{bail, Result};

use crate::constants::{BLOCK_DIM, BLOCK_SIZE};

#[derive(Clone, Copy, Debug)]
pub struct PackedLayout {
    width: usize,
}

impl PackedLayout {
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 || width % BLOCK_SIZE != 0 {
            bail!(
                "Packed layout needs a width that is a positive multiple of {}, got {}",
                BLOCK_SIZE,
                width
            );
        }
        Ok(Self { width })
    }

    /// 8x8 blocks per image row.
    pub fn output_blocks_per_line(&self) -> usize {
        self.width / BLOCK_DIM
    }

    /// Packed blocks per texture row.
    pub fn input_blocks_per_line(&self) -> usize {
        self.width / BLOCK_SIZE
    }

    /// Raster index of the block containing output pixel (x, y).
    pub fn block_index(&self, x: usize, y: usize) -> usize {
        (x / BLOCK_DIM) + (y / BLOCK_DIM) * self.output_blocks_per_line()
    }

    /// Maps a block index to (packed row, first column of its 64-texel
    /// run). This is the one shared definition of the layout; the
    /// reconstruct shader evaluates the same arithmetic per pixel.
    pub fn block_index_to_packed_offset(&self, block_index: usize) -> (usize, usize) {
        let ibpl = self.input_blocks_per_line();
        let row = block_index / ibpl;
        let column_base = (block_index % ibpl) * BLOCK_SIZE;
        (row, column_base)
    }

    /// Packed (column, row) of coefficient (xk, yk) of the block that
    /// output pixel (x, y) belongs to.
    pub fn coefficient_position(
        &self,
        x: usize,
        y: usize,
        xk: usize,
        yk: usize,
    ) -> (usize, usize) {
        debug_assert!(xk < BLOCK_DIM && yk < BLOCK_DIM);
        let (row, column_base) = self.block_index_to_packed_offset(self.block_index(x, y));
        (column_base + yk * BLOCK_DIM + xk, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_widths() {
        assert!(PackedLayout::new(0).is_err());
        assert!(PackedLayout::new(72).is_err());
        assert!(PackedLayout::new(512).is_ok());
    }

    #[test]
    fn matches_linear_packing_offset() {
        // The CPU packer writes block gbi's coefficient (xk, yk) at
        // linear offset gbi*64 + yk*8 + xk; the 2D address must agree.
        let layout = PackedLayout::new(128).unwrap();
        for gbi in 0..(128 * 64 / BLOCK_SIZE) {
            let (row, column_base) = layout.block_index_to_packed_offset(gbi);
            for yk in 0..BLOCK_DIM {
                for xk in 0..BLOCK_DIM {
                    let linear = gbi * BLOCK_SIZE + yk * BLOCK_DIM + xk;
                    assert_eq!(row * 128 + column_base + yk * BLOCK_DIM + xk, linear);
                }
            }
        }
    }

    #[test]
    fn own_coefficient_addresses_form_a_bijection() {
        let (width, height) = (128, 64);
        let layout = PackedLayout::new(width).unwrap();

        let mut hit = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                let (col, row) =
                    layout.coefficient_position(x, y, x % BLOCK_DIM, y % BLOCK_DIM);
                assert!(col < width, "column {} out of range", col);
                assert!(row < height, "row {} out of range", row);
                let idx = row * width + col;
                assert!(!hit[idx], "two pixels map to packed texel {}", idx);
                hit[idx] = true;
            }
        }
        assert!(hit.iter().all(|&h| h));
    }

    #[test]
    fn neighboring_blocks_do_not_overlap() {
        let layout = PackedLayout::new(512).unwrap();
        let (row_a, col_a) = layout.block_index_to_packed_offset(7);
        let (row_b, col_b) = layout.block_index_to_packed_offset(8);
        // 512/64 = 8 blocks per packed row: block 8 wraps to row 1.
        assert_eq!((row_a, col_a), (0, 7 * BLOCK_SIZE));
        assert_eq!((row_b, col_b), (1, 0));
    }
}
