use anyhow::{bail, Result};

use crate::constants::BLOCK_SIZE;
use crate::picture::PackedPlane;

/// Fixed scale applied during quantization and undone by the GPU
/// dequantize shader. The shader source splices in this exact value;
/// the two sides must never drift apart.
pub const QUANT_SCALE: f32 = 100.0;

/// 64 positive scale factors shared by every block of a plane pass.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantizationTable([f32; BLOCK_SIZE]);

impl QuantizationTable {
    pub fn new(factors: [f32; BLOCK_SIZE]) -> Result<Self> {
        for (i, &f) in factors.iter().enumerate() {
            if !(f > 0.0) || !f.is_finite() {
                bail!("Quantization factor {} at index {} is not positive", f, i);
            }
        }
        Ok(Self(factors))
    }

    /// The all-ones identity table; round trips are lossless up to the
    /// rounding step.
    pub fn lossless() -> Self {
        Self([1.0; BLOCK_SIZE])
    }

    /// A table with every factor equal to `factor`.
    pub fn uniform(factor: f32) -> Result<Self> {
        Self::new([factor; BLOCK_SIZE])
    }

    pub fn factors(&self) -> &[f32; BLOCK_SIZE] {
        &self.0
    }
}

pub fn quantize_block(table: &QuantizationTable, input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), BLOCK_SIZE);
    debug_assert_eq!(output.len(), BLOCK_SIZE);
    for i in 0..BLOCK_SIZE {
        output[i] = (input[i] * QUANT_SCALE / table.0[i]).round();
    }
}

/// Algebraic inverse of `quantize_block` (minus the rounding); the same
/// arithmetic the dequantize shader performs per texel.
pub fn dequantize_block(table: &QuantizationTable, input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), BLOCK_SIZE);
    debug_assert_eq!(output.len(), BLOCK_SIZE);
    for i in 0..BLOCK_SIZE {
        output[i] = input[i] * table.0[i] / QUANT_SCALE;
    }
}

pub fn quantize_plane(input: &PackedPlane, table: &QuantizationTable) -> PackedPlane {
    let mut out = PackedPlane::zeroed(input.width(), input.height());
    for (block_in, block_out) in input
        .data()
        .chunks_exact(BLOCK_SIZE)
        .zip(out.data.chunks_exact_mut(BLOCK_SIZE))
    {
        quantize_block(table, block_in, block_out);
    }
    out
}

pub fn dequantize_plane(input: &PackedPlane, table: &QuantizationTable) -> PackedPlane {
    let mut out = PackedPlane::zeroed(input.width(), input.height());
    for (block_in, block_out) in input
        .data()
        .chunks_exact(BLOCK_SIZE)
        .zip(out.data.chunks_exact_mut(BLOCK_SIZE))
    {
        dequantize_block(table, block_in, block_out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_factors() {
        let mut factors = [1.0f32; BLOCK_SIZE];
        factors[12] = 0.0;
        assert!(QuantizationTable::new(factors).is_err());
        factors[12] = -3.0;
        assert!(QuantizationTable::new(factors).is_err());
    }

    #[test]
    fn lossless_round_trip_within_rounding() {
        let table = QuantizationTable::lossless();

        let mut block = [0.0f32; BLOCK_SIZE];
        for (i, v) in block.iter_mut().enumerate() {
            *v = (i as f32) * 0.37 - 11.0;
        }

        let mut quantized = [0.0f32; BLOCK_SIZE];
        quantize_block(&table, &block, &mut quantized);

        let mut restored = [0.0f32; BLOCK_SIZE];
        dequantize_block(&table, &quantized, &mut restored);

        // round() moves each coefficient by at most 0.5 before the
        // 1/100 rescale.
        for (a, b) in block.iter().zip(restored.iter()) {
            assert!((a - b).abs() <= 0.5 / QUANT_SCALE + 1e-6);
        }
    }

    #[test]
    fn uniform_table_actually_quantizes() {
        let table = QuantizationTable::uniform(50.0).unwrap();

        let block = [0.126f32; BLOCK_SIZE];
        let mut quantized = [0.0f32; BLOCK_SIZE];
        quantize_block(&table, &block, &mut quantized);
        // 0.126 * 100 / 50 = 0.252 rounds to 0: the coefficient is
        // dropped entirely at this precision.
        assert_eq!(quantized[0], 0.0);

        let mut restored = [0.0f32; BLOCK_SIZE];
        dequantize_block(&table, &quantized, &mut restored);
        assert!((restored[0] - block[0]).abs() > 0.1);
    }
}
