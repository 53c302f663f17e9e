use crate::constants::BLOCK_SIZE;
use crate::picture::PackedPlane;

/// Zigzag permutation on block coefficients, printed in raster layout:
/// `ZIGZAG_ORDER[i]` is the source index copied into packed position
/// `i` when a block is reordered for transmission.
pub const ZIGZAG_ORDER: [usize; BLOCK_SIZE] = [
    0, 1, 5, 6, 14, 15, 27, 28, //
    2, 4, 7, 13, 16, 26, 29, 42, //
    3, 8, 12, 17, 25, 30, 41, 43, //
    9, 11, 18, 24, 31, 40, 44, 53, //
    10, 19, 23, 32, 39, 45, 52, 54, //
    20, 22, 33, 38, 46, 51, 55, 60, //
    21, 34, 37, 47, 50, 56, 59, 61, //
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// Inverse of `ZIGZAG_ORDER`: for a coefficient at natural position
/// `n`, `INVERSE_ZIGZAG_ORDER[n]` is where the reorder put it. The GPU
/// dequantize shader embeds this exact table to undo the reorder with
/// a per-texel fetch instead of an explicit permutation pass.
pub const INVERSE_ZIGZAG_ORDER: [usize; BLOCK_SIZE] = [
    0, 1, 8, 16, 9, 2, 3, 10, //
    17, 24, 32, 25, 18, 11, 4, 5, //
    12, 19, 26, 33, 40, 48, 41, 34, //
    27, 20, 13, 6, 7, 14, 21, 28, //
    35, 42, 49, 56, 57, 50, 43, 36, //
    29, 22, 15, 23, 30, 37, 44, 51, //
    58, 59, 52, 45, 38, 31, 39, 46, //
    53, 60, 61, 54, 47, 55, 62, 63,
];

pub fn zigzag_block(input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), BLOCK_SIZE);
    debug_assert_eq!(output.len(), BLOCK_SIZE);
    for i in 0..BLOCK_SIZE {
        output[i] = input[ZIGZAG_ORDER[i]];
    }
}

pub fn unzigzag_block(input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), BLOCK_SIZE);
    debug_assert_eq!(output.len(), BLOCK_SIZE);
    for i in 0..BLOCK_SIZE {
        output[ZIGZAG_ORDER[i]] = input[i];
    }
}

/// Reorders every block of a packed plane into zigzag scan order.
pub fn zigzag_plane(input: &PackedPlane) -> PackedPlane {
    let mut out = PackedPlane::zeroed(input.width(), input.height());
    for (block_in, block_out) in input
        .data
        .chunks_exact(BLOCK_SIZE)
        .zip(out.data.chunks_exact_mut(BLOCK_SIZE))
    {
        zigzag_block(block_in, block_out);
    }
    out
}

pub fn unzigzag_plane(input: &PackedPlane) -> PackedPlane {
    let mut out = PackedPlane::zeroed(input.width(), input.height());
    for (block_in, block_out) in input
        .data
        .chunks_exact(BLOCK_SIZE)
        .zip(out.data.chunks_exact_mut(BLOCK_SIZE))
    {
        unzigzag_block(block_in, block_out);
    }
    out
}
