use core::f32::consts::{FRAC_1_SQRT_2, PI};

use crate::constants::{BLOCK_DIM, BLOCK_SIZE};
use crate::picture::{PackedPlane, Plane};

lazy_static! {
    /// COS_BASIS[x][k] = cos((2x + 1) * k * PI / 16), the shared basis
    /// of the forward and inverse transforms.
    static ref COS_BASIS: [[f32; BLOCK_DIM]; BLOCK_DIM] = {
        let mut out = [[0.0f32; BLOCK_DIM]; BLOCK_DIM];
        for x in 0..BLOCK_DIM {
            for k in 0..BLOCK_DIM {
                out[x][k] =
                    (((2 * x + 1) as f32) * (k as f32) * PI / (2.0 * BLOCK_DIM as f32)).cos();
            }
        }
        out
    };
}

fn normalization(k: usize) -> f32 {
    if k == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// Forward DCT-II of one 8x8 block. `input` is read at raster `stride`;
/// the output is the 64 coefficients in natural order.
pub fn forward_block(input: &[f32], stride: usize, output: &mut [f32; BLOCK_SIZE]) {
    let basis = &*COS_BASIS;
    for v in 0..BLOCK_DIM {
        for u in 0..BLOCK_DIM {
            let mut sum = 0.0f32;
            for y in 0..BLOCK_DIM {
                for x in 0..BLOCK_DIM {
                    sum += input[y * stride + x] * basis[x][u] * basis[y][v];
                }
            }
            output[v * BLOCK_DIM + u] = 0.25 * normalization(u) * normalization(v) * sum;
        }
    }
}

/// Inverse DCT of one 8x8 coefficient block, writing samples at raster
/// `stride`. The transpose of `forward_block`'s summation; the GPU
/// reconstruct shader evaluates the same sum once per output pixel.
pub fn inverse_block(input: &[f32; BLOCK_SIZE], output: &mut [f32], stride: usize) {
    let basis = &*COS_BASIS;
    for y in 0..BLOCK_DIM {
        for x in 0..BLOCK_DIM {
            let mut sum = 0.0f32;
            for v in 0..BLOCK_DIM {
                for u in 0..BLOCK_DIM {
                    sum += normalization(u)
                        * normalization(v)
                        * input[v * BLOCK_DIM + u]
                        * basis[x][u]
                        * basis[y][v];
                }
            }
            output[y * stride + x] = 0.25 * sum;
        }
    }
}

/// Transforms every block of a plane, reading samples at the raster
/// stride and writing each block's 64 coefficients contiguously in
/// raster block order (the packed layout the GPU path expects).
pub fn forward_plane(input: &Plane) -> PackedPlane {
    let width = input.width();
    let mut out = PackedPlane::zeroed(width, input.height());

    let mut p = 0;
    for by in (0..input.height()).step_by(BLOCK_DIM) {
        for bx in (0..width).step_by(BLOCK_DIM) {
            let mut block = [0.0f32; BLOCK_SIZE];
            forward_block(&input.data[by * width + bx..], width, &mut block);
            out.data[p..p + BLOCK_SIZE].copy_from_slice(&block);
            p += BLOCK_SIZE;
        }
    }
    out
}

/// Host-side inverse of `forward_plane`: unpacks each contiguous
/// 64-coefficient run back to its raster position.
pub fn inverse_plane(input: &PackedPlane) -> Plane {
    let width = input.width();
    let mut out = Plane {
        data: vec![0.0; width * input.height()],
        width,
        height: input.height(),
    };

    let mut p = 0;
    for by in (0..input.height()).step_by(BLOCK_DIM) {
        for bx in (0..width).step_by(BLOCK_DIM) {
            let mut block = [0.0f32; BLOCK_SIZE];
            block.copy_from_slice(&input.data[p..p + BLOCK_SIZE]);
            inverse_block(&block, &mut out.data[by * width + bx..], width);
            p += BLOCK_SIZE;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::picture::Plane;

    #[test]
    fn constant_block_has_dc_only() {
        let input = [0.5f32; BLOCK_SIZE];
        let mut coeffs = [0.0f32; BLOCK_SIZE];
        forward_block(&input, BLOCK_DIM, &mut coeffs);

        // DC = 0.25 * (1/sqrt(2))^2 * 64 * c = 8c.
        assert_abs_diff_eq!(coeffs[0], 4.0, epsilon = 1e-4);
        for &c in &coeffs[1..] {
            assert_abs_diff_eq!(c, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn block_round_trip() {
        let mut input = [0.0f32; BLOCK_SIZE];
        for (i, v) in input.iter_mut().enumerate() {
            *v = ((i * 7919) % 256) as f32 / 255.0;
        }

        let mut coeffs = [0.0f32; BLOCK_SIZE];
        forward_block(&input, BLOCK_DIM, &mut coeffs);

        let mut restored = [0.0f32; BLOCK_SIZE];
        inverse_block(&coeffs, &mut restored, BLOCK_DIM);

        for (a, b) in input.iter().zip(restored.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn plane_round_trip() {
        let plane = Plane::from_fn(128, 64, |x, y| ((x * 3 + y * 5) % 97) as f32 / 97.0).unwrap();

        let packed = forward_plane(&plane);
        assert_eq!(packed.num_blocks(), 128 * 64 / BLOCK_SIZE);

        let restored = inverse_plane(&packed);
        assert_eq!(restored.width(), plane.width());
        assert_eq!(restored.height(), plane.height());
        for (a, b) in plane.data().iter().zip(restored.data().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn packed_output_is_block_contiguous() {
        // A plane that is non-zero only inside the second block (x in
        // 8..16) must produce coefficients only in the second 64-run.
        let plane = Plane::from_fn(128, 8, |x, _| {
            if (8..16).contains(&x) {
                1.0
            } else {
                0.0
            }
        })
        .unwrap();

        let packed = forward_plane(&plane);
        for (i, &c) in packed.data().iter().enumerate() {
            if !(BLOCK_SIZE..2 * BLOCK_SIZE).contains(&i) {
                assert_abs_diff_eq!(c, 0.0, epsilon = 1e-4);
            }
        }
        // The second run carries the block's DC.
        assert_abs_diff_eq!(packed.data()[BLOCK_SIZE], 8.0, epsilon = 1e-3);
    }
}
