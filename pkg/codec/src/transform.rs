//! Picture-level forward and inverse chains.
//!
//! The forward chain is what feeds the GPU: per channel, forward DCT
//! into the packed layout, quantize, then zigzag-reorder each block.
//! The inverse chain is a host-side mirror of the three GPU passes so
//! the whole round trip can be tested without a GL context.

use crate::dct;
use crate::picture::{PackedPicture, PackedPlane, Picture, Plane};
use crate::quantization::{self, QuantizationTable};
use crate::zigzag;

/// Forward DCT, quantize, zigzag. Returns freshly owned output; the
/// input picture is only read.
pub fn encode_picture(picture: &Picture, table: &QuantizationTable) -> PackedPicture {
    let encode = |plane: &Plane| -> PackedPlane {
        let coeffs = dct::forward_plane(plane);
        let quantized = quantization::quantize_plane(&coeffs, table);
        zigzag::zigzag_plane(&quantized)
    };

    PackedPicture {
        y: encode(&picture.y),
        u: encode(&picture.u),
        v: encode(&picture.v),
    }
}

/// Unzigzag, dequantize, inverse DCT: the same algebra the dequantize
/// and reconstruct shaders apply on the GPU.
pub fn decode_picture(packed: &PackedPicture, table: &QuantizationTable) -> Picture {
    let decode = |plane: &PackedPlane| -> Plane {
        let quantized = zigzag::unzigzag_plane(plane);
        let coeffs = quantization::dequantize_plane(&quantized, table);
        dct::inverse_plane(&coeffs)
    };

    Picture {
        y: decode(&packed.y),
        u: decode(&packed.u),
        v: decode(&packed.v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn max_rgb_error(a: &[[f32; 3]], b: &[[f32; 3]]) -> f32 {
        a.iter()
            .zip(b.iter())
            .flat_map(|(pa, pb)| pa.iter().zip(pb.iter()).map(|(x, y)| (x - y).abs()))
            .fold(0.0f32, f32::max)
    }

    fn mean_rgb_error(a: &[[f32; 3]], b: &[[f32; 3]]) -> f32 {
        let total: f32 = a
            .iter()
            .zip(b.iter())
            .flat_map(|(pa, pb)| pa.iter().zip(pb.iter()).map(|(x, y)| (x - y).abs()))
            .sum();
        total / (a.len() * 3) as f32
    }

    #[test]
    fn gradient_round_trip_with_lossless_table() {
        let picture = Picture::gradient(512, 512).unwrap();
        let table = QuantizationTable::lossless();

        let packed = encode_picture(&picture, &table);
        let decoded = decode_picture(&packed, &table);

        let expected = color::convert_picture(&picture);
        let actual = color::convert_picture(&decoded);

        // Worst case per coefficient is the 0.5 rounding step over the
        // 1/100 rescale; after the inverse transform that stays well
        // under a percent of full scale on average.
        let max_err = max_rgb_error(&expected, &actual);
        let mean_err = mean_rgb_error(&expected, &actual);
        assert!(max_err < 0.05, "lossless round trip max error: {}", max_err);
        assert!(
            mean_err < 0.005,
            "lossless round trip mean error: {}",
            mean_err
        );
    }

    #[test]
    fn coarse_table_is_visibly_lossy() {
        let picture = Picture::gradient(128, 128).unwrap();

        let lossless = QuantizationTable::lossless();
        let coarse = QuantizationTable::uniform(50.0).unwrap();

        let reference = color::convert_picture(&picture);

        let fine = color::convert_picture(&decode_picture(
            &encode_picture(&picture, &lossless),
            &lossless,
        ));
        let rough = color::convert_picture(&decode_picture(
            &encode_picture(&picture, &coarse),
            &coarse,
        ));

        let fine_err = max_rgb_error(&reference, &fine);
        let rough_err = max_rgb_error(&reference, &rough);

        // Halved coefficient precision has to show up in the output.
        assert!(rough_err > 0.02, "coarse table error suspiciously small: {}", rough_err);
        assert!(
            rough_err > 2.0 * fine_err,
            "coarse table ({}) not clearly worse than lossless ({})",
            rough_err,
            fine_err
        );
    }

    #[test]
    fn encode_leaves_input_untouched() {
        let picture = Picture::gradient(128, 64).unwrap();
        let copy = picture.y.clone();
        let table = QuantizationTable::lossless();
        let _ = encode_picture(&picture, &table);
        assert_eq!(picture.y, copy);
    }
}
