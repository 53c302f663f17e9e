use crate::picture::Picture;

/// BT.601-style YUV to RGB with chroma already centered around zero.
///
/// No clamping: chroma-heavy inputs may leave the displayable range,
/// which is accepted behavior for this pipeline.
pub fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [f32; 3] {
    let r = y + 1.402 * v;
    let g = y - 0.344136 * u - 0.714136 * v;
    let b = y + 1.772 * u;
    [r, g, b]
}

/// Reference conversion of a whole picture, centering chroma samples by
/// subtracting 0.5. This is the ground truth the reconstructed GPU
/// output is compared against.
pub fn convert_picture(picture: &Picture) -> Vec<[f32; 3]> {
    picture
        .y
        .data()
        .iter()
        .zip(picture.u.data().iter())
        .zip(picture.v.data().iter())
        .map(|((&y, &u), &v)| yuv_to_rgb(y, u - 0.5, v - 0.5))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn neutral_chroma_is_grayscale() {
        let [r, g, b] = yuv_to_rgb(0.25, 0.0, 0.0);
        assert_abs_diff_eq!(r, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(g, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(b, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn chroma_coefficients() {
        let [r, _, b] = yuv_to_rgb(0.0, 0.5, 0.5);
        assert_abs_diff_eq!(r, 0.701, epsilon = 1e-6);
        assert_abs_diff_eq!(b, 0.886, epsilon = 1e-6);
    }
}
