//! GLSL sources for the three pass types. The dequantize fragment is
//! generated at runtime so the zigzag table and quantization scale are
//! spliced in from the `codec` crate: both sides of the pipeline read
//! the same constants.

use codec::quantization::QUANT_SCALE;
use codec::zigzag::INVERSE_ZIGZAG_ORDER;

pub const PASS_THROUGH_VERTEX: &str = r#"
#version 330

layout (location = 0) in vec2 pos;
layout (location = 1) in vec2 tex;

out vec2 tex_coord;

void main() {
    gl_Position = vec4(pos, 0.0, 1.0);
    tex_coord = tex;
}
"#;

/// Straight texture copy; the present pass.
pub const PRESENT_FRAGMENT: &str = r#"
#version 330

in vec2 tex_coord;
out vec4 frag_color;

uniform sampler2D rgb_tex;

void main() {
    frag_color = texture(rgb_tex, tex_coord);
}
"#;

/// Builds the dequantize fragment shader. Each output texel is one
/// coefficient in natural block order: the shader undoes the zigzag
/// reorder with an offset fetch inside the same 64-texel run, then
/// multiplies by its quantization factor over the shared scale.
pub fn dequantize_fragment_source() -> String {
    let table = INVERSE_ZIGZAG_ORDER
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
#version 330

out vec4 frag_color;

uniform sampler2D scan_coeffs;
uniform float quant_table[64];

const int inverse_zigzag[64] = int[64]({table});

void main() {{
    ivec2 out_pixel = ivec2(gl_FragCoord.xy);
    int k = out_pixel.x % 64;
    ivec2 src = ivec2(out_pixel.x - k + inverse_zigzag[k], out_pixel.y);
    float coeff = texelFetch(scan_coeffs, src, 0).r;
    frag_color = vec4(coeff * quant_table[k] / {scale:.1}, 0.0, 0.0, 1.0);
}}
"#,
        table = table,
        scale = QUANT_SCALE
    )
}

/// Per output pixel: locate the containing block's 64 coefficients in
/// each channel's packed texture (same addressing as
/// `codec::layout::PackedLayout`), run the inverse DCT, convert YUV to
/// RGB with chroma centering.
pub const RECONSTRUCT_FRAGMENT: &str = r#"
#version 330

out vec4 frag_color;

uniform sampler2D coeffs_y;
uniform sampler2D coeffs_u;
uniform sampler2D coeffs_v;

const float PI = 3.14159265358979323846;

float idct_term(float coeff, int x, int y, int xk, int yk) {
    float cu = (xk == 0) ? (1.0 / sqrt(2.0)) : 1.0;
    float cv = (yk == 0) ? (1.0 / sqrt(2.0)) : 1.0;
    return cu * cv * coeff
        * cos((PI * (2.0 * float(x) + 1.0) * float(xk)) / 16.0)
        * cos((PI * (2.0 * float(y) + 1.0) * float(yk)) / 16.0);
}

float inverse_dct(sampler2D coeffs, int column_base, int row, int x, int y) {
    float result = 0.0;
    for (int yk = 0; yk < 8; yk++) {
        for (int xk = 0; xk < 8; xk++) {
            float coeff = texelFetch(coeffs, ivec2(column_base + yk * 8 + xk, row), 0).r;
            result += idct_term(coeff, x, y, xk, yk);
        }
    }
    return result * 0.25;
}

vec4 yuv_to_rgb(float y, float u, float v) {
    float r = y + 1.402 * v;
    float g = y - 0.344136 * u - 0.714136 * v;
    float b = y + 1.772 * u;
    return vec4(r, g, b, 1.0);
}

void main() {
    ivec2 out_pixel = ivec2(gl_FragCoord.xy);
    int width = textureSize(coeffs_y, 0).x;

    // Packed block addressing: which 64-texel run holds this pixel's
    // block, and where inside the 8x8 block we are.
    int obpl = width / 8;
    int ibpl = width / 64;
    int block_index = (out_pixel.x / 8) + (out_pixel.y / 8) * obpl;
    int row = block_index / ibpl;
    int column_base = (block_index - row * ibpl) * 64;
    int x = out_pixel.x % 8;
    int y = out_pixel.y % 8;

    float py = inverse_dct(coeffs_y, column_base, row, x, y);
    float pu = inverse_dct(coeffs_u, column_base, row, x, y) - 0.5;
    float pv = inverse_dct(coeffs_v, column_base, row, x, y) - 0.5;
    frag_color = yuv_to_rgb(py, pu, pv);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequantize_source_embeds_the_full_table() {
        let src = dequantize_fragment_source();

        let start = src.find("int[64](").unwrap() + "int[64](".len();
        let end = start + src[start..].find(')').unwrap();
        let values: Vec<usize> = src[start..end]
            .split(',')
            .map(|s| s.trim().parse().unwrap())
            .collect();

        assert_eq!(&values[..], &INVERSE_ZIGZAG_ORDER[..]);
    }

    #[test]
    fn dequantize_source_embeds_the_scale() {
        let src = dequantize_fragment_source();
        assert!(src.contains("/ 100.0"));
    }

    #[test]
    fn sources_declare_expected_uniforms() {
        assert!(dequantize_fragment_source().contains("uniform sampler2D scan_coeffs"));
        assert!(dequantize_fragment_source().contains("uniform float quant_table[64]"));
        for name in &["coeffs_y", "coeffs_u", "coeffs_v"] {
            assert!(RECONSTRUCT_FRAGMENT.contains(&format!("uniform sampler2D {}", name)));
        }
        assert!(PRESENT_FRAGMENT.contains("uniform sampler2D rgb_tex"));
    }
}
