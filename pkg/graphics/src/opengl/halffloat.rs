//! Decoding of 16-bit half floats read back from coefficient surfaces.

/// Expands a packed half float (1 sign, 5 exponent, 10 mantissa bits)
/// to a 32-bit IEEE float, including subnormals, infinities and NaNs.
pub fn half_to_float(h: u16) -> f32 {
    let sign = ((h & 0x8000) as u32) << 16;
    let exponent = ((h & 0x7C00) >> 10) as u32;
    let mantissa = (h & 0x03FF) as u32;

    let bits = if exponent == 0 {
        if mantissa == 0 {
            // Signed zero.
            sign
        } else {
            // Subnormal: renormalize by shifting the mantissa up until
            // its implicit leading bit appears.
            let mut exp = 1i32;
            let mut mant = mantissa;
            while mant & 0x0400 == 0 {
                mant <<= 1;
                exp -= 1;
            }
            let exp = (exp + (127 - 15)) as u32;
            sign | (exp << 23) | ((mant & 0x03FF) << 13)
        }
    } else if exponent == 0x1F {
        // Infinity or NaN; the mantissa payload is preserved.
        sign | 0x7F80_0000 | (mantissa << 13)
    } else {
        sign | ((exponent + (127 - 15)) << 23) | (mantissa << 13)
    };

    f32::from_bits(bits)
}
