//! BT.2020 transfer function.
//!
//! Only the constant-luminance matrix needs it: luma is formed from linear
//! light and re-encoded, so RGB has to be decoded first.
//!
//! # Range
//!
//! - Input/Output: [0, 1]; negative inputs are mirrored.
//!
//! # Reference
//!
//! ITU-R BT.2020-2, Table 4

const ALPHA: f32 = 1.099_296_8;
const BETA: f32 = 0.018_053_97;

/// BT.2020 OETF: encodes linear to BT.2020.
///
/// # Formula
///
/// ```text
/// if L < β:
///     V = 4.5 * L
/// else:
///     V = α * L^0.45 - (α - 1)
/// ```
#[inline]
pub fn bt2020_oetf(l: f32) -> f32 {
    if l < 0.0 {
        return -bt2020_oetf(-l);
    }
    if l < BETA {
        4.5 * l
    } else {
        ALPHA * l.powf(0.45) - (ALPHA - 1.0)
    }
}

/// Inverse of [`bt2020_oetf`].
#[inline]
pub fn bt2020_eotf(v: f32) -> f32 {
    if v < 0.0 {
        return -bt2020_eotf(-v);
    }
    if v < 4.5 * BETA {
        v / 4.5
    } else {
        ((v + (ALPHA - 1.0)) / ALPHA).powf(1.0 / 0.45)
    }
}
