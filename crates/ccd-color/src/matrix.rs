//! Color transform matrices.
//!
//! [`ColorMatrix`] names the transform between gamma-encoded RGB and a
//! luma/chroma representation. [`YccTransform`] is the numeric form a
//! resampler applies per pixel.
//!
//! # Conventions
//!
//! Float RGB and luma are nominally `[0, 1]`, chroma `[-0.5, 0.5]`.
//! For the YCbCr matrices, with `Kg = 1 - Kr - Kb`:
//!
//! ```text
//! Y  = Kr*R + Kg*G + Kb*B
//! Cb = (B - Y) / (2 * (1 - Kb))
//! Cr = (R - Y) / (2 * (1 - Kr))
//! ```
//!
//! YCoCg planes are ordered Y, Co, Cg:
//!
//! ```text
//! Y  =  R/4 + G/2 + B/4
//! Co =  R/2       - B/2
//! Cg = -R/4 + G/2 - B/4
//! ```
//!
//! # Example
//!
//! ```rust
//! use ccd_color::ColorMatrix;
//!
//! let m: ColorMatrix = "709".parse().unwrap();
//! let t = m.transform().unwrap();
//! let ycc = t.forward([1.0, 1.0, 1.0]);
//! assert!((ycc[0] - 1.0).abs() < 1e-6); // white has full luma
//! assert!(ycc[1].abs() < 1e-6);         // and no chroma
//! ```

use crate::transfer::{bt2020_eotf, bt2020_oetf};
use crate::{ColorError, ColorResult};
use glam::{Mat3, Vec3};
use std::fmt;
use std::str::FromStr;

/// Matrix coefficients tag.
///
/// Opaque to the pipeline; only the resampler turns it into numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMatrix {
    /// ITU-R BT.709.
    Bt709,
    /// SMPTE 170M / ITU-R BT.601 (525-line).
    St170m,
    /// ITU-R BT.470 System B/G (BT.601 625-line).
    Bt470bg,
    /// SMPTE 240M.
    St240m,
    /// ITU-R BT.2020 non-constant luminance.
    Bt2020Ncl,
    /// ITU-R BT.2020 constant luminance.
    Bt2020Cl,
    /// YCoCg.
    YCoCg,
    /// Not specified; resolved by frame size before use.
    Unspecified,
}

/// Embedded tag code to matrix, as read from the `_Matrix` frame prop.
///
/// Codes follow ITU-T H.273. Only these codes are accepted from metadata.
pub static MATRIX_TAG_TABLE: &[(i64, ColorMatrix)] = &[
    (1, ColorMatrix::Bt709),
    (2, ColorMatrix::Unspecified),
    (5, ColorMatrix::Bt470bg),
    (6, ColorMatrix::St170m),
    (7, ColorMatrix::St240m),
    (9, ColorMatrix::Bt2020Ncl),
    (10, ColorMatrix::Bt2020Cl),
];

impl ColorMatrix {
    /// Every matrix, in tag-code order.
    pub const ALL: [ColorMatrix; 8] = [
        Self::Bt709,
        Self::Unspecified,
        Self::Bt470bg,
        Self::St170m,
        Self::St240m,
        Self::YCoCg,
        Self::Bt2020Ncl,
        Self::Bt2020Cl,
    ];

    /// Looks up an embedded tag code in [`MATRIX_TAG_TABLE`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use ccd_color::ColorMatrix;
    ///
    /// assert_eq!(ColorMatrix::from_tag(6), Some(ColorMatrix::St170m));
    /// assert_eq!(ColorMatrix::from_tag(3), None);
    /// ```
    pub fn from_tag(code: i64) -> Option<Self> {
        MATRIX_TAG_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, m)| *m)
    }

    /// ITU-T H.273 matrix coefficients code.
    pub const fn code(&self) -> i64 {
        match self {
            Self::Bt709 => 1,
            Self::Unspecified => 2,
            Self::Bt470bg => 5,
            Self::St170m => 6,
            Self::St240m => 7,
            Self::YCoCg => 8,
            Self::Bt2020Ncl => 9,
            Self::Bt2020Cl => 10,
        }
    }

    /// Short name, as accepted by [`FromStr`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bt709 => "709",
            Self::St170m => "170m",
            Self::Bt470bg => "470bg",
            Self::St240m => "240m",
            Self::Bt2020Ncl => "2020ncl",
            Self::Bt2020Cl => "2020cl",
            Self::YCoCg => "ycocg",
            Self::Unspecified => "unspec",
        }
    }

    /// `(Kr, Kb)` luma weights of the YCbCr matrices.
    ///
    /// `None` for YCoCg and Unspecified.
    pub const fn coefficients(&self) -> Option<(f32, f32)> {
        match self {
            Self::Bt709 => Some((0.2126, 0.0722)),
            Self::St170m | Self::Bt470bg => Some((0.299, 0.114)),
            Self::St240m => Some((0.212, 0.087)),
            Self::Bt2020Ncl | Self::Bt2020Cl => Some((0.2627, 0.0593)),
            Self::YCoCg | Self::Unspecified => None,
        }
    }

    /// Builds the numeric transform.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::NoCoefficients`] for [`ColorMatrix::Unspecified`].
    pub fn transform(&self) -> ColorResult<YccTransform> {
        match self {
            Self::Unspecified => Err(ColorError::NoCoefficients(self.name())),
            Self::YCoCg => Ok(YccTransform::linear(
                Mat3::from_cols_array_2d(&[
                    [0.25, 0.5, 0.25],
                    [0.5, 0.0, -0.5],
                    [-0.25, 0.5, -0.25],
                ])
                .transpose(),
                Mat3::from_cols_array_2d(&[
                    [1.0, 1.0, -1.0],
                    [1.0, 0.0, 1.0],
                    [1.0, -1.0, -1.0],
                ])
                .transpose(),
            )),
            Self::Bt2020Cl => Ok(YccTransform::ConstantLuminance {
                kr: 0.2627,
                kb: 0.0593,
            }),
            _ => {
                let (kr, kb) = self
                    .coefficients()
                    .ok_or(ColorError::NoCoefficients(self.name()))?;
                Ok(YccTransform::ycbcr(kr, kb))
            }
        }
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMatrix {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "709" | "bt709" => Ok(Self::Bt709),
            "170m" | "601" | "bt601" | "smpte170m" => Ok(Self::St170m),
            "470bg" | "bt470bg" => Ok(Self::Bt470bg),
            "240m" | "smpte240m" => Ok(Self::St240m),
            "2020ncl" | "bt2020ncl" => Ok(Self::Bt2020Ncl),
            "2020cl" | "bt2020cl" => Ok(Self::Bt2020Cl),
            "ycocg" | "ycgco" => Ok(Self::YCoCg),
            "unspec" | "unspecified" => Ok(Self::Unspecified),
            _ => Err(ColorError::UnknownMatrix(s.to_string())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ColorMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ColorMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Numeric RGB <-> luma/chroma transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YccTransform {
    /// Linear 3x3 transform applied to gamma-encoded values.
    Linear {
        /// RGB to Y/C1/C2.
        to_ycc: Mat3,
        /// Y/C1/C2 to RGB.
        to_rgb: Mat3,
    },
    /// BT.2020 constant luminance: luma is formed in linear light.
    ConstantLuminance {
        /// Red luma weight.
        kr: f32,
        /// Blue luma weight.
        kb: f32,
    },
}

impl YccTransform {
    fn linear(to_ycc: Mat3, to_rgb: Mat3) -> Self {
        Self::Linear { to_ycc, to_rgb }
    }

    /// YCbCr transform from luma weights.
    pub fn ycbcr(kr: f32, kb: f32) -> Self {
        let kg = 1.0 - kr - kb;
        let to_ycc = Mat3::from_cols_array_2d(&[
            [kr, kg, kb],
            [-0.5 * kr / (1.0 - kb), -0.5 * kg / (1.0 - kb), 0.5],
            [0.5, -0.5 * kg / (1.0 - kr), -0.5 * kb / (1.0 - kr)],
        ])
        .transpose();
        Self::linear(to_ycc, to_ycc.inverse())
    }

    /// RGB to `[Y, C1, C2]`.
    #[inline]
    pub fn forward(&self, rgb: [f32; 3]) -> [f32; 3] {
        match *self {
            Self::Linear { to_ycc, .. } => to_ycc.mul_vec3(Vec3::from_array(rgb)).to_array(),
            Self::ConstantLuminance { kr, kb } => cl_forward(rgb, kr, kb),
        }
    }

    /// `[Y, C1, C2]` to RGB.
    #[inline]
    pub fn inverse(&self, ycc: [f32; 3]) -> [f32; 3] {
        match *self {
            Self::Linear { to_rgb, .. } => to_rgb.mul_vec3(Vec3::from_array(ycc)).to_array(),
            Self::ConstantLuminance { kr, kb } => cl_inverse(ycc, kr, kb),
        }
    }

    /// Luma of an RGB triple.
    #[inline]
    pub fn luma(&self, rgb: [f32; 3]) -> f32 {
        match *self {
            Self::Linear { to_ycc, .. } => to_ycc.row(0).dot(Vec3::from_array(rgb)),
            Self::ConstantLuminance { kr, kb } => cl_luma(rgb, kr, kb),
        }
    }
}

// BT.2020 constant-luminance chroma scale factors (negative side, positive side).
const CL_CB: (f32, f32) = (1.9404, 1.5816);
const CL_CR: (f32, f32) = (1.7184, 0.9936);

fn cl_luma([r, g, b]: [f32; 3], kr: f32, kb: f32) -> f32 {
    let kg = 1.0 - kr - kb;
    bt2020_oetf(kr * bt2020_eotf(r) + kg * bt2020_eotf(g) + kb * bt2020_eotf(b))
}

fn cl_forward(rgb: [f32; 3], kr: f32, kb: f32) -> [f32; 3] {
    let y = cl_luma(rgb, kr, kb);
    let db = rgb[2] - y;
    let dr = rgb[0] - y;
    let cb = db / if db <= 0.0 { CL_CB.0 } else { CL_CB.1 };
    let cr = dr / if dr <= 0.0 { CL_CR.0 } else { CL_CR.1 };
    [y, cb, cr]
}

fn cl_inverse([y, cb, cr]: [f32; 3], kr: f32, kb: f32) -> [f32; 3] {
    let kg = 1.0 - kr - kb;
    let b = y + cb * if cb <= 0.0 { CL_CB.0 } else { CL_CB.1 };
    let r = y + cr * if cr <= 0.0 { CL_CR.0 } else { CL_CR.1 };
    let lin_g = (bt2020_eotf(y) - kr * bt2020_eotf(r) - kb * bt2020_eotf(b)) / kg;
    [r, bt2020_oetf(lin_g), b]
}
