//! Resampling kernels and single-plane resize.
//!
//! # Filters
//!
//! - [`Filter::Point`] - No interpolation, picks the covering sample
//! - [`Filter::Bilinear`] - Linear interpolation
//! - [`Filter::Bicubic`] - Two-parameter cubic family (Catmull-Rom by default)
//! - [`Filter::Lanczos3`] - Windowed sinc
//!
//! Sample positions are centered: destination pixel `x` maps to source
//! coordinate `(x + 0.5) * scale - 0.5`. For chroma planes this is center
//! siting, so a 4:2:0 chroma sample sits in the middle of its 2x2 luma block.
//!
//! # Example
//!
//! ```rust
//! use ccd_resample::filter::{resize_plane, Filter};
//!
//! let src = vec![0.5f32; 8 * 8];
//! let dst = resize_plane(&src, 8, 8, 16, 16, Filter::default()).unwrap();
//! assert_eq!(dst.len(), 16 * 16);
//! assert!((dst[17] - 0.5).abs() < 1e-6);
//! ```

use crate::{ResampleError, ResampleResult};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Nearest sample, no interpolation.
    Point,
    /// Triangle filter.
    Bilinear,
    /// Mitchell-Netravali cubic with parameters `b` and `c`.
    Bicubic {
        /// Blur parameter.
        b: f32,
        /// Ringing parameter.
        c: f32,
    },
    /// Lanczos with 3 lobes.
    Lanczos3,
}

impl Default for Filter {
    fn default() -> Self {
        Self::CATMULL_ROM
    }
}

impl Filter {
    /// Catmull-Rom spline (`b = 0, c = 0.5`).
    pub const CATMULL_ROM: Self = Self::Bicubic { b: 0.0, c: 0.5 };
    /// Mitchell-Netravali (`b = c = 1/3`).
    pub const MITCHELL: Self = Self::Bicubic {
        b: 1.0 / 3.0,
        c: 1.0 / 3.0,
    };

    /// Support radius at scale 1.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Point => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic { .. } => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Checks that the bicubic parameters are finite.
    pub fn validate(&self) -> ResampleResult<()> {
        match *self {
            Filter::Bicubic { b, c } if !(b.is_finite() && c.is_finite()) => {
                Err(ResampleError::InvalidFilter(self.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Evaluates the kernel at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match *self {
            Filter::Point => point_weight(x),
            Filter::Bilinear => bilinear_weight(x),
            Filter::Bicubic { b, c } => bicubic_weight(x, b, c),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Filter::Point => f.write_str("point"),
            Filter::Bilinear => f.write_str("bilinear"),
            Filter::Lanczos3 => f.write_str("lanczos3"),
            fl if fl == Self::CATMULL_ROM => f.write_str("bicubic"),
            fl if fl == Self::MITCHELL => f.write_str("mitchell"),
            Filter::Bicubic { b, c } => write!(f, "bicubic:{b}:{c}"),
        }
    }
}

impl FromStr for Filter {
    type Err = ResampleError;

    /// Parses `point`, `bilinear`, `bicubic`, `mitchell`, `lanczos3` or
    /// `bicubic:B:C`.
    fn from_str(s: &str) -> ResampleResult<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "point" | "nearest" => return Ok(Self::Point),
            "bilinear" => return Ok(Self::Bilinear),
            "bicubic" | "catmull-rom" => return Ok(Self::CATMULL_ROM),
            "mitchell" => return Ok(Self::MITCHELL),
            "lanczos3" | "lanczos" => return Ok(Self::Lanczos3),
            _ => {}
        }
        let unknown = || ResampleError::UnknownFilter(s.to_string());
        let params = name.strip_prefix("bicubic:").ok_or_else(unknown)?;
        let (b, c) = params.split_once(':').ok_or_else(unknown)?;
        let filter = Self::Bicubic {
            b: b.parse().map_err(|_| unknown())?,
            c: c.parse().map_err(|_| unknown())?,
        };
        filter.validate()?;
        Ok(filter)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Filter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Filter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[inline]
fn point_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

#[inline]
fn bicubic_weight(x: f32, b: f32, c: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * ax * ax * ax
            + (-18.0 + 12.0 * b + 6.0 * c) * ax * ax
            + (6.0 - 2.0 * b))
            / 6.0
    } else if ax < 2.0 {
        ((-b - 6.0 * c) * ax * ax * ax
            + (6.0 * b + 30.0 * c) * ax * ax
            + (-12.0 * b - 48.0 * c) * ax
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Normalized taps of one destination sample: first source index and weights.
#[derive(Debug, Clone)]
struct Taps {
    start: usize,
    weights: Vec<f32>,
}

/// Precomputes taps for a `src_len -> dst_len` resize along one axis.
fn taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;

    if filter == Filter::Point {
        return (0..dst_len)
            .map(|x| Taps {
                start: (((x as f32 + 0.5) * scale) as usize).min(src_len - 1),
                weights: vec![1.0],
            })
            .collect();
    }

    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    (0..dst_len)
        .map(|x| {
            let center = (x as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).max(0) as usize;
            let right = ((center + support).ceil() as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (left..=right)
                .map(|sx| filter.weight((sx as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();
            if sum.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
            }
            Taps {
                start: left,
                weights,
            }
        })
        .collect()
}

/// Resizes one plane of `f32` samples.
///
/// Separable: horizontal pass, then vertical. Rows are processed in
/// parallel. Same-size input is returned as a copy.
///
/// # Errors
///
/// Returns [`ResampleError::InvalidDimensions`] if `src` doesn't hold
/// `src_w * src_h` samples or any size is zero.
pub fn resize_plane(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> ResampleResult<Vec<f32>> {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return Err(ResampleError::InvalidDimensions(format!(
            "cannot resize {src_w}x{src_h} to {dst_w}x{dst_h}"
        )));
    }
    if src.len() != src_w * src_h {
        return Err(ResampleError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            src_w * src_h,
            src.len()
        )));
    }
    filter.validate()?;
    trace!(src_w, src_h, dst_w, dst_h, %filter, "resize_plane");

    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(src.to_vec());
    }

    let temp = if src_w == dst_w {
        src.to_vec()
    } else {
        resize_horizontal(src, src_w, dst_w, filter)
    };
    if src_h == dst_h {
        return Ok(temp);
    }
    Ok(resize_vertical(&temp, dst_w, src_h, dst_h, filter))
}

fn resize_horizontal(src: &[f32], src_w: usize, dst_w: usize, filter: Filter) -> Vec<f32> {
    let taps = taps(src_w, dst_w, filter);
    let rows = src.len() / src_w;
    let mut dst = vec![0.0f32; dst_w * rows];

    dst.par_chunks_mut(dst_w)
        .zip(src.par_chunks(src_w))
        .for_each(|(out, row)| {
            for (o, t) in out.iter_mut().zip(&taps) {
                *o = t
                    .weights
                    .iter()
                    .enumerate()
                    .map(|(k, w)| row[t.start + k] * w)
                    .sum();
            }
        });

    dst
}

fn resize_vertical(src: &[f32], width: usize, src_h: usize, dst_h: usize, filter: Filter) -> Vec<f32> {
    let taps = taps(src_h, dst_h, filter);
    let mut dst = vec![0.0f32; width * dst_h];

    dst.par_chunks_mut(width)
        .zip(taps.par_iter())
        .for_each(|(out, t)| {
            for (k, w) in t.weights.iter().enumerate() {
                let row = &src[(t.start + k) * width..(t.start + k + 1) * width];
                for (o, s) in out.iter_mut().zip(row) {
                    *o += s * w;
                }
            }
        });

    dst
}
