//! Sample range and depth coding.
//!
//! Every plane is processed as normalized `f32`: luma and RGB nominally in
//! `[0, 1]`, chroma in `[-0.5, 0.5]`. [`Quant`] maps between those values
//! and stored code values.
//!
//! | Plane | Integer coding (b bits) |
//! |---|---|
//! | YUV/YCoCg luma, Gray | `16·2^(b-8) + 219·2^(b-8)·Y` |
//! | YUV/YCoCg chroma | `128·2^(b-8) + 224·2^(b-8)·C` |
//! | RGB, Other | `(2^b - 1)·V` |
//!
//! Float planes store the normalized value directly and are never clamped.
//! Integer planes are rounded and clamped to `[0, 2^b - 1]`.
//!
//! # Example
//!
//! ```rust
//! use ccd_core::FrameFormat;
//! use ccd_resample::range::Quant;
//!
//! let luma = Quant::for_plane(&FrameFormat::YUV420P8, 0);
//! assert_eq!(luma.encode(1.0), 235.0);
//! let chroma = Quant::for_plane(&FrameFormat::YUV420P10, 1);
//! assert_eq!(chroma.encode(0.0), 512.0);
//! ```

use ccd_core::{ColorFamily, FrameFormat, Plane, SampleType};
use half::f16;

/// Linear code-value mapping of one plane: `code = offset + scale * value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quant {
    /// Code value of normalized 0.
    pub offset: f32,
    /// Code value span of a normalized unit.
    pub scale: f32,
    /// Clamp ceiling; `None` for floats.
    pub peak: Option<f32>,
}

impl Quant {
    /// Identity coding of float planes.
    pub const FLOAT: Self = Self {
        offset: 0.0,
        scale: 1.0,
        peak: None,
    };

    /// Coding of plane `index` of `format`.
    pub fn for_plane(format: &FrameFormat, index: usize) -> Self {
        if format.sample_type() == SampleType::Float {
            return Self::FLOAT;
        }
        let bits = format.bits_per_sample() as i32;
        let step = 2f32.powi(bits - 8);
        let peak = Some(format.peak_value() as f32);
        match format.color_family() {
            ColorFamily::Rgb | ColorFamily::Other => Self {
                offset: 0.0,
                scale: format.peak_value() as f32,
                peak,
            },
            ColorFamily::Gray => Self {
                offset: 16.0 * step,
                scale: 219.0 * step,
                peak,
            },
            ColorFamily::Yuv | ColorFamily::YCoCg if index == 0 => Self {
                offset: 16.0 * step,
                scale: 219.0 * step,
                peak,
            },
            ColorFamily::Yuv | ColorFamily::YCoCg => Self {
                offset: 128.0 * step,
                scale: 224.0 * step,
                peak,
            },
        }
    }

    /// Code value to normalized value.
    #[inline]
    pub fn decode(&self, code: f32) -> f32 {
        (code - self.offset) / self.scale
    }

    /// Normalized value to code value, rounded and clamped for integers.
    #[inline]
    pub fn encode(&self, value: f32) -> f32 {
        let code = self.offset + self.scale * value;
        match self.peak {
            Some(peak) => code.round().clamp(0.0, peak),
            None => code,
        }
    }
}

/// Decodes plane `index` of a `format` frame to normalized `f32`.
pub fn decode_plane(plane: &Plane, format: &FrameFormat, index: usize) -> Vec<f32> {
    let quant = Quant::for_plane(format, index);
    let mut values = plane.to_f32_vec();
    if quant != Quant::FLOAT {
        values.iter_mut().for_each(|v| *v = quant.decode(*v));
    }
    values
}

/// Encodes normalized values into plane `index` of a `format` frame.
///
/// # Errors
///
/// Fails if `values.len() != width * height`.
pub fn encode_plane(
    values: &[f32],
    width: u32,
    height: u32,
    format: &FrameFormat,
    index: usize,
) -> ccd_core::Result<Plane> {
    let quant = Quant::for_plane(format, index);
    match (format.sample_type(), format.bits_per_sample()) {
        (SampleType::Float, 32) => Plane::from_f32(width, height, values.to_vec()),
        (SampleType::Float, _) => Plane::from_f16(
            width,
            height,
            values.iter().map(|&v| f16::from_f32(v)).collect(),
        ),
        (SampleType::Integer, 8) => Plane::from_u8(
            width,
            height,
            values.iter().map(|&v| quant.encode(v) as u8).collect(),
        ),
        (SampleType::Integer, _) => Plane::from_u16(
            width,
            height,
            values.iter().map(|&v| quant.encode(v) as u16).collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_limited_range_8bit() {
        let y = Quant::for_plane(&FrameFormat::YUV444P8, 0);
        assert_eq!(y.encode(0.0), 16.0);
        assert_eq!(y.encode(1.0), 235.0);
        let c = Quant::for_plane(&FrameFormat::YUV444P8, 2);
        assert_eq!(c.encode(-0.5), 16.0);
        assert_eq!(c.encode(0.5), 240.0);
        assert_eq!(Quant::for_plane(&FrameFormat::GRAY8, 0), y);
    }

    #[test]
    fn test_limited_range_scales_with_depth() {
        let y = Quant::for_plane(&FrameFormat::YUV420P10, 0);
        assert_eq!(y.encode(0.0), 64.0);
        assert_eq!(y.encode(1.0), 940.0);
        let y16 = Quant::for_plane(&FrameFormat::YUV444P16, 0);
        assert_eq!(y16.encode(1.0), 60160.0);
    }

    #[test]
    fn test_full_range_rgb() {
        let q = Quant::for_plane(&FrameFormat::RGB24, 1);
        assert_eq!(q.encode(1.0), 255.0);
        assert_eq!(q.encode(1.5), 255.0);
        assert_eq!(q.encode(-0.1), 0.0);
        assert_abs_diff_eq!(q.decode(51.0), 0.2);
    }

    #[test]
    fn test_float_unclamped() {
        let q = Quant::for_plane(&FrameFormat::RGBS, 0);
        assert_eq!(q.encode(1.5), 1.5);
        assert_eq!(q.encode(-0.25), -0.25);
    }

    #[test]
    fn test_plane_coding() {
        let fmt = FrameFormat::YUV420P10;
        let plane = encode_plane(&[0.0, 0.5, 1.0, 1.2], 2, 2, &fmt, 0).unwrap();
        assert_eq!(plane.as_u16().unwrap(), &[64, 502, 940, 1023]);
        let back = decode_plane(&plane, &fmt, 0);
        assert_abs_diff_eq!(back[1], 0.5, epsilon = 0.5 / 876.0);
    }
}
