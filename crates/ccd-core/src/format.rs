//! Frame format descriptors.
//!
//! A [`FrameFormat`] says how a frame's planes are laid out: which
//! [`ColorFamily`] they belong to, how far the chroma planes are downscaled,
//! and how each sample is stored.
//!
//! # Types
//!
//! - [`ColorFamily`] - RGB, YUV, YCoCg, Gray or Other
//! - [`SampleType`] - Integer or Float samples
//! - [`FrameFormat`] - The full immutable descriptor
//!
//! # Usage
//!
//! ```rust
//! use ccd_core::format::{ColorFamily, FrameFormat};
//!
//! let fmt: FrameFormat = "yuv420p10".parse().unwrap();
//! assert_eq!(fmt.color_family(), ColorFamily::Yuv);
//! assert_eq!(fmt.subsampling(), (1, 1));
//!
//! // Same depth, chroma at full resolution
//! let full = fmt.with_subsampling(0, 0).unwrap();
//! assert_eq!(full.to_string(), "yuv444p10");
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Largest supported log2 chroma downscale factor per axis.
pub const MAX_SUBSAMPLING: u8 = 2;

/// Color family of a frame.
///
/// The family fixes the meaning and number of planes:
///
/// | Family | Planes | Plane 0 |
/// |--------|--------|---------|
/// | `Rgb`  | R, G, B | red |
/// | `Yuv`  | Y, U, V | luma |
/// | `YCoCg`| Y, Co, Cg | luma |
/// | `Gray` | Y | luma |
/// | `Other`| 3 planes, no chroma semantics | - |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    /// Red, green, blue planes.
    Rgb,
    /// Luma plus two color-difference planes.
    Yuv,
    /// Luma plus orange and green chroma planes.
    YCoCg,
    /// Luma only.
    Gray,
    /// Anything without a chroma concept.
    Other,
}

impl ColorFamily {
    /// Number of planes a frame of this family carries.
    #[inline]
    pub const fn plane_count(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb | Self::Yuv | Self::YCoCg | Self::Other => 3,
        }
    }

    /// Whether planes 1 and 2 are color-difference planes that may be subsampled.
    #[inline]
    pub const fn has_chroma_planes(&self) -> bool {
        matches!(self, Self::Yuv | Self::YCoCg)
    }

    /// Whether plane 0 is a luma plane.
    #[inline]
    pub const fn has_luma(&self) -> bool {
        matches!(self, Self::Yuv | Self::YCoCg | Self::Gray)
    }

    /// Short lowercase name, used as the prefix of format names.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Yuv => "yuv",
            Self::YCoCg => "ycocg",
            Self::Gray => "gray",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a single sample is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// Unsigned integer code values.
    Integer,
    /// IEEE floating point.
    Float,
}

/// Immutable frame format descriptor.
///
/// Constructed through [`FrameFormat::new`], which enforces:
/// - subsampling is only non-zero for families with chroma planes
/// - subsampling is at most [`MAX_SUBSAMPLING`] per axis
/// - integer samples are 8 to 16 bits, float samples are 16 or 32 bits
///
/// # Example
///
/// ```rust
/// use ccd_core::format::{ColorFamily, FrameFormat, SampleType};
///
/// let fmt = FrameFormat::new(ColorFamily::Yuv, 1, 1, 8, SampleType::Integer).unwrap();
/// assert_eq!(fmt, FrameFormat::YUV420P8);
///
/// // RGB never has subsampling
/// assert!(FrameFormat::new(ColorFamily::Rgb, 1, 0, 8, SampleType::Integer).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    family: ColorFamily,
    subsampling_w: u8,
    subsampling_h: u8,
    bits_per_sample: u8,
    sample_type: SampleType,
}

impl FrameFormat {
    /// 32-bit float RGB, the only format the denoiser accepts.
    pub const RGBS: Self = Self::raw(ColorFamily::Rgb, 0, 0, 32, SampleType::Float);
    /// 16-bit half float RGB.
    pub const RGBH: Self = Self::raw(ColorFamily::Rgb, 0, 0, 16, SampleType::Float);
    /// 8-bit planar RGB.
    pub const RGB24: Self = Self::raw(ColorFamily::Rgb, 0, 0, 8, SampleType::Integer);
    /// 16-bit planar RGB.
    pub const RGB48: Self = Self::raw(ColorFamily::Rgb, 0, 0, 16, SampleType::Integer);
    /// 8-bit 4:2:0 YUV.
    pub const YUV420P8: Self = Self::raw(ColorFamily::Yuv, 1, 1, 8, SampleType::Integer);
    /// 10-bit 4:2:0 YUV.
    pub const YUV420P10: Self = Self::raw(ColorFamily::Yuv, 1, 1, 10, SampleType::Integer);
    /// 8-bit 4:2:2 YUV.
    pub const YUV422P8: Self = Self::raw(ColorFamily::Yuv, 1, 0, 8, SampleType::Integer);
    /// 8-bit 4:4:4 YUV.
    pub const YUV444P8: Self = Self::raw(ColorFamily::Yuv, 0, 0, 8, SampleType::Integer);
    /// 16-bit 4:4:4 YUV.
    pub const YUV444P16: Self = Self::raw(ColorFamily::Yuv, 0, 0, 16, SampleType::Integer);
    /// 32-bit float 4:4:4 YUV.
    pub const YUV444PS: Self = Self::raw(ColorFamily::Yuv, 0, 0, 32, SampleType::Float);
    /// 8-bit gray.
    pub const GRAY8: Self = Self::raw(ColorFamily::Gray, 0, 0, 8, SampleType::Integer);
    /// 32-bit float gray.
    pub const GRAYS: Self = Self::raw(ColorFamily::Gray, 0, 0, 32, SampleType::Float);

    const fn raw(
        family: ColorFamily,
        subsampling_w: u8,
        subsampling_h: u8,
        bits_per_sample: u8,
        sample_type: SampleType,
    ) -> Self {
        Self {
            family,
            subsampling_w,
            subsampling_h,
            bits_per_sample,
            sample_type,
        }
    }

    /// Creates a validated format descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the combination is not representable.
    pub fn new(
        family: ColorFamily,
        subsampling_w: u8,
        subsampling_h: u8,
        bits_per_sample: u8,
        sample_type: SampleType,
    ) -> Result<Self> {
        if !family.has_chroma_planes() && (subsampling_w != 0 || subsampling_h != 0) {
            return Err(Error::invalid_format(format!(
                "{family} frames cannot be subsampled"
            )));
        }
        if subsampling_w > MAX_SUBSAMPLING || subsampling_h > MAX_SUBSAMPLING {
            return Err(Error::invalid_format(format!(
                "subsampling {subsampling_w}x{subsampling_h} exceeds {MAX_SUBSAMPLING}"
            )));
        }
        let depth_ok = match sample_type {
            SampleType::Integer => (8..=16).contains(&bits_per_sample),
            SampleType::Float => bits_per_sample == 16 || bits_per_sample == 32,
        };
        if !depth_ok {
            return Err(Error::invalid_format(format!(
                "{bits_per_sample}-bit {sample_type:?} samples are not supported"
            )));
        }
        Ok(Self::raw(
            family,
            subsampling_w,
            subsampling_h,
            bits_per_sample,
            sample_type,
        ))
    }

    /// Color family.
    #[inline]
    pub const fn color_family(&self) -> ColorFamily {
        self.family
    }

    /// Log2 horizontal chroma downscale factor.
    #[inline]
    pub const fn subsampling_w(&self) -> u8 {
        self.subsampling_w
    }

    /// Log2 vertical chroma downscale factor.
    #[inline]
    pub const fn subsampling_h(&self) -> u8 {
        self.subsampling_h
    }

    /// Both subsampling factors as `(w, h)`.
    #[inline]
    pub const fn subsampling(&self) -> (u8, u8) {
        (self.subsampling_w, self.subsampling_h)
    }

    /// Whether chroma is stored below full resolution.
    #[inline]
    pub const fn is_subsampled(&self) -> bool {
        self.subsampling_w > 0 || self.subsampling_h > 0
    }

    /// Bits per sample.
    #[inline]
    pub const fn bits_per_sample(&self) -> u8 {
        self.bits_per_sample
    }

    /// Sample type.
    #[inline]
    pub const fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    /// Whether samples are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self.sample_type, SampleType::Float)
    }

    /// Number of planes.
    #[inline]
    pub const fn plane_count(&self) -> usize {
        self.family.plane_count()
    }

    /// Dimensions of plane `index` for a frame of `width`x`height`.
    #[inline]
    pub const fn plane_dimensions(&self, index: usize, width: u32, height: u32) -> (u32, u32) {
        if index == 0 || !self.family.has_chroma_planes() {
            (width, height)
        } else {
            (width >> self.subsampling_w, height >> self.subsampling_h)
        }
    }

    /// Largest representable integer code value (`2^bits - 1`), or 1 for floats.
    #[inline]
    pub const fn peak_value(&self) -> u32 {
        match self.sample_type {
            SampleType::Integer => (1u32 << self.bits_per_sample) - 1,
            SampleType::Float => 1,
        }
    }

    /// Copy with a different color family.
    ///
    /// Subsampling is reset to 0 when the new family has no chroma planes,
    /// like replacing the family on a 4:2:0 clip with RGB.
    pub fn with_family(&self, family: ColorFamily) -> Self {
        let (sw, sh) = if family.has_chroma_planes() {
            self.subsampling()
        } else {
            (0, 0)
        };
        Self::raw(family, sw, sh, self.bits_per_sample, self.sample_type)
    }

    /// Copy with different subsampling factors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the family cannot be subsampled that way.
    pub fn with_subsampling(&self, subsampling_w: u8, subsampling_h: u8) -> Result<Self> {
        Self::new(
            self.family,
            subsampling_w,
            subsampling_h,
            self.bits_per_sample,
            self.sample_type,
        )
    }

    /// Copy with a different sample depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for unsupported depths.
    pub fn with_depth(&self, bits_per_sample: u8, sample_type: SampleType) -> Result<Self> {
        Self::new(
            self.family,
            self.subsampling_w,
            self.subsampling_h,
            bits_per_sample,
            sample_type,
        )
    }

    /// Validates that `width`x`height` frames can carry this format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for zero sizes or sizes that are not
    /// a multiple of the chroma downscale factor.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_format(format!(
                "{width}x{height} frame has no pixels"
            )));
        }
        let mw = 1u32 << self.subsampling_w;
        let mh = 1u32 << self.subsampling_h;
        if width % mw != 0 || height % mh != 0 {
            return Err(Error::invalid_format(format!(
                "{width}x{height} is not divisible by the {self} chroma subsampling"
            )));
        }
        Ok(())
    }

    fn subsampling_name(&self) -> Option<&'static str> {
        Some(match (self.subsampling_w, self.subsampling_h) {
            (0, 0) => "444",
            (1, 0) => "422",
            (1, 1) => "420",
            (0, 1) => "440",
            (2, 0) => "411",
            (2, 2) => "410",
            _ => return None,
        })
    }
}

impl fmt::Display for FrameFormat {
    /// Canonical short name, e.g. `yuv420p8`, `rgbs`, `grayh`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = match self.sample_type {
            SampleType::Float if self.bits_per_sample == 32 => "s".to_string(),
            SampleType::Float => "h".to_string(),
            SampleType::Integer => self.bits_per_sample.to_string(),
        };
        match self.family {
            ColorFamily::Yuv | ColorFamily::YCoCg => match self.subsampling_name() {
                Some(ss) => write!(f, "{}{}p{}", self.family, ss, depth),
                None => write!(
                    f,
                    "{}p{}[{}x{}]",
                    self.family, depth, self.subsampling_w, self.subsampling_h
                ),
            },
            ColorFamily::Rgb | ColorFamily::Other if self.is_float() => {
                write!(f, "{}{}", self.family, depth)
            }
            ColorFamily::Rgb | ColorFamily::Other => write!(f, "{}p{}", self.family, depth),
            ColorFamily::Gray => write!(f, "gray{}", depth),
        }
    }
}

impl FromStr for FrameFormat {
    type Err = Error;

    /// Parses canonical names plus the `rgb24`/`rgb48` aliases.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "rgb24" => return Ok(Self::RGB24),
            "rgb48" => return Ok(Self::RGB48),
            _ => {}
        }

        let (family, rest) = if let Some(rest) = name.strip_prefix("ycocg") {
            (ColorFamily::YCoCg, rest)
        } else if let Some(rest) = name.strip_prefix("yuv") {
            (ColorFamily::Yuv, rest)
        } else if let Some(rest) = name.strip_prefix("rgb") {
            (ColorFamily::Rgb, rest)
        } else if let Some(rest) = name.strip_prefix("gray") {
            (ColorFamily::Gray, rest)
        } else {
            return Err(Error::invalid_format(format!("unknown format name '{s}'")));
        };

        let (sw, sh, rest) = if family.has_chroma_planes() {
            let ss = rest.get(..3).unwrap_or(rest);
            let rest = &rest[ss.len()..];
            let (sw, sh) = match ss {
                "444" => (0, 0),
                "422" => (1, 0),
                "420" => (1, 1),
                "440" => (0, 1),
                "411" => (2, 0),
                "410" => (2, 2),
                _ => {
                    return Err(Error::invalid_format(format!(
                        "unknown subsampling in format name '{s}'"
                    )));
                }
            };
            (sw, sh, rest)
        } else {
            (0, 0, rest)
        };

        let depth = rest.strip_prefix('p').unwrap_or(rest);
        let (bits, sample_type) = match depth {
            "s" => (32, SampleType::Float),
            "h" => (16, SampleType::Float),
            digits => {
                let bits = digits.parse::<u8>().map_err(|_| {
                    Error::invalid_format(format!("bad sample depth in format name '{s}'"))
                })?;
                (bits, SampleType::Integer)
            }
        };

        Self::new(family, sw, sh, bits, sample_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for fmt in [
            FrameFormat::RGBS,
            FrameFormat::RGBH,
            FrameFormat::RGB24,
            FrameFormat::RGB48,
            FrameFormat::YUV420P8,
            FrameFormat::YUV420P10,
            FrameFormat::YUV422P8,
            FrameFormat::YUV444P8,
            FrameFormat::YUV444P16,
            FrameFormat::YUV444PS,
            FrameFormat::GRAY8,
            FrameFormat::GRAYS,
        ] {
            let rebuilt = FrameFormat::new(
                fmt.color_family(),
                fmt.subsampling_w(),
                fmt.subsampling_h(),
                fmt.bits_per_sample(),
                fmt.sample_type(),
            )
            .unwrap();
            assert_eq!(rebuilt, fmt);
        }
    }

    #[test]
    fn test_rgb_and_gray_reject_subsampling() {
        assert!(FrameFormat::new(ColorFamily::Rgb, 1, 1, 8, SampleType::Integer).is_err());
        assert!(FrameFormat::new(ColorFamily::Gray, 0, 1, 8, SampleType::Integer).is_err());
        assert!(FrameFormat::new(ColorFamily::YCoCg, 1, 1, 8, SampleType::Integer).is_ok());
    }

    #[test]
    fn test_depth_rules() {
        assert!(FrameFormat::new(ColorFamily::Yuv, 0, 0, 7, SampleType::Integer).is_err());
        assert!(FrameFormat::new(ColorFamily::Yuv, 0, 0, 17, SampleType::Integer).is_err());
        assert!(FrameFormat::new(ColorFamily::Yuv, 0, 0, 24, SampleType::Float).is_err());
        assert!(FrameFormat::new(ColorFamily::Yuv, 0, 0, 12, SampleType::Integer).is_ok());
    }

    #[test]
    fn test_with_family_drops_subsampling() {
        let rgb = FrameFormat::YUV420P10.with_family(ColorFamily::Rgb);
        assert_eq!(rgb.subsampling(), (0, 0));
        assert_eq!(rgb.bits_per_sample(), 10);

        let ycocg = FrameFormat::YUV420P10.with_family(ColorFamily::YCoCg);
        assert_eq!(ycocg.subsampling(), (1, 1));
    }

    #[test]
    fn test_plane_dimensions() {
        let fmt = FrameFormat::YUV420P8;
        assert_eq!(fmt.plane_dimensions(0, 1920, 1080), (1920, 1080));
        assert_eq!(fmt.plane_dimensions(1, 1920, 1080), (960, 540));
        assert_eq!(FrameFormat::YUV422P8.plane_dimensions(2, 64, 32), (32, 32));
        assert_eq!(FrameFormat::RGB24.plane_dimensions(2, 64, 32), (64, 32));
    }

    #[test]
    fn test_check_dimensions() {
        assert!(FrameFormat::YUV420P8.check_dimensions(64, 48).is_ok());
        assert!(FrameFormat::YUV420P8.check_dimensions(63, 48).is_err());
        assert!(FrameFormat::RGB24.check_dimensions(63, 47).is_ok());
        assert!(FrameFormat::RGB24.check_dimensions(0, 47).is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for name in [
            "yuv420p8", "yuv422p10", "yuv444p16", "yuv444ps", "yuv444ph", "ycocg420p8",
            "rgbp8", "rgbp16", "rgbs", "rgbh", "gray8", "gray16", "grays", "grayh",
        ] {
            let fmt: FrameFormat = name.parse().unwrap();
            assert_eq!(fmt.to_string(), name);
        }
    }

    #[test]
    fn test_name_aliases_and_errors() {
        assert_eq!("RGB24".parse::<FrameFormat>().unwrap(), FrameFormat::RGB24);
        assert_eq!("rgb48".parse::<FrameFormat>().unwrap(), FrameFormat::RGB48);
        assert!("yuv421p8".parse::<FrameFormat>().is_err());
        assert!("cmyk8".parse::<FrameFormat>().is_err());
        assert!("yuv420px".parse::<FrameFormat>().is_err());
    }

    #[test]
    fn test_peak_value() {
        assert_eq!(FrameFormat::YUV420P8.peak_value(), 255);
        assert_eq!(FrameFormat::YUV420P10.peak_value(), 1023);
        assert_eq!(FrameFormat::RGBS.peak_value(), 1);
    }
}
