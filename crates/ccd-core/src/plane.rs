//! Single-channel sample grids.
//!
//! A [`Plane`] is one 2D grid of samples stored row-major without padding.
//! Storage is typed ([`Samples`]) and reference counted, so handing a plane
//! from one frame to another never copies pixel data:
//!
//! ```rust
//! use ccd_core::Plane;
//!
//! let luma = Plane::from_u8(4, 2, vec![16; 8]).unwrap();
//! let shared = luma.clone();
//! assert!(luma.ptr_eq(&shared));
//! ```

use crate::{Error, FrameFormat, Result, SampleType};
use half::f16;
use std::sync::Arc;

/// Typed sample storage for a plane.
///
/// The variant follows the format's depth: 8-bit integers use `U8`,
/// 9 to 16-bit integers use `U16`, half floats `F16`, single floats `F32`.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 8-bit integer code values.
    U8(Arc<Vec<u8>>),
    /// 9 to 16-bit integer code values.
    U16(Arc<Vec<u16>>),
    /// Half-precision floats.
    F16(Arc<Vec<f16>>),
    /// Single-precision floats.
    F32(Arc<Vec<f32>>),
}

impl Samples {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::F16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    /// Returns `true` if there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind name for messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::F16(_) => "f16",
            Self::F32(_) => "f32",
        }
    }

    /// Whether this storage is the one `format` requires.
    pub fn fits(&self, format: &FrameFormat) -> bool {
        match (self, format.sample_type()) {
            (Self::U8(_), SampleType::Integer) => format.bits_per_sample() == 8,
            (Self::U16(_), SampleType::Integer) => format.bits_per_sample() > 8,
            (Self::F16(_), SampleType::Float) => format.bits_per_sample() == 16,
            (Self::F32(_), SampleType::Float) => format.bits_per_sample() == 32,
            _ => false,
        }
    }

    /// Zero-filled storage of `len` samples in the layout `format` requires.
    pub fn zeroed(format: &FrameFormat, len: usize) -> Self {
        match (format.sample_type(), format.bits_per_sample()) {
            (SampleType::Integer, 8) => Self::U8(Arc::new(vec![0; len])),
            (SampleType::Integer, _) => Self::U16(Arc::new(vec![0; len])),
            (SampleType::Float, 16) => Self::F16(Arc::new(vec![f16::ZERO; len])),
            (SampleType::Float, _) => Self::F32(Arc::new(vec![0.0; len])),
        }
    }

    /// Raw sample values widened to `f32`.
    ///
    /// Integer code values are returned unscaled (an 8-bit 235 stays 235.0).
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            Self::U8(v) => v.iter().map(|&s| s as f32).collect(),
            Self::U16(v) => v.iter().map(|&s| s as f32).collect(),
            Self::F16(v) => v.iter().map(|s| s.to_f32()).collect(),
            Self::F32(v) => v.as_ref().clone(),
        }
    }
}

/// One single-channel 2D grid of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: u32,
    height: u32,
    samples: Samples,
}

impl Plane {
    /// Creates a plane, checking the sample count against the dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if `samples.len() != width * height`.
    pub fn new(width: u32, height: u32, samples: Samples) -> Result<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(Error::invalid_format(format!(
                "{width}x{height} plane needs {expected} samples, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// 8-bit plane from owned data.
    pub fn from_u8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Samples::U8(Arc::new(data)))
    }

    /// 9 to 16-bit plane from owned data.
    pub fn from_u16(width: u32, height: u32, data: Vec<u16>) -> Result<Self> {
        Self::new(width, height, Samples::U16(Arc::new(data)))
    }

    /// Half float plane from owned data.
    pub fn from_f16(width: u32, height: u32, data: Vec<f16>) -> Result<Self> {
        Self::new(width, height, Samples::F16(Arc::new(data)))
    }

    /// Single float plane from owned data.
    pub fn from_f32(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        Self::new(width, height, Samples::F32(Arc::new(data)))
    }

    /// Zero-filled plane in the storage `format` requires.
    pub fn zeroed(format: &FrameFormat, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: Samples::zeroed(format, width as usize * height as usize),
        }
    }

    /// Plane width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Plane dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the plane has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Typed sample storage.
    #[inline]
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Raw sample values widened to `f32`.
    #[inline]
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.samples.to_f32_vec()
    }

    /// 8-bit samples, if stored that way.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.samples {
            Samples::U8(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// 16-bit samples, if stored that way.
    pub fn as_u16(&self) -> Option<&[u16]> {
        match &self.samples {
            Samples::U16(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Half float samples, if stored that way.
    pub fn as_f16(&self) -> Option<&[f16]> {
        match &self.samples {
            Samples::F16(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Single float samples, if stored that way.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.samples {
            Samples::F32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Whether two planes share the same underlying buffer.
    pub fn ptr_eq(&self, other: &Plane) -> bool {
        match (&self.samples, &other.samples) {
            (Samples::U8(a), Samples::U8(b)) => Arc::ptr_eq(a, b),
            (Samples::U16(a), Samples::U16(b)) => Arc::ptr_eq(a, b),
            (Samples::F16(a), Samples::F16(b)) => Arc::ptr_eq(a, b),
            (Samples::F32(a), Samples::F32(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
