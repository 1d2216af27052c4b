//! Error types for ccd-core operations.
//!
//! The [`Error`] enum covers every way a frame or format descriptor can be
//! malformed:
//! - Format descriptors that violate the family/subsampling/depth rules
//! - Planes whose dimensions or sample storage don't match their format
//! - Clips whose format or resolution is not known up front
//!
//! # Usage
//!
//! ```rust
//! use ccd_core::{Error, Result};
//!
//! fn check_even(width: u32) -> Result<()> {
//!     if width % 2 != 0 {
//!         return Err(Error::invalid_format(format!("width {width} is odd")));
//!     }
//!     Ok(())
//! }
//! assert!(check_even(3).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or inspecting frames.
///
/// # Categories
///
/// - **Input errors**: [`UnsupportedInput`](Error::UnsupportedInput)
/// - **Format errors**: [`InvalidFormat`](Error::InvalidFormat),
///   [`SampleTypeMismatch`](Error::SampleTypeMismatch)
/// - **Layout errors**: [`DimensionMismatch`](Error::DimensionMismatch),
///   [`PlaneCount`](Error::PlaneCount), [`PlaneIndex`](Error::PlaneIndex)
#[derive(Debug, Error)]
pub enum Error {
    /// Format or dimensions are not concretely known (variable clip).
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Format descriptor violates a family, subsampling or depth rule.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A plane's dimensions don't match what the frame format requires.
    #[error("plane {plane}: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        /// Plane index
        plane: usize,
        /// Required width
        expected_width: u32,
        /// Required height
        expected_height: u32,
        /// Actual width
        width: u32,
        /// Actual height
        height: u32,
    },

    /// Wrong number of planes for the color family.
    #[error("plane count mismatch: expected {expected}, got {got}")]
    PlaneCount {
        /// Planes required by the format
        expected: usize,
        /// Planes supplied
        got: usize,
    },

    /// Sample storage doesn't match the format's bit depth and sample type.
    #[error("plane {plane}: {storage} storage does not hold {format} samples")]
    SampleTypeMismatch {
        /// Plane index
        plane: usize,
        /// Storage kind found
        storage: &'static str,
        /// Format name
        format: String,
    },

    /// Plane index is out of range for a frame.
    #[error("plane index {index} out of range for {planes}-plane frame")]
    PlaneIndex {
        /// Requested index
        index: usize,
        /// Planes in the frame
        planes: usize,
    },
}

impl Error {
    /// Creates an [`Error::UnsupportedInput`] error.
    #[inline]
    pub fn unsupported_input(reason: impl Into<String>) -> Self {
        Self::UnsupportedInput(reason.into())
    }

    /// Creates an [`Error::InvalidFormat`] error.
    #[inline]
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat(reason.into())
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(plane: usize, expected: (u32, u32), got: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            plane,
            expected_width: expected.0,
            expected_height: expected.1,
            width: got.0,
            height: got.1,
        }
    }

    /// Returns `true` if the input was rejected as not concretely known.
    #[inline]
    pub fn is_unsupported_input(&self) -> bool {
        matches!(self, Self::UnsupportedInput(_))
    }

    /// Returns `true` if this is a plane layout error.
    #[inline]
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::PlaneCount { .. } | Self::PlaneIndex { .. }
        )
    }
}
