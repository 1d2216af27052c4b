//! Error types for denoise kernels.

use ccd_core::FrameFormat;
use thiserror::Error;

/// Error type for denoise kernels.
#[derive(Error, Debug)]
pub enum DenoiseError {
    /// Input is not full-resolution 32-bit float RGB.
    #[error("input must be rgbs, got {format}")]
    NotRgbFloat {
        /// Rejected format.
        format: FrameFormat,
    },

    /// Threshold or kernel parameter out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frame smaller than the kernel allows.
    #[error("frame {width}x{height} is too small, need at least {min_width}x{min_height}")]
    FrameTooSmall {
        /// Frame width.
        width: u32,
        /// Frame height.
        height: u32,
        /// Minimum width.
        min_width: u32,
        /// Minimum height.
        min_height: u32,
    },

    /// Frame construction failed.
    #[error(transparent)]
    Core(#[from] ccd_core::Error),
}

/// Result type for denoise kernels.
pub type DenoiseResult<T> = Result<T, DenoiseError>;
