//! Error types for format conversion.

use ccd_core::FrameFormat;
use thiserror::Error;

/// Error type for format conversion.
#[derive(Error, Debug)]
pub enum ResampleError {
    /// A color conversion needs a matrix that was not given (or is `unspec`).
    #[error("missing {side} matrix for {from} -> {to}")]
    MissingMatrix {
        /// `"source"` or `"target"`.
        side: &'static str,
        /// Source format.
        from: FrameFormat,
        /// Target format.
        to: FrameFormat,
    },

    /// No conversion exists between these families.
    #[error("unsupported conversion {from} -> {to}")]
    UnsupportedConversion {
        /// Source format.
        from: FrameFormat,
        /// Target format.
        to: FrameFormat,
    },

    /// Bad plane or frame dimensions.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Unknown filter name.
    #[error("unknown filter '{0}' (expected point, bilinear, bicubic, mitchell, lanczos3 or bicubic:B:C)")]
    UnknownFilter(String),

    /// Filter parameters outside the usable range.
    #[error("invalid filter {0}: parameters must be finite")]
    InvalidFilter(String),

    /// Frame construction failed.
    #[error(transparent)]
    Core(#[from] ccd_core::Error),
}

/// Result type for format conversion.
pub type ResampleResult<T> = Result<T, ResampleError>;
