//! Pipeline error type.
//!
//! Wraps the error of every stage so a caller can match on one enum. All
//! errors are fatal for the frame; no partial output is produced.

use ccd_color::ColorError;
use ccd_core::{ColorFamily, FrameFormat};
use ccd_denoise::DenoiseError;
use ccd_resample::ResampleError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the chroma denoise pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Variable format or resolution.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Reconstruction produced a different format than the input had.
    #[error("output format {got} does not match input format {expected}")]
    FormatDrift {
        /// Input format.
        expected: FrameFormat,
        /// Reconstructed format.
        got: FrameFormat,
    },

    /// The saved luma source doesn't belong to the target family.
    #[error("luma source does not fit a {family} target")]
    LumaSourceMismatch {
        /// Target family.
        family: ColorFamily,
    },

    /// Frame or format error.
    #[error(transparent)]
    Core(ccd_core::Error),

    /// Matrix resolution error.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Resampler error.
    #[error(transparent)]
    Resample(#[from] ResampleError),

    /// Denoiser error.
    #[error(transparent)]
    Denoise(#[from] DenoiseError),

    /// Config file missing.
    #[error("config file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML config parse error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ccd_core::Error> for Error {
    fn from(err: ccd_core::Error) -> Self {
        match err {
            ccd_core::Error::UnsupportedInput(reason) => Self::UnsupportedInput(reason),
            other => Self::Core(other),
        }
    }
}

impl Error {
    /// Returns `true` for variable-format or variable-size input.
    #[inline]
    pub fn is_unsupported_input(&self) -> bool {
        matches!(self, Self::UnsupportedInput(_))
    }

    /// Returns `true` for Gray and Other input.
    #[inline]
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::Color(ColorError::UnsupportedFormat { .. }))
    }

    /// Returns `true` for a bad or unknown embedded matrix tag.
    #[inline]
    pub fn is_matrix_tag_error(&self) -> bool {
        matches!(self, Self::Color(e) if e.is_tag_error())
    }
}
