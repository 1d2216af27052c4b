//! Error types for matrix resolution.

use ccd_core::ColorFamily;
use thiserror::Error;

/// Matrix resolution error.
///
/// Every variant is fatal for the frame it was raised on. The tag errors tell
/// the caller to pass an explicit matrix instead of relying on inference.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Color family has no chroma to work on.
    #[error("unsupported format: only RGB, YUV and YCoCg input is supported, got {family}")]
    UnsupportedFormat {
        /// Rejected family.
        family: ColorFamily,
    },

    /// Embedded matrix tag has a code outside the known table.
    #[error("unrecognised _Matrix frame prop {code}, please specify the matrix manually")]
    UnrecognizedMatrixTag {
        /// Offending code.
        code: i64,
    },

    /// Embedded matrix tag exists but is not an integer.
    #[error("bad matrix tag: expected int, found {found}")]
    BadMetadataType {
        /// Type actually stored.
        found: &'static str,
    },

    /// Matrix name could not be parsed.
    #[error("unknown matrix '{0}' (expected 709, 170m, 470bg, 240m, 2020ncl, 2020cl, ycocg, unspec)")]
    UnknownMatrix(String),

    /// Matrix carries no coefficients (only `unspec`).
    #[error("matrix '{0}' has no coefficients")]
    NoCoefficients(&'static str),
}

impl ColorError {
    /// Returns `true` for errors about the embedded matrix tag.
    #[inline]
    pub fn is_tag_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedMatrixTag { .. } | Self::BadMetadataType { .. }
        )
    }
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
