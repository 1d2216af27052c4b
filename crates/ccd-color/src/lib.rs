//! # ccd-color
//!
//! Color matrices and matrix resolution for the ccd chroma denoise pipeline.
//!
//! - [`ColorMatrix`] - Named RGB <-> luma/chroma matrices and their H.273 codes
//! - [`YccTransform`] - Numeric per-pixel transform built from a matrix
//! - [`resolve_matrix`] - Which matrix governs a given frame
//!
//! # Usage
//!
//! ```rust
//! use ccd_color::prelude::*;
//! use ccd_core::{FrameFormat, FrameProps};
//!
//! // A 640x480 YUV frame with no tag is treated as SD
//! let m = resolve_matrix(&FrameFormat::YUV420P8, None, &FrameProps::new(), 640, 480)?;
//! assert_eq!(m, ColorMatrix::St170m);
//!
//! let ycc = m.transform()?.forward([0.5, 0.5, 0.5]);
//! assert!((ycc[0] - 0.5).abs() < 1e-6);
//! # Ok::<(), ColorError>(())
//! ```
//!
//! # Features
//!
//! - `serde` - (De)serialize [`ColorMatrix`] from its short name

#![warn(missing_docs)]

pub mod error;
pub mod matrix;
pub mod resolve;
pub mod transfer;

pub use error::{ColorError, ColorResult};
pub use matrix::{ColorMatrix, YccTransform, MATRIX_TAG_TABLE};
pub use resolve::{default_for_resolution, matrix_from_props, resolve_matrix};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ColorError, ColorResult};
    pub use crate::matrix::{ColorMatrix, YccTransform};
    pub use crate::resolve::{default_for_resolution, resolve_matrix};
}
