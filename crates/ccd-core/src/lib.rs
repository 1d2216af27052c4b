//! # ccd-core
//!
//! Core frame types for the ccd chroma denoise pipeline.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - [`FrameFormat`], [`ColorFamily`], [`SampleType`] - Format descriptors
//! - [`Plane`], [`Samples`] - Typed, reference-counted sample grids
//! - [`Frame`] - Immutable, validated set of planes with metadata
//! - [`FrameProps`], [`PropValue`] - Per-frame side-channel metadata
//! - [`VideoInfo`] - Clip-level format/size that may be variable
//! - [`combine_planes`] - Plane assembly across frames
//!
//! ## Design Philosophy
//!
//! Frames are values. Nothing in the pipeline mutates a frame in place; every
//! step builds a new one, and untouched planes are shared by reference so a
//! preserved plane is literally the same buffer:
//!
//! ```rust
//! use ccd_core::{combine_planes, ColorFamily, Frame, FrameFormat};
//!
//! let original = Frame::blank(FrameFormat::YUV444P16, 16, 16).unwrap();
//! let processed = Frame::blank(FrameFormat::YUV444P16, 16, 16).unwrap();
//! let out = combine_planes(
//!     &[(&original, 0), (&processed, 1), (&processed, 2)],
//!     ColorFamily::Yuv,
//! ).unwrap();
//! assert!(out.luma().unwrap().ptr_eq(original.luma().unwrap()));
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! ccd-core (this crate)
//!    ^
//!    +-- ccd-color (matrices, matrix resolution)
//!    +-- ccd-resample (format conversion)
//!    +-- ccd-denoise (RGB denoise kernel)
//!    +-- ccd (pipeline)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod frame;
pub mod plane;
pub mod props;

pub use error::*;
pub use format::{ColorFamily, FrameFormat, SampleType};
pub use frame::{combine_planes, Frame, VideoInfo};
pub use plane::{Plane, Samples};
pub use props::{FrameProps, PropValue, MATRIX_PROP};

/// Prelude module for convenient imports.
///
/// ```
/// use ccd_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{ColorFamily, FrameFormat, SampleType};
    pub use crate::frame::{combine_planes, Frame, VideoInfo};
    pub use crate::plane::{Plane, Samples};
    pub use crate::props::{FrameProps, PropValue, MATRIX_PROP};
}
