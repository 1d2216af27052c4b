//! # ccd
//!
//! Luma-preserving chroma denoise.
//!
//! Takes a frame in any RGB, YUV or YCoCg format, denoises its color in RGB
//! space, and returns a frame in exactly the input format whose luma plane
//! is the input's. The color matrix is taken from an override, the color
//! family, the frame's `_Matrix` tag or, failing those, the frame size.
//!
//! # Quick Start
//!
//! ```rust
//! use ccd_core::{Frame, FrameFormat, FrameProps, MATRIX_PROP};
//!
//! let frame = Frame::blank(FrameFormat::YUV420P10, 64, 64)?
//!     .with_props(FrameProps::new().with(MATRIX_PROP, 1));
//! let out = ccd::process(&frame, 4.0, None)?;
//! assert_eq!(out.format(), frame.format());
//! assert!(out.luma().unwrap().ptr_eq(frame.luma().unwrap()));
//! # Ok::<(), ccd::Error>(())
//! ```
//!
//! # Custom collaborators
//!
//! [`ChromaDenoise`] is generic over the [`Resampler`] and [`Denoiser`] it
//! drives; [`ccd_resample::CpuResampler`] and [`ccd_denoise::Ccd`] are the
//! defaults.
//!
//! # Modules
//!
//! - [`negotiate`] - To working RGB and back
//! - [`pipeline`] - The orchestrator
//! - [`config`] - YAML-loadable settings

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod negotiate;
pub mod pipeline;

pub use config::DenoiseConfig;
pub use error::{Error, Result};
pub use negotiate::{from_working_rgb, to_working_rgb, LumaSource};
pub use pipeline::{process, ChromaDenoise};

pub use ccd_color::ColorMatrix;
pub use ccd_denoise::{Denoiser, DEFAULT_THRESHOLD};
pub use ccd_resample::{Filter, Resampler};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{process, ChromaDenoise, DenoiseConfig, Error, Result};
    pub use ccd_color::ColorMatrix;
    pub use ccd_core::{Frame, FrameFormat, FrameProps, MATRIX_PROP};
    pub use ccd_denoise::Denoiser;
    pub use ccd_resample::{Filter, Resampler};
}
