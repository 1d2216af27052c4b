//! # ccd-denoise
//!
//! RGB chroma denoise kernels for the ccd pipeline.
//!
//! - [`Denoiser`] - The kernel boundary the pipeline calls
//! - [`Ccd`] - Camcorder Color Denoise, a thresholded sparse-grid average
//!
//! # Usage
//!
//! ```rust
//! use ccd_core::{Frame, FrameFormat};
//! use ccd_denoise::{Ccd, CcdParams, Denoiser};
//!
//! let ccd = Ccd::new(CcdParams::square(13, 6))?;
//! let rgb = Frame::blank(FrameFormat::RGBS, 64, 64)?;
//! let out = ccd.denoise(&rgb, 8.0)?;
//! assert_eq!(out.dimensions(), (64, 64));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `serde` - (De)serialize [`CcdParams`]

#![warn(missing_docs)]

pub mod ccd;
pub mod denoiser;
pub mod error;

pub use ccd::{Ccd, CcdParams, DEFAULT_THRESHOLD, MIN_DIMENSION};
pub use denoiser::Denoiser;
pub use error::{DenoiseError, DenoiseResult};
