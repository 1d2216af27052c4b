//! # ccd-resample
//!
//! Format conversion for the ccd chroma denoise pipeline.
//!
//! The pipeline only ever talks to the [`Resampler`] trait. This crate
//! defines it and ships [`CpuResampler`], a reference implementation that
//! covers everything the pipeline asks for:
//!
//! - RGB <-> YUV/YCoCg through a [`ColorMatrix`](ccd_color::ColorMatrix)
//! - RGB and YUV/YCoCg -> Gray
//! - Depth and range changes (limited-range integer YUV, full-range RGB, floats)
//! - Chroma up/downsampling with a selectable [`Filter`], center sited
//!
//! # Usage
//!
//! ```rust
//! use ccd_color::ColorMatrix;
//! use ccd_core::{Frame, FrameFormat};
//! use ccd_resample::{ConvertOptions, CpuResampler, Filter, Resampler};
//!
//! let yuv = Frame::blank(FrameFormat::YUV420P8, 32, 32)?;
//!
//! // Upsample chroma, keep luma as is
//! let full = CpuResampler.convert(&yuv, &FrameFormat::YUV444P8, &ConvertOptions::new(Filter::Lanczos3))?;
//! assert!(full.luma().unwrap().ptr_eq(yuv.luma().unwrap()));
//!
//! // To float RGB
//! let opts = ConvertOptions::default().matrix_in(ColorMatrix::Bt709);
//! let rgb = CpuResampler.convert(&full, &FrameFormat::RGBS, &opts)?;
//! assert_eq!(rgb.dimensions(), (32, 32));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `serde` - (De)serialize [`Filter`] from its short name

#![warn(missing_docs)]

pub mod cpu;
pub mod error;
pub mod filter;
pub mod range;
pub mod resampler;

pub use cpu::CpuResampler;
pub use error::{ResampleError, ResampleResult};
pub use filter::{resize_plane, Filter};
pub use resampler::{ConvertOptions, Resampler};
