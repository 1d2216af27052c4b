//! The luma-preserving denoise pipeline.
//!
//! ```text
//! frame ─► validate ─► resolve matrix ─► to_working_rgb ─► denoise ─► from_working_rgb ─► frame
//!                                             │                             ▲
//!                                             └──────── LumaSource ─────────┘
//! ```
//!
//! Validation and matrix resolution run before the resampler or denoiser
//! is called, so a bad frame costs nothing.

use crate::config::check_threshold;
use crate::negotiate::{from_working_rgb, to_working_rgb};
use crate::{DenoiseConfig, Error, Result};
use ccd_color::{resolve_matrix, ColorError, ColorMatrix};
use ccd_core::{ColorFamily, Frame, VideoInfo};
use ccd_denoise::{Ccd, Denoiser};
use ccd_resample::{CpuResampler, Resampler};
use tracing::{debug, trace};

/// Reusable pipeline over a resampler and a denoiser.
///
/// `Send + Sync` whenever its parts are, so one instance can serve many
/// worker threads.
///
/// # Example
///
/// ```rust
/// use ccd::{ChromaDenoise, DenoiseConfig};
/// use ccd_core::{Frame, FrameFormat};
///
/// let pipeline = ChromaDenoise::new(DenoiseConfig::with_threshold(6.0))?;
/// let frame = Frame::blank(FrameFormat::YUV420P8, 64, 48)?;
/// let out = pipeline.process(&frame)?;
/// assert_eq!(out.format(), frame.format());
/// assert_eq!(out.luma(), frame.luma());
/// # Ok::<(), ccd::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChromaDenoise<R = CpuResampler, D = Ccd> {
    resampler: R,
    denoiser: D,
    config: DenoiseConfig,
}

impl Default for ChromaDenoise {
    fn default() -> Self {
        Self {
            resampler: CpuResampler,
            denoiser: Ccd::default(),
            config: DenoiseConfig::default(),
        }
    }
}

impl ChromaDenoise {
    /// Pipeline on the reference resampler and the CCD kernel.
    ///
    /// # Errors
    ///
    /// Fails if `config` doesn't validate.
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        config.validate()?;
        let denoiser = Ccd::new(config.ccd)?;
        Ok(Self::with_parts(CpuResampler, denoiser, config))
    }
}

impl<R: Resampler, D: Denoiser> ChromaDenoise<R, D> {
    /// Pipeline on custom parts. `config.ccd` is ignored.
    ///
    /// Nothing is validated here; the threshold and chroma kernels are
    /// checked on every [`process_with`](Self::process_with) call before
    /// the parts are used.
    pub fn with_parts(resampler: R, denoiser: D, config: DenoiseConfig) -> Self {
        Self {
            resampler,
            denoiser,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// The resampler.
    pub fn resampler(&self) -> &R {
        &self.resampler
    }

    /// The denoiser.
    pub fn denoiser(&self) -> &D {
        &self.denoiser
    }

    /// Validates a whole clip before any frame is requested.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInput`] for variable format or resolution
    /// - [`ColorError::UnsupportedFormat`] for Gray and Other clips
    pub fn check_clip(&self, info: &VideoInfo) -> Result<()> {
        let (format, width, height) = info.concrete()?;
        trace!(%format, width, height, "check_clip");
        match format.color_family() {
            ColorFamily::Rgb | ColorFamily::Yuv | ColorFamily::YCoCg => Ok(()),
            family @ (ColorFamily::Gray | ColorFamily::Other) => {
                Err(ColorError::UnsupportedFormat { family }.into())
            }
        }
    }

    /// Denoises one frame with the configured threshold and matrix.
    pub fn process(&self, frame: &Frame) -> Result<Frame> {
        self.process_with(frame, self.config.threshold, self.config.matrix)
    }

    /// Denoises one frame with an explicit threshold and matrix override.
    ///
    /// The output has exactly the input's format, size and props, and the
    /// same luma.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInput`] for frames without a concrete format
    /// - [`Error::Denoise`] for a negative or non-finite threshold
    /// - [`Error::Resample`] for non-finite chroma kernel parameters
    /// - [`Error::Color`] for Gray/Other frames and bad matrix tags
    /// - [`Error::Resample`] / [`Error::Denoise`] from the collaborators
    /// - [`Error::FormatDrift`] if reconstruction changed the format
    pub fn process_with(
        &self,
        frame: &Frame,
        threshold: f32,
        matrix: Option<ColorMatrix>,
    ) -> Result<Frame> {
        let (format, width, height) = frame.info().concrete()?;
        trace!(%format, width, height, threshold, ?matrix, "process");
        check_threshold(threshold)?;
        self.config.chroma_upsample.validate()?;
        self.config.chroma_downsample.validate()?;

        let matrix = resolve_matrix(&format, matrix, frame.props(), width, height)?;
        let (rgb, luma) =
            to_working_rgb(&self.resampler, frame, matrix, self.config.chroma_upsample)?;
        let denoised = self.denoiser.denoise(&rgb, threshold)?;
        let out = from_working_rgb(
            &self.resampler,
            &denoised,
            &luma,
            matrix,
            &format,
            self.config.chroma_downsample,
        )?;

        if *out.format() != format || out.dimensions() != (width, height) {
            return Err(Error::FormatDrift {
                expected: format,
                got: *out.format(),
            });
        }
        debug!(%format, %matrix, "frame denoised");
        Ok(out.with_props(frame.props().clone()))
    }
}

/// Denoises one frame with the reference collaborators.
///
/// # Example
///
/// ```rust
/// use ccd_core::{Frame, FrameFormat};
///
/// let frame = Frame::blank(FrameFormat::RGB24, 32, 32)?;
/// let out = ccd::process(&frame, 4.0, None)?;
/// assert_eq!(out.format(), frame.format());
/// # Ok::<(), ccd::Error>(())
/// ```
pub fn process(frame: &Frame, threshold: f32, matrix: Option<ColorMatrix>) -> Result<Frame> {
    ChromaDenoise::<CpuResampler, Ccd>::default().process_with(frame, threshold, matrix)
}
