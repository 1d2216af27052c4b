//! The [`Denoiser`] boundary.

use crate::DenoiseResult;
use ccd_core::Frame;

/// RGB-space chroma denoiser.
///
/// Accepts only [`FrameFormat::RGBS`](ccd_core::FrameFormat::RGBS) frames
/// and returns a frame of the same format and size. The threshold is
/// interpreted by the implementation alone.
pub trait Denoiser: Send + Sync {
    /// Denoises one RGB frame.
    fn denoise(&self, frame: &Frame, threshold: f32) -> DenoiseResult<Frame>;
}

impl<D: Denoiser + ?Sized> Denoiser for &D {
    fn denoise(&self, frame: &Frame, threshold: f32) -> DenoiseResult<Frame> {
        (**self).denoise(frame, threshold)
    }
}

impl<D: Denoiser + ?Sized> Denoiser for std::sync::Arc<D> {
    fn denoise(&self, frame: &Frame, threshold: f32) -> DenoiseResult<Frame> {
        (**self).denoise(frame, threshold)
    }
}
