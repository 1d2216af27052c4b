//! The [`Resampler`] boundary.

use crate::{Filter, ResampleResult};
use ccd_color::ColorMatrix;
use ccd_core::{Frame, FrameFormat};

/// Options for one conversion.
///
/// `matrix_in` describes the source when it is a luma/chroma family,
/// `matrix_out` the target. Conversions that stay inside a family ignore
/// both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Matrix of the source frame.
    pub matrix_in: Option<ColorMatrix>,
    /// Matrix of the target frame.
    pub matrix_out: Option<ColorMatrix>,
    /// Kernel for any plane whose size changes.
    pub filter: Filter,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(Filter::default())
    }
}

impl ConvertOptions {
    /// Options with `filter` and no matrices.
    pub const fn new(filter: Filter) -> Self {
        Self {
            matrix_in: None,
            matrix_out: None,
            filter,
        }
    }

    /// Point sampling, no spatial interpolation.
    pub const fn point() -> Self {
        Self::new(Filter::Point)
    }

    /// Sets the source matrix.
    pub const fn matrix_in(mut self, matrix: ColorMatrix) -> Self {
        self.matrix_in = Some(matrix);
        self
    }

    /// Sets the target matrix.
    pub const fn matrix_out(mut self, matrix: ColorMatrix) -> Self {
        self.matrix_out = Some(matrix);
        self
    }
}

/// Color-matrix-aware frame format conversion.
///
/// Implementations must be deterministic and keep the frame dimensions.
/// The output must have exactly `target` as its format and carry the
/// input's props.
pub trait Resampler: Send + Sync {
    /// Converts `frame` to `target`.
    fn convert(
        &self,
        frame: &Frame,
        target: &FrameFormat,
        options: &ConvertOptions,
    ) -> ResampleResult<Frame>;
}

impl<R: Resampler + ?Sized> Resampler for &R {
    fn convert(
        &self,
        frame: &Frame,
        target: &FrameFormat,
        options: &ConvertOptions,
    ) -> ResampleResult<Frame> {
        (**self).convert(frame, target, options)
    }
}

impl<R: Resampler + ?Sized> Resampler for std::sync::Arc<R> {
    fn convert(
        &self,
        frame: &Frame,
        target: &FrameFormat,
        options: &ConvertOptions,
    ) -> ResampleResult<Frame> {
        (**self).convert(frame, target, options)
    }
}
