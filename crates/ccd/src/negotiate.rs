//! Getting frames into working RGB and back.
//!
//! The denoiser only accepts full-resolution `rgbs`. [`to_working_rgb`]
//! reshapes any supported frame into that and returns a [`LumaSource`] that
//! remembers where the original luma lives. [`from_working_rgb`] rebuilds
//! the original format with that luma spliced back in.
//!
//! | Family | Forward | Inverse |
//! |---|---|---|
//! | RGB | point-convert to `rgbs` | chroma from the result, luma re-derived from the input |
//! | YUV, YCoCg | upsample chroma, convert with the matrix | original luma plane + converted chroma, then downsample |
//! | Gray, Other | rejected | rejected |

use crate::{Error, Result};
use ccd_color::{ColorError, ColorMatrix};
use ccd_core::{combine_planes, ColorFamily, Frame, FrameFormat};
use ccd_resample::{ConvertOptions, Filter, Resampler};
use tracing::{debug, trace};

/// Where the untouched luma comes from on the way back.
#[derive(Debug, Clone, PartialEq)]
pub enum LumaSource {
    /// The input YUV/YCoCg frame; its plane 0 is reused as is.
    Plane(Frame),
    /// The input RGB frame; luma is re-derived from it with the same matrix.
    Rgb(Frame),
}

impl LumaSource {
    /// The input frame this source refers to.
    pub fn frame(&self) -> &Frame {
        match self {
            Self::Plane(f) | Self::Rgb(f) => f,
        }
    }
}

/// Converts `frame` to full-resolution `rgbs`.
///
/// `upsample` is the kernel for subsampled chroma.
///
/// # Errors
///
/// - [`ColorError::UnsupportedFormat`] for Gray and Other frames
/// - any resampler error
pub fn to_working_rgb<R: Resampler + ?Sized>(
    resampler: &R,
    frame: &Frame,
    matrix: ColorMatrix,
    upsample: Filter,
) -> Result<(Frame, LumaSource)> {
    let format = *frame.format();
    trace!(%format, %matrix, "to_working_rgb");
    match format.color_family() {
        ColorFamily::Rgb => rgb_forward(resampler, frame),
        ColorFamily::Yuv | ColorFamily::YCoCg => ycc_forward(resampler, frame, matrix, upsample),
        family @ (ColorFamily::Gray | ColorFamily::Other) => {
            Err(ColorError::UnsupportedFormat { family }.into())
        }
    }
}

fn rgb_forward<R: Resampler + ?Sized>(resampler: &R, frame: &Frame) -> Result<(Frame, LumaSource)> {
    let rgb = if *frame.format() == FrameFormat::RGBS {
        frame.clone()
    } else {
        resampler.convert(frame, &FrameFormat::RGBS, &ConvertOptions::point())?
    };
    Ok((rgb, LumaSource::Rgb(frame.clone())))
}

fn ycc_forward<R: Resampler + ?Sized>(
    resampler: &R,
    frame: &Frame,
    matrix: ColorMatrix,
    upsample: Filter,
) -> Result<(Frame, LumaSource)> {
    let format = frame.format();
    let full = if format.is_subsampled() {
        let nominal = format.with_subsampling(0, 0)?;
        debug!(from = %format, to = %nominal, filter = %upsample, "upsampling chroma");
        resampler.convert(frame, &nominal, &ConvertOptions::new(upsample))?
    } else {
        frame.clone()
    };
    let rgb = resampler.convert(
        &full,
        &FrameFormat::RGBS,
        &ConvertOptions::new(upsample).matrix_in(matrix),
    )?;
    Ok((rgb, LumaSource::Plane(frame.clone())))
}

/// Rebuilds a `target` frame from denoised `rgbs` and the saved luma.
///
/// `downsample` is the kernel for subsampled targets.
///
/// # Errors
///
/// - [`ColorError::UnsupportedFormat`] for Gray and Other targets
/// - [`Error::LumaSourceMismatch`] if `luma` came from another family
/// - any resampler or plane-combination error
pub fn from_working_rgb<R: Resampler + ?Sized>(
    resampler: &R,
    denoised: &Frame,
    luma: &LumaSource,
    matrix: ColorMatrix,
    target: &FrameFormat,
    downsample: Filter,
) -> Result<Frame> {
    trace!(%target, %matrix, "from_working_rgb");
    let family = target.color_family();
    match (family, luma) {
        (ColorFamily::Rgb, LumaSource::Rgb(original)) => {
            rgb_inverse(resampler, denoised, original, matrix, target)
        }
        (ColorFamily::Yuv | ColorFamily::YCoCg, LumaSource::Plane(original)) => {
            ycc_inverse(resampler, denoised, original, matrix, target, downsample)
        }
        (ColorFamily::Gray | ColorFamily::Other, _) => {
            Err(ColorError::UnsupportedFormat { family }.into())
        }
        _ => Err(Error::LumaSourceMismatch { family }),
    }
}

fn ycc_inverse<R: Resampler + ?Sized>(
    resampler: &R,
    denoised: &Frame,
    original: &Frame,
    matrix: ColorMatrix,
    target: &FrameFormat,
    downsample: Filter,
) -> Result<Frame> {
    let nominal = target.with_subsampling(0, 0)?;
    let chroma = resampler.convert(
        denoised,
        &nominal,
        &ConvertOptions::new(downsample).matrix_out(matrix),
    )?;
    let combined = combine_planes(
        &[(original, 0), (&chroma, 1), (&chroma, 2)],
        target.color_family(),
    )?;
    if !target.is_subsampled() {
        return Ok(combined);
    }
    debug!(from = %nominal, to = %target, filter = %downsample, "downsampling chroma");
    Ok(resampler.convert(&combined, target, &ConvertOptions::new(downsample))?)
}

fn rgb_inverse<R: Resampler + ?Sized>(
    resampler: &R,
    denoised: &Frame,
    original: &Frame,
    matrix: ColorMatrix,
    target: &FrameFormat,
) -> Result<Frame> {
    let to_ycc = ConvertOptions::point().matrix_out(matrix);
    let chroma = resampler.convert(denoised, &target.with_family(ColorFamily::Yuv), &to_ycc)?;
    let luma = resampler.convert(original, &target.with_family(ColorFamily::Gray), &to_ycc)?;
    let combined = combine_planes(&[(&luma, 0), (&chroma, 1), (&chroma, 2)], ColorFamily::Yuv)?;
    Ok(resampler.convert(&combined, target, &ConvertOptions::point().matrix_in(matrix))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccd_resample::CpuResampler;

    #[test]
    fn test_rgbs_passes_through() {
        let frame = Frame::blank(FrameFormat::RGBS, 8, 8).unwrap();
        let (rgb, luma) =
            to_working_rgb(&CpuResampler, &frame, ColorMatrix::Bt709, Filter::default()).unwrap();
        assert!(rgb.plane(0).unwrap().ptr_eq(frame.plane(0).unwrap()));
        assert!(matches!(luma, LumaSource::Rgb(_)));
    }

    #[test]
    fn test_subsampled_forward_is_full_resolution() {
        let frame = Frame::blank(FrameFormat::YUV420P10, 16, 8).unwrap();
        let (rgb, luma) =
            to_working_rgb(&CpuResampler, &frame, ColorMatrix::Bt709, Filter::default()).unwrap();
        assert_eq!(rgb.format(), &FrameFormat::RGBS);
        for plane in rgb.planes() {
            assert_eq!(plane.dimensions(), (16, 8));
        }
        assert!(luma.frame().luma().unwrap().ptr_eq(frame.luma().unwrap()));
    }

    #[test]
    fn test_gray_rejected_both_ways() {
        let gray = Frame::blank(FrameFormat::GRAY8, 8, 8).unwrap();
        let err =
            to_working_rgb(&CpuResampler, &gray, ColorMatrix::Bt709, Filter::Point).unwrap_err();
        assert!(err.is_unsupported_format());

        let rgb = Frame::blank(FrameFormat::RGBS, 8, 8).unwrap();
        let err = from_working_rgb(
            &CpuResampler,
            &rgb,
            &LumaSource::Plane(gray),
            ColorMatrix::Bt709,
            &FrameFormat::GRAY8,
            Filter::Point,
        )
        .unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_luma_source_must_match_target() {
        let rgb = Frame::blank(FrameFormat::RGBS, 8, 8).unwrap();
        let err = from_working_rgb(
            &CpuResampler,
            &rgb,
            &LumaSource::Rgb(rgb.clone()),
            ColorMatrix::Bt709,
            &FrameFormat::YUV420P8,
            Filter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::LumaSourceMismatch { .. }));
    }
}
