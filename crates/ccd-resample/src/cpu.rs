//! Reference CPU resampler.
//!
//! Every conversion decodes planes to normalized `f32`
//! ([`range`](crate::range)), resizes with [`resize_plane`], applies the
//! color transform per pixel and re-encodes. Planes that keep their size and
//! coding are moved over as shared buffers without being touched.
//!
//! # Example
//!
//! ```rust
//! use ccd_color::ColorMatrix;
//! use ccd_core::{Frame, FrameFormat};
//! use ccd_resample::{ConvertOptions, CpuResampler, Resampler};
//!
//! let yuv = Frame::blank(FrameFormat::YUV420P8, 16, 16).unwrap();
//! let opts = ConvertOptions::default().matrix_in(ColorMatrix::Bt709);
//! let rgb = CpuResampler.convert(&yuv, &FrameFormat::RGBS, &opts).unwrap();
//! assert_eq!(rgb.format(), &FrameFormat::RGBS);
//! ```

use crate::filter::{resize_plane, Filter};
use crate::range::{decode_plane, encode_plane, Quant};
use crate::{ConvertOptions, ResampleError, ResampleResult, Resampler};
use ccd_color::{ColorMatrix, YccTransform};
use ccd_core::{ColorFamily, Frame, FrameFormat, Plane};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Row-parallel CPU implementation of [`Resampler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuResampler;

/// How planes get from the source family to the target family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Same family: plane by plane, size and depth only.
    Planewise,
    /// YUV/YCoCg to RGB.
    ToRgb,
    /// RGB to YUV/YCoCg.
    FromRgb,
    /// RGB to Gray through the target matrix's luma row.
    RgbToGray,
    /// YUV/YCoCg to Gray by taking the luma plane.
    LumaToGray,
    /// YUV to YCoCg or back, through RGB.
    Rematrix,
}

impl Route {
    fn between(from: &FrameFormat, to: &FrameFormat) -> ResampleResult<Self> {
        use ColorFamily::*;
        Ok(match (from.color_family(), to.color_family()) {
            (a, b) if a == b => Self::Planewise,
            (Yuv | YCoCg, Rgb) => Self::ToRgb,
            (Rgb, Yuv | YCoCg) => Self::FromRgb,
            (Rgb, Gray) => Self::RgbToGray,
            (Yuv | YCoCg, Gray) => Self::LumaToGray,
            (Yuv, YCoCg) | (YCoCg, Yuv) => Self::Rematrix,
            _ => {
                return Err(ResampleError::UnsupportedConversion {
                    from: *from,
                    to: *to,
                });
            }
        })
    }
}

impl Resampler for CpuResampler {
    fn convert(
        &self,
        frame: &Frame,
        target: &FrameFormat,
        options: &ConvertOptions,
    ) -> ResampleResult<Frame> {
        let from = *frame.format();
        let (width, height) = frame.dimensions();
        trace!(%from, to = %target, width, height, filter = %options.filter, "convert");

        if from == *target {
            return Ok(frame.clone());
        }
        target.check_dimensions(width, height)?;

        let route = Route::between(&from, target)?;
        debug!(%from, to = %target, ?route, "conversion route");

        let filter = options.filter;
        let source_matrix = || require(options.matrix_in, "source", &from, target);
        let target_matrix = || require(options.matrix_out, "target", &from, target);

        let planes = match route {
            Route::Planewise => (0..target.plane_count())
                .map(|i| carry_plane(frame, i, target, i, filter))
                .collect::<ResampleResult<Vec<_>>>()?,
            Route::LumaToGray => vec![carry_plane(frame, 0, target, 0, filter)?],
            Route::RgbToGray => {
                let t = target_matrix()?;
                let [r, g, b] = decode_full(frame, filter)?;
                let luma: Vec<f32> = r
                    .par_iter()
                    .zip(g.par_iter())
                    .zip(b.par_iter())
                    .map(|((&r, &g), &b)| t.luma([r, g, b]))
                    .collect();
                vec![encode_plane(&luma, width, height, target, 0)?]
            }
            Route::ToRgb => {
                let t = source_matrix()?;
                let rgb = map_pixels(&decode_full(frame, filter)?, |ycc| t.inverse(ycc));
                encode_full(&rgb, width, height, target, filter)?
            }
            Route::FromRgb => {
                let t = target_matrix()?;
                let ycc = map_pixels(&decode_full(frame, filter)?, |rgb| t.forward(rgb));
                encode_full(&ycc, width, height, target, filter)?
            }
            Route::Rematrix => {
                let (s, t) = (source_matrix()?, target_matrix()?);
                let ycc = map_pixels(&decode_full(frame, filter)?, |ycc| {
                    t.forward(s.inverse(ycc))
                });
                encode_full(&ycc, width, height, target, filter)?
            }
        };

        Ok(Frame::new(*target, width, height, planes)?.with_props(frame.props().clone()))
    }
}

fn require(
    matrix: Option<ColorMatrix>,
    side: &'static str,
    from: &FrameFormat,
    to: &FrameFormat,
) -> ResampleResult<YccTransform> {
    let missing = || ResampleError::MissingMatrix {
        side,
        from: *from,
        to: *to,
    };
    matrix.ok_or_else(missing)?.transform().map_err(|_| missing())
}

/// Whether two planes store values identically.
fn same_coding(a: &FrameFormat, a_index: usize, b: &FrameFormat, b_index: usize) -> bool {
    a.bits_per_sample() == b.bits_per_sample()
        && a.sample_type() == b.sample_type()
        && Quant::for_plane(a, a_index) == Quant::for_plane(b, b_index)
}

/// Plane `src_index` of `frame`, as plane `dst_index` of a `target` frame.
fn carry_plane(
    frame: &Frame,
    src_index: usize,
    target: &FrameFormat,
    dst_index: usize,
    filter: Filter,
) -> ResampleResult<Plane> {
    let plane = frame.try_plane(src_index)?;
    let (w, h) = target.plane_dimensions(dst_index, frame.width(), frame.height());
    if plane.dimensions() == (w, h) && same_coding(frame.format(), src_index, target, dst_index) {
        return Ok(plane.clone());
    }

    let (pw, ph) = plane.dimensions();
    let values = decode_plane(plane, frame.format(), src_index);
    let values = resize_plane(&values, pw as usize, ph as usize, w as usize, h as usize, filter)?;
    Ok(encode_plane(&values, w, h, target, dst_index)?)
}

/// All three planes decoded at full frame resolution.
fn decode_full(frame: &Frame, filter: Filter) -> ResampleResult<[Vec<f32>; 3]> {
    let (w, h) = frame.dimensions();
    let planes = frame
        .planes()
        .iter()
        .enumerate()
        .map(|(i, plane)| {
            let (pw, ph) = plane.dimensions();
            let values = decode_plane(plane, frame.format(), i);
            resize_plane(&values, pw as usize, ph as usize, w as usize, h as usize, filter)
        })
        .collect::<ResampleResult<Vec<_>>>()?;
    planes.try_into().map_err(|p: Vec<Vec<f32>>| {
        ResampleError::InvalidDimensions(format!("expected 3 planes, got {}", p.len()))
    })
}

/// Encodes full-resolution planes, downsampling chroma if `target` is subsampled.
fn encode_full(
    planes: &[Vec<f32>; 3],
    width: u32,
    height: u32,
    target: &FrameFormat,
    filter: Filter,
) -> ResampleResult<Vec<Plane>> {
    planes
        .iter()
        .enumerate()
        .map(|(i, values)| {
            let (pw, ph) = target.plane_dimensions(i, width, height);
            let plane = if (pw, ph) == (width, height) {
                encode_plane(values, pw, ph, target, i)?
            } else {
                let values = resize_plane(
                    values,
                    width as usize,
                    height as usize,
                    pw as usize,
                    ph as usize,
                    filter,
                )?;
                encode_plane(&values, pw, ph, target, i)?
            };
            Ok(plane)
        })
        .collect()
}

fn map_pixels<F>(planes: &[Vec<f32>; 3], f: F) -> [Vec<f32>; 3]
where
    F: Fn([f32; 3]) -> [f32; 3] + Sync + Send,
{
    let n = planes[0].len();
    let mut out = [vec![0.0f32; n], vec![0.0f32; n], vec![0.0f32; n]];
    let [a, b, c] = &mut out;
    a.par_iter_mut()
        .zip(b.par_iter_mut())
        .zip(c.par_iter_mut())
        .enumerate()
        .for_each(|(i, ((x, y), z))| {
            [*x, *y, *z] = f([planes[0][i], planes[1][i], planes[2][i]]);
        });
    out
}
