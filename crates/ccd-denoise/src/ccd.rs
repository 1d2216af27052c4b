//! Camcorder Color Denoise.
//!
//! Each pixel is averaged with the samples of a sparse grid around it whose
//! RGB distance to the pixel is below the threshold. Luma and chroma are not
//! separated here; the pipeline restores luma afterwards.
//!
//! # Algorithm
//!
//! ```text
//! t = threshold^2 / 195075            (195075 = 3 * 255^2)
//! for each pixel p:
//!     sum = p, n = 0
//!     for dy in -half_h..=half_h step offset_h:
//!         for dx in -half_w..=half_w step offset_w:
//!             q = src[reflect(y + dy), reflect(x + dx)]
//!             if |q - p|^2 < t: sum += q, n += 1
//!     dst = sum / (n + 1)
//! ```
//!
//! The grid includes the pixel itself. A threshold of 0 admits nothing and
//! returns the input unchanged.
//!
//! # Example
//!
//! ```rust
//! use ccd_core::{Frame, FrameFormat};
//! use ccd_denoise::{Ccd, Denoiser};
//!
//! let rgb = Frame::blank(FrameFormat::RGBS, 32, 32).unwrap();
//! let out = Ccd::default().denoise(&rgb, 4.0).unwrap();
//! assert_eq!(out.format(), &FrameFormat::RGBS);
//! ```

use crate::{DenoiseError, DenoiseResult, Denoiser};
use ccd_core::{Frame, FrameFormat, Plane};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Threshold used when none is given.
pub const DEFAULT_THRESHOLD: f32 = 4.0;

/// Smallest frame side the kernel accepts.
pub const MIN_DIMENSION: u32 = 12;

/// Scale between user thresholds (8-bit units) and squared float distances.
const THRESHOLD_SCALE: f32 = 195075.0;

/// Sparse grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CcdParams {
    /// Full grid extent `[width, height]` in pixels; odd, at least 3.
    pub matrix_size: [u32; 2],
    /// Step between grid samples `[x, y]`; divides `matrix_size - 1`.
    pub offset_size: [u32; 2],
}

impl Default for CcdParams {
    fn default() -> Self {
        Self::square(25, 12)
    }
}

impl CcdParams {
    /// Same extent and step on both axes.
    pub const fn square(matrix_size: u32, offset_size: u32) -> Self {
        Self {
            matrix_size: [matrix_size, matrix_size],
            offset_size: [offset_size, offset_size],
        }
    }

    /// Checks the frame-independent constraints.
    ///
    /// # Errors
    ///
    /// Returns [`DenoiseError::InvalidParameter`] for even or too small
    /// extents and for steps that don't divide `matrix_size - 1`.
    pub fn validate(&self) -> DenoiseResult<()> {
        for (axis, (&m, &o)) in ["width", "height"]
            .iter()
            .zip(self.matrix_size.iter().zip(&self.offset_size))
        {
            if m < 3 || m % 2 == 0 {
                return Err(DenoiseError::InvalidParameter(format!(
                    "matrix {axis} must be odd and at least 3, got {m}"
                )));
            }
            if o == 0 || (m - 1) % o != 0 {
                return Err(DenoiseError::InvalidParameter(format!(
                    "offset {axis} {o} must evenly divide matrix {axis} - 1 ({})",
                    m - 1
                )));
            }
        }
        Ok(())
    }
}

/// The CCD kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ccd {
    params: CcdParams,
}

impl Ccd {
    /// Kernel with validated parameters.
    ///
    /// # Errors
    ///
    /// See [`CcdParams::validate`].
    pub fn new(params: CcdParams) -> DenoiseResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Grid parameters.
    pub fn params(&self) -> &CcdParams {
        &self.params
    }

    fn check_frame(&self, frame: &Frame, threshold: f32) -> DenoiseResult<()> {
        if *frame.format() != FrameFormat::RGBS {
            return Err(DenoiseError::NotRgbFloat {
                format: *frame.format(),
            });
        }
        if !(threshold >= 0.0 && threshold.is_finite()) {
            return Err(DenoiseError::InvalidParameter(format!(
                "threshold must be >= 0, got {threshold}"
            )));
        }
        let (width, height) = frame.dimensions();
        let [mw, mh] = self.params.matrix_size;
        let min_width = MIN_DIMENSION.max(mw);
        let min_height = MIN_DIMENSION.max(mh);
        if width < min_width || height < min_height {
            return Err(DenoiseError::FrameTooSmall {
                width,
                height,
                min_width,
                min_height,
            });
        }
        Ok(())
    }
}

impl Denoiser for Ccd {
    fn denoise(&self, frame: &Frame, threshold: f32) -> DenoiseResult<Frame> {
        let (width, height) = frame.dimensions();
        trace!(width, height, threshold, "ccd");
        self.check_frame(frame, threshold)?;

        if threshold == 0.0 {
            debug!("zero threshold, passing frame through");
            return Ok(frame.clone());
        }

        let mut src = [&[][..]; 3];
        for (i, slot) in src.iter_mut().enumerate() {
            *slot = frame
                .try_plane(i)?
                .as_f32()
                .ok_or(DenoiseError::NotRgbFloat {
                    format: *frame.format(),
                })?;
        }

        let grid = Grid {
            width: width as usize,
            height: height as usize,
            half: [
                (self.params.matrix_size[0] / 2) as usize,
                (self.params.matrix_size[1] / 2) as usize,
            ],
            step: [
                self.params.offset_size[0] as usize,
                self.params.offset_size[1] as usize,
            ],
            limit: threshold * threshold / THRESHOLD_SCALE,
        };
        let [r, g, b] = grid.run(src);

        let planes = vec![
            Plane::from_f32(width, height, r)?,
            Plane::from_f32(width, height, g)?,
            Plane::from_f32(width, height, b)?,
        ];
        Ok(Frame::new(FrameFormat::RGBS, width, height, planes)?.with_props(frame.props().clone()))
    }
}

struct Grid {
    width: usize,
    height: usize,
    half: [usize; 2],
    step: [usize; 2],
    limit: f32,
}

impl Grid {
    fn run(&self, src: [&[f32]; 3]) -> [Vec<f32>; 3] {
        let n = self.width * self.height;
        let mut out = [vec![0.0f32; n], vec![0.0f32; n], vec![0.0f32; n]];
        let [dr, dg, db] = &mut out;

        dr.par_chunks_mut(self.width)
            .zip(dg.par_chunks_mut(self.width))
            .zip(db.par_chunks_mut(self.width))
            .enumerate()
            .for_each(|(y, ((row_r, row_g), row_b))| {
                for x in 0..self.width {
                    [row_r[x], row_g[x], row_b[x]] = self.pixel(&src, x, y);
                }
            });
        out
    }

    #[inline]
    fn pixel(&self, src: &[&[f32]; 3], x: usize, y: usize) -> [f32; 3] {
        let i = y * self.width + x;
        let p = [src[0][i], src[1][i], src[2][i]];
        let mut total = p;
        let mut n = 0u32;

        let [hw, hh] = self.half;
        let [sw, sh] = self.step;
        for dy in (0..=2 * hh).step_by(sh) {
            let row = reflect(y as isize + dy as isize - hh as isize, self.height) * self.width;
            for dx in (0..=2 * hw).step_by(sw) {
                let j = row + reflect(x as isize + dx as isize - hw as isize, self.width);
                let q = [src[0][j], src[1][j], src[2][j]];
                let dist = (q[0] - p[0]).powi(2) + (q[1] - p[1]).powi(2) + (q[2] - p[2]).powi(2);
                if dist < self.limit {
                    total[0] += q[0];
                    total[1] += q[1];
                    total[2] += q[2];
                    n += 1;
                }
            }
        }

        let inv = 1.0 / (n + 1) as f32;
        [total[0] * inv, total[1] * inv, total[2] * inv]
    }
}

/// Mirrors an out-of-range coordinate back into `0..len` without repeating the edge.
#[inline]
fn reflect(v: isize, len: usize) -> usize {
    let last = len as isize - 1;
    let r = if v < 0 {
        -v
    } else if v > last {
        2 * last - v
    } else {
        v
    };
    r.clamp(0, last) as usize
}
