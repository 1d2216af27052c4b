//! Frames, clip descriptors and plane combination.
//!
//! - [`Frame`] - Immutable set of planes tagged with a [`FrameFormat`]
//! - [`VideoInfo`] - Clip-level description whose format or size may vary
//! - [`combine_planes`] - Assembles a frame from planes of other frames
//!
//! # Usage
//!
//! ```rust
//! use ccd_core::{combine_planes, ColorFamily, Frame, FrameFormat};
//!
//! let a = Frame::blank(FrameFormat::YUV444P8, 8, 8).unwrap();
//! let b = Frame::blank(FrameFormat::YUV444P8, 8, 8).unwrap();
//!
//! // Luma from `a`, chroma from `b`
//! let mixed = combine_planes(&[(&a, 0), (&b, 1), (&b, 2)], ColorFamily::Yuv).unwrap();
//! assert!(mixed.plane(0).unwrap().ptr_eq(a.plane(0).unwrap()));
//! ```

use crate::{ColorFamily, Error, FrameFormat, FrameProps, Plane, Result};

/// An immutable video frame.
///
/// Construction validates the plane layout against the format, so every
/// `Frame` value is internally consistent: the right number of planes, each
/// with the dimensions the subsampling implies and the storage the depth
/// implies.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: FrameFormat,
    width: u32,
    height: u32,
    planes: Vec<Plane>,
    props: FrameProps,
}

impl Frame {
    /// Creates a frame from planes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] for zero or badly divisible dimensions
    /// - [`Error::PlaneCount`] if the family needs a different plane count
    /// - [`Error::DimensionMismatch`] if a plane has the wrong size
    /// - [`Error::SampleTypeMismatch`] if a plane's storage doesn't fit the depth
    pub fn new(format: FrameFormat, width: u32, height: u32, planes: Vec<Plane>) -> Result<Self> {
        format.check_dimensions(width, height)?;
        if planes.len() != format.plane_count() {
            return Err(Error::PlaneCount {
                expected: format.plane_count(),
                got: planes.len(),
            });
        }
        for (i, plane) in planes.iter().enumerate() {
            let expected = format.plane_dimensions(i, width, height);
            if plane.dimensions() != expected {
                return Err(Error::dimension_mismatch(i, expected, plane.dimensions()));
            }
            if !plane.samples().fits(&format) {
                return Err(Error::SampleTypeMismatch {
                    plane: i,
                    storage: plane.samples().kind(),
                    format: format.to_string(),
                });
            }
        }
        Ok(Self {
            format,
            width,
            height,
            planes,
            props: FrameProps::default(),
        })
    }

    /// Zero-filled frame.
    ///
    /// Note that zero is "below black" for limited-range integer YUV.
    pub fn blank(format: FrameFormat, width: u32, height: u32) -> Result<Self> {
        format.check_dimensions(width, height)?;
        let planes = (0..format.plane_count())
            .map(|i| {
                let (w, h) = format.plane_dimensions(i, width, height);
                Plane::zeroed(&format, w, h)
            })
            .collect();
        Self::new(format, width, height, planes)
    }

    /// Replaces the metadata map.
    pub fn with_props(mut self, props: FrameProps) -> Self {
        self.props = props;
        self
    }

    /// Frame format.
    #[inline]
    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    /// Frame width (luma/plane 0 width).
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height (luma/plane 0 height).
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// All planes in order.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Plane `index`, if present.
    #[inline]
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    /// Plane `index`, or [`Error::PlaneIndex`].
    pub fn try_plane(&self, index: usize) -> Result<&Plane> {
        self.planes.get(index).ok_or(Error::PlaneIndex {
            index,
            planes: self.planes.len(),
        })
    }

    /// The luma plane for families that have one.
    pub fn luma(&self) -> Option<&Plane> {
        if self.format.color_family().has_luma() {
            self.planes.first()
        } else {
            None
        }
    }

    /// Metadata map.
    #[inline]
    pub fn props(&self) -> &FrameProps {
        &self.props
    }

    /// Mutable metadata map.
    #[inline]
    pub fn props_mut(&mut self) -> &mut FrameProps {
        &mut self.props
    }

    /// Clip-level description of this single frame (always concrete).
    pub fn info(&self) -> VideoInfo {
        VideoInfo::new(self.format, self.width, self.height)
    }
}

/// Clip-level description.
///
/// A clip may change format or resolution from frame to frame, in which case
/// the corresponding field is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoInfo {
    /// Format shared by every frame, if constant.
    pub format: Option<FrameFormat>,
    /// Width shared by every frame, if constant.
    pub width: Option<u32>,
    /// Height shared by every frame, if constant.
    pub height: Option<u32>,
}

impl VideoInfo {
    /// Constant-format, constant-size clip.
    pub fn new(format: FrameFormat, width: u32, height: u32) -> Self {
        Self {
            format: Some(format),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Returns the concrete format and dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedInput`] for variable format or resolution.
    pub fn concrete(&self) -> Result<(FrameFormat, u32, u32)> {
        let format = self
            .format
            .ok_or_else(|| Error::unsupported_input("variable format is not supported"))?;
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Ok((format, w, h)),
            _ => Err(Error::unsupported_input(
                "variable resolution is not supported",
            )),
        }
    }
}

/// Assembles a frame from individually sourced planes.
///
/// Each source is `(frame, plane index)`. The output takes its dimensions
/// from source 0, its depth from source 0's format, its subsampling from the
/// plane sizes, and its metadata from source 0's frame.
///
/// No resampling happens here: planes whose dimensions don't fit the
/// resulting layout are an error. Upsample first if needed.
///
/// # Errors
///
/// - [`Error::PlaneCount`] if `sources.len()` doesn't match the family
/// - [`Error::PlaneIndex`] if a source plane doesn't exist
/// - [`Error::SampleTypeMismatch`] if sources store samples differently
/// - [`Error::DimensionMismatch`] / [`Error::InvalidFormat`] for incompatible sizes
pub fn combine_planes(sources: &[(&Frame, usize)], family: ColorFamily) -> Result<Frame> {
    if sources.len() != family.plane_count() {
        return Err(Error::PlaneCount {
            expected: family.plane_count(),
            got: sources.len(),
        });
    }

    let planes = sources
        .iter()
        .map(|(frame, index)| frame.try_plane(*index).cloned())
        .collect::<Result<Vec<_>>>()?;

    let (first, _) = sources[0];
    let base = first.format();
    let (width, height) = planes[0].dimensions();

    let (sw, sh) = if family.has_chroma_planes() {
        let (cw, ch) = planes[1].dimensions();
        (log2_ratio(width, cw, 1)?, log2_ratio(height, ch, 1)?)
    } else {
        (0, 0)
    };

    let format = FrameFormat::new(family, sw, sh, base.bits_per_sample(), base.sample_type())?;
    Ok(Frame::new(format, width, height, planes)?.with_props(first.props().clone()))
}

fn log2_ratio(full: u32, reduced: u32, plane: usize) -> Result<u8> {
    (0..=crate::format::MAX_SUBSAMPLING)
        .find(|&s| full >> s == reduced && reduced << s == full)
        .ok_or_else(|| Error::dimension_mismatch(plane, (full, full), (reduced, reduced)))
}
