//! Matrix resolution.
//!
//! Picks the matrix that governs a frame from, in order: an explicit
//! override, the color family, the embedded `_Matrix` tag, and finally the
//! frame size.

use crate::{ColorError, ColorMatrix, ColorResult};
use ccd_core::{ColorFamily, FrameFormat, FrameProps, MATRIX_PROP};
use tracing::{debug, trace};

/// Frames at least this wide use BT.709 when nothing else decides.
pub const HD_MIN_WIDTH: u32 = 1280;
/// Frames at least this tall use BT.709 when nothing else decides.
pub const HD_MIN_HEIGHT: u32 = 720;

/// Size-based fallback matrix: BT.709 for HD and up, 170M below.
///
/// # Example
///
/// ```rust
/// use ccd_color::{default_for_resolution, ColorMatrix};
///
/// assert_eq!(default_for_resolution(1920, 1080), ColorMatrix::Bt709);
/// assert_eq!(default_for_resolution(640, 480), ColorMatrix::St170m);
/// assert_eq!(default_for_resolution(1280, 536), ColorMatrix::Bt709);
/// ```
#[inline]
pub fn default_for_resolution(width: u32, height: u32) -> ColorMatrix {
    if width >= HD_MIN_WIDTH || height >= HD_MIN_HEIGHT {
        ColorMatrix::Bt709
    } else {
        ColorMatrix::St170m
    }
}

/// Reads the embedded matrix tag.
///
/// `Ok(None)` when the tag is absent.
///
/// # Errors
///
/// - [`ColorError::BadMetadataType`] if the tag is not an integer
/// - [`ColorError::UnrecognizedMatrixTag`] if the code is not in
///   [`MATRIX_TAG_TABLE`](crate::MATRIX_TAG_TABLE)
pub fn matrix_from_props(props: &FrameProps) -> ColorResult<Option<ColorMatrix>> {
    let Some(value) = props.get(MATRIX_PROP) else {
        return Ok(None);
    };
    let code = value.as_int().ok_or(ColorError::BadMetadataType {
        found: value.type_name(),
    })?;
    ColorMatrix::from_tag(code)
        .map(Some)
        .ok_or(ColorError::UnrecognizedMatrixTag { code })
}

/// Determines the matrix for a frame.
///
/// Gray and Other frames are rejected first, even when `explicit` is given.
/// The embedded tag is only consulted for YUV frames. An `Unspecified`
/// result from any source falls back to [`default_for_resolution`].
///
/// # Example
///
/// ```rust
/// use ccd_color::{resolve_matrix, ColorMatrix};
/// use ccd_core::{FrameFormat, FrameProps, MATRIX_PROP};
///
/// let props = FrameProps::new().with(MATRIX_PROP, 2);
/// let m = resolve_matrix(&FrameFormat::YUV420P8, None, &props, 1920, 1080).unwrap();
/// assert_eq!(m, ColorMatrix::Bt709);
///
/// let props = FrameProps::new().with(MATRIX_PROP, 3);
/// assert!(resolve_matrix(&FrameFormat::YUV420P8, None, &props, 1920, 1080).is_err());
/// ```
///
/// # Errors
///
/// - [`ColorError::UnsupportedFormat`] for Gray and Other frames
/// - the tag errors of [`matrix_from_props`]
pub fn resolve_matrix(
    format: &FrameFormat,
    explicit: Option<ColorMatrix>,
    props: &FrameProps,
    width: u32,
    height: u32,
) -> ColorResult<ColorMatrix> {
    trace!(%format, ?explicit, width, height, "resolve_matrix");

    let family = format.color_family();
    let picked = match family {
        ColorFamily::Gray | ColorFamily::Other => {
            return Err(ColorError::UnsupportedFormat { family });
        }
        _ if explicit.is_some() => explicit,
        ColorFamily::YCoCg => Some(ColorMatrix::YCoCg),
        ColorFamily::Yuv => matrix_from_props(props)?,
        ColorFamily::Rgb => None,
    };

    let matrix = match picked {
        Some(ColorMatrix::Unspecified) | None => default_for_resolution(width, height),
        Some(m) => m,
    };
    debug!(%matrix, source = source_name(explicit, family, picked), "resolved matrix");
    Ok(matrix)
}

fn source_name(
    explicit: Option<ColorMatrix>,
    family: ColorFamily,
    picked: Option<ColorMatrix>,
) -> &'static str {
    match (explicit, family, picked) {
        (_, _, None) | (_, _, Some(ColorMatrix::Unspecified)) => "resolution",
        (Some(_), _, _) => "explicit",
        (None, ColorFamily::YCoCg, _) => "family",
        _ => "tag",
    }
}
