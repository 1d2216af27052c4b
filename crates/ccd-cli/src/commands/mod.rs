//! CLI command implementations

pub mod denoise;
pub mod resolve;

use ccd_core::{FrameProps, MATRIX_PROP};

/// Props carrying an optional `_Matrix` tag.
pub fn tag_props(tag: Option<i64>) -> FrameProps {
    tag.map(|t| FrameProps::new().with(MATRIX_PROP, t))
        .unwrap_or_default()
}
