//! Matrix resolution command.

use crate::ResolveArgs;
use anyhow::{Context, Result};
use ccd_color::resolve_matrix;

/// Prints the matrix a frame of the given shape and tag resolves to.
pub fn run(args: ResolveArgs) -> Result<()> {
    let frame = args.frame;
    let props = super::tag_props(frame.tag);
    let matrix = resolve_matrix(&frame.format, args.matrix, &props, frame.width, frame.height)
        .with_context(|| {
            format!(
                "Cannot resolve a matrix for {} {}x{}",
                frame.format, frame.width, frame.height
            )
        })?;
    println!("{matrix}");
    Ok(())
}
