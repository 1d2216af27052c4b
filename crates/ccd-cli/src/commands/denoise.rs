//! Raw clip denoise command.
//!
//! Frames are read in batches, denoised in parallel and written in input
//! order.

use crate::raw;
use crate::DenoiseArgs;
use anyhow::{bail, Context, Result};
use ccd::{ChromaDenoise, DenoiseConfig};
use ccd_core::VideoInfo;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use tracing::{debug, info};

/// Denoises every frame of `args.input` into `args.output`.
pub fn run(args: DenoiseArgs, verbose: bool) -> Result<()> {
    let config = build_config(&args)?;
    let pipeline = ChromaDenoise::new(config).context("Invalid denoise settings")?;

    let frame_args = &args.frame;
    let (format, width, height) = (frame_args.format, frame_args.width, frame_args.height);
    pipeline
        .check_clip(&VideoInfo::new(format, width, height))
        .with_context(|| format!("Cannot denoise {format} {width}x{height}"))?;
    let props = super::tag_props(frame_args.tag);

    let frame_size = raw::frame_size(&format, width, height);
    let batch = rayon::current_num_threads().max(1) * 2;
    info!(%format, width, height, frame_size, batch, "denoising {}", args.input.display());

    let mut reader = BufReader::new(
        File::open(&args.input)
            .with_context(|| format!("Failed to open: {}", args.input.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("Failed to create: {}", args.output.display()))?,
    );

    let mut frames = 0usize;
    loop {
        let chunk = read_batch(&mut reader, frame_size, batch)
            .with_context(|| format!("Failed to read: {}", args.input.display()))?;
        if chunk.is_empty() {
            break;
        }

        let outputs = chunk
            .par_iter()
            .enumerate()
            .map(|(i, bytes)| -> Result<Vec<u8>> {
                let index = frames + i;
                let frame = raw::decode_frame(bytes, &format, width, height)?
                    .with_props(props.clone());
                let out = pipeline
                    .process(&frame)
                    .with_context(|| format!("Frame {index} failed"))?;
                let mut encoded = Vec::with_capacity(frame_size);
                raw::encode_frame(&out, &mut encoded);
                Ok(encoded)
            })
            .collect::<Result<Vec<_>>>()?;

        for encoded in &outputs {
            writer
                .write_all(encoded)
                .with_context(|| format!("Failed to write: {}", args.output.display()))?;
        }
        frames += chunk.len();
        debug!(frames, "batch written");
    }
    writer.flush()?;

    info!(frames, "done");
    if verbose {
        println!(
            "{} -> {} ({frames} frames, {format} {width}x{height})",
            args.input.display(),
            args.output.display()
        );
    }
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn build_config(args: &DenoiseArgs) -> Result<DenoiseConfig> {
    let mut config = match &args.config {
        Some(path) => DenoiseConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DenoiseConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(matrix) = args.matrix {
        config.matrix = Some(matrix);
    }
    if let Some(filter) = args.upsample {
        config.chroma_upsample = filter;
    }
    if let Some(filter) = args.downsample {
        config.chroma_downsample = filter;
    }
    Ok(config)
}

/// Reads up to `count` whole frames. A trailing partial frame is an error.
fn read_batch(reader: &mut impl Read, frame_size: usize, count: usize) -> Result<Vec<Vec<u8>>> {
    let mut batch = Vec::with_capacity(count);
    while batch.len() < count {
        let mut buf = vec![0u8; frame_size];
        let filled = fill(reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        if filled < frame_size {
            bail!("trailing partial frame: {filled} of {frame_size} bytes");
        }
        batch.push(buf);
    }
    Ok(batch)
}

fn fill(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
