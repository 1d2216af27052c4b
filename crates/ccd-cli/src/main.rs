//! ccd - chroma denoise for raw planar video
//!
//! Reads headerless planar frames, denoises their chroma and writes them back
//! in the same layout.

use anyhow::{Context, Result};
use ccd::{ColorMatrix, Filter};
use ccd_core::FrameFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod raw;

#[derive(Parser)]
#[command(name = "ccd")]
#[command(author, version, about = "Luma-preserving chroma denoise")]
#[command(long_about = "
Removes chroma noise from raw planar video while leaving luma untouched.

Frames are headerless and planar, multi-byte samples little-endian, with the
planes of each frame stored back to back (Y then U then V, or R then G then B).

Examples:
  ccd denoise in.yuv -o out.yuv -W 1920 -H 1080 -f yuv420p8
  ccd denoise in.yuv -o out.yuv -W 720 -H 480 -f yuv422p10 -t 6 --matrix 170m
  ccd denoise in.rgb -o out.rgb -W 640 -H 360 -f rgb24 --config ccd.yaml -j 4
  ccd resolve -f yuv420p8 -W 1920 -H 1080 --tag 2
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Denoise a raw planar clip
    #[command(visible_alias = "d")]
    Denoise(DenoiseArgs),

    /// Print the matrix a frame would be processed with
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),
}

/// Frame geometry shared by every subcommand.
#[derive(Args, Clone)]
struct FrameArgs {
    /// Frame width in pixels
    #[arg(short = 'W', long)]
    width: u32,

    /// Frame height in pixels
    #[arg(short = 'H', long)]
    height: u32,

    /// Sample format (yuv420p8, yuv444p16, ycocg420p10, rgb24, rgbs, ...)
    #[arg(short, long)]
    format: FrameFormat,

    /// `_Matrix` tag attached to every frame
    #[arg(long)]
    tag: Option<i64>,
}

#[derive(Args)]
struct DenoiseArgs {
    /// Input raw file
    input: PathBuf,

    /// Output raw file
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    frame: FrameArgs,

    /// Denoise threshold (overrides config)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Color matrix (709, 170m, 470bg, 240m, 2020ncl, 2020cl, ycocg)
    #[arg(short, long)]
    matrix: Option<ColorMatrix>,

    /// Chroma upsampling kernel (point, bilinear, bicubic, mitchell, lanczos3, bicubic:B:C)
    #[arg(long)]
    upsample: Option<Filter>,

    /// Chroma downsampling kernel
    #[arg(long)]
    downsample: Option<Filter>,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ResolveArgs {
    #[command(flatten)]
    frame: FrameArgs,

    /// Explicit matrix, as it would be passed to `denoise`
    #[arg(short, long)]
    matrix: Option<ColorMatrix>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ccd=debug" } else { "ccd=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Denoise(args) => commands::denoise::run(args, cli.verbose),
        Commands::Resolve(args) => commands::resolve::run(args),
    }
}
