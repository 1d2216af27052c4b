//! End-to-end pipeline behavior with reference and stub collaborators.

use approx::assert_abs_diff_eq;
use ccd::{ChromaDenoise, ColorMatrix, DenoiseConfig, Error};
use ccd_core::{ColorFamily, Frame, FrameFormat, FrameProps, Plane, MATRIX_PROP};
use ccd_denoise::{Ccd, DenoiseError, DenoiseResult, Denoiser};
use ccd_resample::{ConvertOptions, CpuResampler, Filter, ResampleResult, Resampler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

/// Swaps the red and blue planes, a large chroma change.
struct SwapRedBlue;

impl Denoiser for SwapRedBlue {
    fn denoise(&self, frame: &Frame, _threshold: f32) -> DenoiseResult<Frame> {
        let p = frame.planes();
        let planes = vec![p[2].clone(), p[1].clone(), p[0].clone()];
        Ok(Frame::new(*frame.format(), frame.width(), frame.height(), planes)?)
    }
}

/// Returns its input and records every threshold it sees.
#[derive(Default)]
struct Passthrough {
    thresholds: Mutex<Vec<f32>>,
}

impl Denoiser for Passthrough {
    fn denoise(&self, frame: &Frame, threshold: f32) -> DenoiseResult<Frame> {
        self.thresholds.lock().unwrap().push(threshold);
        Ok(frame.clone())
    }
}

/// Forwards to the CPU resampler and records each request.
#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<(FrameFormat, FrameFormat, ConvertOptions)>>,
}

impl Recording {
    fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Source matrix of the conversion into working RGB.
    fn working_matrix(&self) -> Option<ColorMatrix> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(from, to, _)| {
                *to == FrameFormat::RGBS && from.color_family() != ColorFamily::Rgb
            })
            .and_then(|(_, _, opts)| opts.matrix_in)
    }
}

impl Resampler for Recording {
    fn convert(
        &self,
        frame: &Frame,
        target: &FrameFormat,
        options: &ConvertOptions,
    ) -> ResampleResult<Frame> {
        self.calls
            .lock()
            .unwrap()
            .push((*frame.format(), *target, *options));
        CpuResampler.convert(frame, target, options)
    }
}

/// Returns float RGB whenever integer RGB is requested.
struct DropsDepth;

impl Resampler for DropsDepth {
    fn convert(
        &self,
        frame: &Frame,
        target: &FrameFormat,
        options: &ConvertOptions,
    ) -> ResampleResult<Frame> {
        let target = if target.color_family() == ColorFamily::Rgb {
            FrameFormat::RGBS
        } else {
            *target
        };
        CpuResampler.convert(frame, &target, options)
    }
}

/// Counts calls and then fails the test if anything runs.
#[derive(Default)]
struct Untouched {
    calls: AtomicUsize,
}

impl Denoiser for Untouched {
    fn denoise(&self, frame: &Frame, _threshold: f32) -> DenoiseResult<Frame> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(frame.clone())
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Smooth in-gamut RGB content.
fn rgbs(width: u32, height: u32) -> Frame {
    let n = (width * height) as usize;
    let mut planes = [Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n)];
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / width as f32;
            let v = y as f32 / height as f32;
            planes[0].push(0.2 + 0.6 * u);
            planes[1].push(0.3 + 0.4 * v);
            planes[2].push(0.25 + 0.5 * (u * v).sqrt());
        }
    }
    let planes = planes
        .into_iter()
        .map(|p| Plane::from_f32(width, height, p).unwrap())
        .collect();
    Frame::new(FrameFormat::RGBS, width, height, planes).unwrap()
}

/// Textured frame in `format`.
fn frame(format: FrameFormat, width: u32, height: u32) -> Frame {
    let matrix = match format.color_family() {
        ColorFamily::YCoCg => ColorMatrix::YCoCg,
        _ => ColorMatrix::Bt709,
    };
    CpuResampler
        .convert(
            &rgbs(width, height),
            &format,
            &ConvertOptions::default().matrix_out(matrix),
        )
        .unwrap()
}

fn ycc_formats() -> Vec<FrameFormat> {
    vec![
        FrameFormat::YUV420P8,
        FrameFormat::YUV420P10,
        FrameFormat::YUV422P8,
        FrameFormat::YUV444P8,
        FrameFormat::YUV444P16,
        FrameFormat::YUV444PS,
        "yuv444ph".parse().unwrap(),
        "yuv410p8".parse().unwrap(),
        "ycocg420p8".parse().unwrap(),
        "ycocg444p16".parse().unwrap(),
    ]
}

fn rgb_luma(frame: &Frame, matrix: ColorMatrix, target: FrameFormat) -> Vec<f32> {
    CpuResampler
        .convert(frame, &target, &ConvertOptions::point().matrix_out(matrix))
        .unwrap()
        .luma()
        .unwrap()
        .to_f32_vec()
}

// ---------------------------------------------------------------------------
// Luma invariance and format preservation
// ---------------------------------------------------------------------------

#[test]
fn ycc_luma_is_bit_identical_under_chroma_scrambling() {
    let pipeline = ChromaDenoise::with_parts(CpuResampler, SwapRedBlue, DenoiseConfig::default());
    for format in ycc_formats() {
        let input = frame(format, 32, 16);
        let out = pipeline.process(&input).unwrap();
        assert_eq!(out.format(), &format);
        assert_eq!(out.luma(), input.luma(), "{format}");
        assert!(out.luma().unwrap().ptr_eq(input.luma().unwrap()), "{format}");
        assert_ne!(out.plane(1), input.plane(1), "{format}: chroma should change");
    }
}

#[test]
fn rgbs_luma_is_preserved_under_chroma_scrambling() {
    let pipeline = ChromaDenoise::with_parts(CpuResampler, SwapRedBlue, DenoiseConfig::default());
    let input = rgbs(24, 16);

    // 24x16 is SD: 170m when nothing is given. 2020cl is the non-linear path.
    let cases = [
        (None, ColorMatrix::St170m),
        (Some(ColorMatrix::Bt709), ColorMatrix::Bt709),
        (Some(ColorMatrix::Bt2020Cl), ColorMatrix::Bt2020Cl),
    ];
    for (explicit, matrix) in cases {
        let out = pipeline.process_with(&input, 4.0, explicit).unwrap();
        assert_eq!(out.format(), &FrameFormat::RGBS);

        let before = rgb_luma(&input, matrix, FrameFormat::GRAYS);
        let after = rgb_luma(&out, matrix, FrameFormat::GRAYS);
        for (a, b) in before.iter().zip(&after) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
        assert_ne!(out.plane(0), input.plane(0), "{matrix}");
    }
}

#[test]
fn integer_rgb_luma_is_preserved_to_rounding() {
    let pipeline = ChromaDenoise::with_parts(CpuResampler, SwapRedBlue, DenoiseConfig::default());
    for format in [FrameFormat::RGB24, FrameFormat::RGB48] {
        let input = frame(format, 24, 16);
        let out = pipeline.process(&input).unwrap();
        assert_eq!(out.format(), &format);

        let gray = FrameFormat::GRAYS;
        let before = rgb_luma(&input, ColorMatrix::St170m, gray);
        let after = rgb_luma(&out, ColorMatrix::St170m, gray);
        let step = 2.0 / format.peak_value() as f32;
        for (a, b) in before.iter().zip(&after) {
            assert_abs_diff_eq!(a, b, epsilon = step);
        }
    }
}

#[test]
fn reference_kernel_preserves_every_format() {
    let pipeline = ChromaDenoise::new(DenoiseConfig::default()).unwrap();
    let mut formats = ycc_formats();
    formats.extend([FrameFormat::RGB24, FrameFormat::RGB48, FrameFormat::RGBS, FrameFormat::RGBH]);
    for format in formats {
        let input = frame(format, 32, 32);
        let out = pipeline.process(&input).unwrap();
        assert_eq!(out.format(), input.format());
        assert_eq!(out.dimensions(), input.dimensions());
        if format.color_family() != ColorFamily::Rgb {
            assert_eq!(out.luma(), input.luma(), "{format}");
        }
    }
}

#[test]
fn props_are_returned_untouched() {
    let props = FrameProps::new()
        .with(MATRIX_PROP, 6)
        .with("_SARNum", 1)
        .with("_Comment", "keep me");
    let input = frame(FrameFormat::YUV420P8, 32, 32).with_props(props.clone());
    let out = ccd::process(&input, 4.0, None).unwrap();
    assert_eq!(out.props(), &props);
}

// ---------------------------------------------------------------------------
// Matrix resolution through the pipeline
// ---------------------------------------------------------------------------

fn working_matrix(input: &Frame, explicit: Option<ColorMatrix>) -> ColorMatrix {
    let recording = Recording::default();
    let pipeline = ChromaDenoise::with_parts(&recording, Passthrough::default(), DenoiseConfig::default());
    pipeline.process_with(input, 4.0, explicit).unwrap();
    recording.working_matrix().unwrap()
}

#[test]
fn hd_unspecified_tag_uses_709() {
    let input = Frame::blank(FrameFormat::YUV420P8, 1920, 1080)
        .unwrap()
        .with_props(FrameProps::new().with(MATRIX_PROP, 2));
    assert_eq!(working_matrix(&input, None), ColorMatrix::Bt709);
}

#[test]
fn sd_untagged_uses_170m() {
    let input = Frame::blank(FrameFormat::YUV420P8, 640, 480).unwrap();
    assert_eq!(working_matrix(&input, None), ColorMatrix::St170m);
}

#[test]
fn tag_selects_matrix() {
    let input = frame(FrameFormat::YUV444P8, 32, 32).with_props(FrameProps::new().with(MATRIX_PROP, 9));
    assert_eq!(working_matrix(&input, None), ColorMatrix::Bt2020Ncl);
    assert_eq!(
        working_matrix(&input, Some(ColorMatrix::St240m)),
        ColorMatrix::St240m
    );
}

#[test]
fn ycocg_matrix_is_fixed() {
    let input = frame("ycocg420p8".parse().unwrap(), 32, 32)
        .with_props(FrameProps::new().with(MATRIX_PROP, 1));
    assert_eq!(working_matrix(&input, None), ColorMatrix::YCoCg);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

fn assert_fails_fast(input: &Frame, check: impl Fn(&Error) -> bool) {
    let recording = Recording::default();
    let denoiser = Untouched::default();
    let pipeline = ChromaDenoise::with_parts(&recording, &denoiser, DenoiseConfig::default());
    let err = pipeline.process(input).unwrap_err();
    assert!(check(&err), "unexpected error: {err}");
    assert_eq!(recording.count(), 0);
    assert_eq!(denoiser.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_tag_fails_before_any_work() {
    let input = frame(FrameFormat::YUV420P8, 32, 32).with_props(FrameProps::new().with(MATRIX_PROP, 3));
    assert_fails_fast(&input, |e| {
        e.is_matrix_tag_error()
            && matches!(e, Error::Color(ccd_color::ColorError::UnrecognizedMatrixTag { code: 3 }))
    });
}

#[test]
fn non_integer_tag_fails_before_any_work() {
    let input =
        frame(FrameFormat::YUV420P8, 32, 32).with_props(FrameProps::new().with(MATRIX_PROP, "709"));
    assert_fails_fast(&input, |e| {
        matches!(e, Error::Color(ccd_color::ColorError::BadMetadataType { .. }))
    });
}

#[test]
fn gray_is_rejected_before_any_work() {
    let input = Frame::blank(FrameFormat::GRAY8, 32, 32).unwrap();
    assert_fails_fast(&input, Error::is_unsupported_format);

    let other = Frame::blank(FrameFormat::RGB24.with_family(ColorFamily::Other), 32, 32).unwrap();
    assert_fails_fast(&other, Error::is_unsupported_format);
}

#[test]
fn gray_rejected_even_with_explicit_matrix() {
    let input = Frame::blank(FrameFormat::GRAYS, 32, 32).unwrap();
    let err = ccd::process(&input, 4.0, Some(ColorMatrix::Bt709)).unwrap_err();
    assert!(err.is_unsupported_format());
}

#[test]
fn invalid_threshold_fails_before_any_work() {
    let recording = Recording::default();
    let denoiser = Untouched::default();
    let pipeline =
        ChromaDenoise::with_parts(&recording, &denoiser, DenoiseConfig::with_threshold(-1.0));
    let input = frame(FrameFormat::YUV444P8, 32, 32);

    let err = pipeline.process(&input).unwrap_err();
    assert!(matches!(err, Error::Denoise(DenoiseError::InvalidParameter(_))));
    for threshold in [f32::NAN, f32::INFINITY, -0.5] {
        assert!(pipeline.process_with(&input, threshold, None).is_err(), "{threshold}");
    }
    assert_eq!(recording.count(), 0);
    assert_eq!(denoiser.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn non_finite_kernel_fails_before_any_work() {
    let recording = Recording::default();
    let denoiser = Untouched::default();
    let config = DenoiseConfig {
        chroma_upsample: Filter::Bicubic { b: f32::NAN, c: 0.0 },
        ..DenoiseConfig::default()
    };
    let pipeline = ChromaDenoise::with_parts(&recording, &denoiser, config);

    let err = pipeline.process(&frame(FrameFormat::YUV420P8, 32, 32)).unwrap_err();
    assert!(matches!(err, Error::Resample(_)));
    assert_eq!(recording.count(), 0);
    assert_eq!(denoiser.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn format_drift_is_reported() {
    let pipeline = ChromaDenoise::with_parts(DropsDepth, Ccd::default(), DenoiseConfig::default());
    let err = pipeline.process(&frame(FrameFormat::RGB24, 32, 32)).unwrap_err();
    assert!(matches!(
        err,
        Error::FormatDrift {
            expected: FrameFormat::RGB24,
            got: FrameFormat::RGBS,
        }
    ));
}

#[test]
fn denoiser_errors_propagate() {
    // 16 px is below the default 25x25 grid
    let err = ccd::process(&frame(FrameFormat::YUV444P8, 16, 16), 4.0, None).unwrap_err();
    assert!(matches!(err, Error::Denoise(_)));
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

#[test]
fn threshold_is_passed_through_unchanged() {
    let denoiser = Passthrough::default();
    let pipeline = ChromaDenoise::with_parts(CpuResampler, &denoiser, DenoiseConfig::with_threshold(7.25));
    let input = frame(FrameFormat::YUV444P8, 32, 32);
    pipeline.process(&input).unwrap();
    pipeline.process_with(&input, 0.5, None).unwrap();
    assert_eq!(*denoiser.thresholds.lock().unwrap(), vec![7.25, 0.5]);
}

#[test]
fn zero_threshold_is_a_no_op_in_float() {
    for format in [FrameFormat::YUV444PS, FrameFormat::RGBS] {
        let input = frame(format, 32, 32);
        let out = ccd::process(&input, 0.0, None).unwrap();
        for (a, b) in input.planes().iter().zip(out.planes()) {
            for (x, y) in a.as_f32().unwrap().iter().zip(b.as_f32().unwrap()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn zero_threshold_is_a_no_op_to_rounding_in_integer() {
    for format in [FrameFormat::YUV444P8, FrameFormat::RGB24] {
        let input = frame(format, 32, 32);
        let out = ccd::process(&input, 0.0, None).unwrap();
        for (i, (a, b)) in input.planes().iter().zip(out.planes()).enumerate() {
            for (x, y) in a.to_f32_vec().iter().zip(b.to_f32_vec()) {
                assert!((x - y).abs() <= 2.0, "{format} plane {i}: {x} vs {y}");
            }
        }
    }
}

#[test]
fn zero_threshold_keeps_subsampled_chroma_away_from_edges() {
    let input = frame(FrameFormat::YUV420P8, 32, 32);
    let out = ccd::process(&input, 0.0, None).unwrap();
    assert_eq!(out.luma(), input.luma());
    for i in 1..3 {
        let a = input.plane(i).unwrap().as_u8().unwrap();
        let b = out.plane(i).unwrap().as_u8().unwrap();
        for y in 2..14 {
            for x in 2..14 {
                let (p, q) = (a[y * 16 + x] as i32, b[y * 16 + x] as i32);
                assert!((p - q).abs() <= 2, "plane {i} ({x}, {y}): {p} vs {q}");
            }
        }
    }
}
