//! CCD behavior on whole frames.

use approx::assert_abs_diff_eq;
use ccd_core::{Frame, FrameFormat, FrameProps, Plane, MATRIX_PROP};
use ccd_denoise::{Ccd, CcdParams, Denoiser};

/// RGBS frame of a flat color with deterministic low-amplitude noise.
fn noisy(width: u32, height: u32, base: [f32; 3], amp: f32) -> Frame {
    let n = (width * height) as usize;
    let mut seed = 0x2545_f491u32;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed as f32 / u32::MAX as f32 - 0.5) * 2.0 * amp
    };
    let planes = base
        .iter()
        .map(|&b| {
            let data = (0..n).map(|_| b + next()).collect();
            Plane::from_f32(width, height, data).unwrap()
        })
        .collect();
    Frame::new(FrameFormat::RGBS, width, height, planes).unwrap()
}

fn variance(plane: &[f32]) -> f32 {
    let mean = plane.iter().sum::<f32>() / plane.len() as f32;
    plane.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / plane.len() as f32
}

#[test]
fn noise_variance_drops() {
    let frame = noisy(48, 48, [0.4, 0.5, 0.3], 0.004);
    let out = Ccd::new(CcdParams::square(9, 2)).unwrap().denoise(&frame, 8.0).unwrap();
    for (a, b) in frame.planes().iter().zip(out.planes()) {
        let before = variance(a.as_f32().unwrap());
        let after = variance(b.as_f32().unwrap());
        assert!(after < before * 0.5, "variance {before} -> {after}");
    }
}

#[test]
fn output_keeps_format_size_and_props() {
    let frame = noisy(32, 16, [0.5; 3], 0.01).with_props(FrameProps::new().with(MATRIX_PROP, 1));
    let out = Ccd::new(CcdParams::square(15, 7)).unwrap().denoise(&frame, 4.0).unwrap();
    assert_eq!(out.format(), &FrameFormat::RGBS);
    assert_eq!(out.dimensions(), (32, 16));
    assert_eq!(out.props(), frame.props());
}

#[test]
fn deterministic_across_runs() {
    let frame = noisy(40, 40, [0.2, 0.6, 0.4], 0.01);
    let ccd = Ccd::default();
    let a = ccd.denoise(&frame, 6.0).unwrap();
    let b = ccd.denoise(&frame, 6.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn minimum_frame_size_accepted() {
    let frame = noisy(12, 12, [0.5; 3], 0.001);
    let out = Ccd::new(CcdParams::square(11, 5)).unwrap().denoise(&frame, 4.0).unwrap();
    let mean: f32 = out.plane(0).unwrap().as_f32().unwrap().iter().sum::<f32>() / 144.0;
    assert_abs_diff_eq!(mean, 0.5, epsilon = 1e-3);
}
