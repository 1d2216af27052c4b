//! Runs the `ccd` binary on raw files.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn ccd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ccd"))
        .args(args)
        .output()
        .expect("failed to run ccd")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Noisy 8-bit 4:2:0 frames: a luma ramp with jittered chroma.
fn noisy_yuv420(width: usize, height: usize, frames: usize) -> Vec<u8> {
    let mut state = 0x2545_f491u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    let mut data = Vec::new();
    for f in 0..frames {
        for y in 0..height {
            for x in 0..width {
                data.push((16 + (x + y + f) % 200) as u8);
            }
        }
        for _ in 0..2 * (width / 2) * (height / 2) {
            data.push((120 + next() % 16) as u8);
        }
    }
    data
}

fn write(path: &Path, data: &[u8]) {
    fs::write(path, data).unwrap();
}

#[test]
fn resolve_uses_tag_and_resolution() {
    let hd = ccd(&["resolve", "-f", "yuv420p8", "-W", "1920", "-H", "1080", "--tag", "2"]);
    assert!(hd.status.success());
    assert_eq!(stdout(&hd), "709");

    let sd = ccd(&["resolve", "-f", "yuv420p8", "-W", "640", "-H", "480"]);
    assert_eq!(stdout(&sd), "170m");

    let tagged = ccd(&["resolve", "-f", "yuv444p16", "-W", "640", "-H", "480", "--tag", "9"]);
    assert_eq!(stdout(&tagged), "2020ncl");

    let ycocg = ccd(&["resolve", "-f", "ycocg420p8", "-W", "640", "-H", "480"]);
    assert_eq!(stdout(&ycocg), "ycocg");

    let explicit = ccd(&["resolve", "-f", "rgb24", "-W", "64", "-H", "64", "-m", "240m"]);
    assert_eq!(stdout(&explicit), "240m");
}

#[test]
fn resolve_rejects_bad_inputs() {
    let reserved = ccd(&["resolve", "-f", "yuv420p8", "-W", "1920", "-H", "1080", "--tag", "3"]);
    assert!(!reserved.status.success());

    let gray = ccd(&["resolve", "-f", "gray8", "-W", "64", "-H", "64"]);
    assert!(!gray.status.success());

    let bad_format = ccd(&["resolve", "-f", "yuv999p8", "-W", "64", "-H", "64"]);
    assert!(!bad_format.status.success());
}

#[test]
fn denoise_keeps_layout_and_luma() {
    let (w, h, n) = (32, 32, 5);
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.yuv");
    let output = dir.path().join("out.yuv");
    let data = noisy_yuv420(w, h, n);
    write(&input, &data);

    let result = ccd(&[
        "denoise",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-W",
        "32",
        "-H",
        "32",
        "-f",
        "yuv420p8",
        "-t",
        "8",
        "-j",
        "2",
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let out = fs::read(&output).unwrap();
    assert_eq!(out.len(), data.len());
    let frame = w * h + 2 * (w / 2) * (h / 2);
    for f in 0..n {
        let luma = f * frame..f * frame + w * h;
        assert_eq!(out[luma.clone()], data[luma], "frame {f} luma");
    }
    assert_ne!(out, data);
}

#[test]
fn denoise_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.yuv");
    let output = dir.path().join("out.yuv");
    let config = dir.path().join("ccd.yaml");
    let data = noisy_yuv420(16, 16, 2);
    write(&input, &data);
    fs::write(&config, "threshold: 0.0\nccd:\n  matrix_size: [5, 5]\n  offset_size: [2, 2]\n")
        .unwrap();

    let result = ccd(&[
        "denoise",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-W",
        "16",
        "-H",
        "16",
        "-f",
        "yuv420p8",
        "-c",
        config.to_str().unwrap(),
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(fs::read(&output).unwrap().len(), data.len());

    let missing = dir.path().join("missing.yaml");
    let result = ccd(&[
        "denoise",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-W",
        "16",
        "-H",
        "16",
        "-f",
        "yuv420p8",
        "-c",
        missing.to_str().unwrap(),
    ]);
    assert!(!result.status.success());
}

#[test]
fn denoise_rejects_partial_frames_and_gray() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.yuv");
    let output = dir.path().join("out.yuv");
    let mut data = noisy_yuv420(16, 16, 1);
    data.extend([0u8; 7]);
    write(&input, &data);

    let args = |format: &'static str| {
        vec![
            "denoise".to_string(),
            input.to_str().unwrap().to_string(),
            "-o".to_string(),
            output.to_str().unwrap().to_string(),
            "-W".to_string(),
            "16".to_string(),
            "-H".to_string(),
            "16".to_string(),
            "-f".to_string(),
            format.to_string(),
        ]
    };
    let run = |args: Vec<String>| {
        Command::new(env!("CARGO_BIN_EXE_ccd"))
            .args(&args)
            .output()
            .unwrap()
    };

    assert!(!run(args("yuv420p8")).status.success());
    assert!(!run(args("gray8")).status.success());
}
