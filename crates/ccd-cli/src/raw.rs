//! Headerless planar frame I/O.
//!
//! A frame is its planes stored back to back, each row-major at its own
//! (possibly subsampled) size. 8-bit samples take one byte; deeper integer
//! and half samples two; single floats four. Multi-byte samples are
//! little-endian.

use anyhow::{bail, Result};
use ccd_core::{Frame, FrameFormat, Plane, SampleType, Samples};
use half::f16;

/// Bytes per stored sample.
pub fn bytes_per_sample(format: &FrameFormat) -> usize {
    match (format.sample_type(), format.bits_per_sample()) {
        (SampleType::Integer, 8) => 1,
        (SampleType::Float, 32) => 4,
        _ => 2,
    }
}

/// Size in bytes of one stored frame.
pub fn frame_size(format: &FrameFormat, width: u32, height: u32) -> usize {
    (0..format.plane_count())
        .map(|i| {
            let (w, h) = format.plane_dimensions(i, width, height);
            w as usize * h as usize
        })
        .sum::<usize>()
        * bytes_per_sample(format)
}

/// Decodes one frame from exactly [`frame_size`] bytes.
pub fn decode_frame(bytes: &[u8], format: &FrameFormat, width: u32, height: u32) -> Result<Frame> {
    let expected = frame_size(format, width, height);
    if bytes.len() != expected {
        bail!("raw frame is {} bytes, expected {expected}", bytes.len());
    }

    let bps = bytes_per_sample(format);
    let mut offset = 0;
    let mut planes = Vec::with_capacity(format.plane_count());
    for i in 0..format.plane_count() {
        let (w, h) = format.plane_dimensions(i, width, height);
        let len = w as usize * h as usize * bps;
        let data = &bytes[offset..offset + len];
        offset += len;

        let plane = match (format.sample_type(), bps) {
            (SampleType::Integer, 1) => Plane::from_u8(w, h, data.to_vec())?,
            (SampleType::Integer, _) => Plane::from_u16(
                w,
                h,
                data.chunks_exact(2)
                    .map(|b| u16::from_le_bytes([b[0], b[1]]))
                    .collect(),
            )?,
            (SampleType::Float, 2) => Plane::from_f16(
                w,
                h,
                data.chunks_exact(2)
                    .map(|b| f16::from_le_bytes([b[0], b[1]]))
                    .collect(),
            )?,
            (SampleType::Float, _) => Plane::from_f32(
                w,
                h,
                data.chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect(),
            )?,
        };
        planes.push(plane);
    }
    Ok(Frame::new(*format, width, height, planes)?)
}

/// Appends the stored form of `frame` to `out`.
pub fn encode_frame(frame: &Frame, out: &mut Vec<u8>) {
    for plane in frame.planes() {
        match plane.samples() {
            Samples::U8(v) => out.extend_from_slice(v),
            Samples::U16(v) => out.extend(v.iter().flat_map(|s| s.to_le_bytes())),
            Samples::F16(v) => out.extend(v.iter().flat_map(|s| s.to_le_bytes())),
            Samples::F32(v) => out.extend(v.iter().flat_map(|s| s.to_le_bytes())),
        }
    }
}
