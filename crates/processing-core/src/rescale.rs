//! Brightness rescaling.
//!
//! Samples are scaled on the normalized intensity scale and converted back to
//! the frame's own representation. Anything pushed to or past full scale is
//! pinned at full scale; integer frames are rounded, so a round trip through
//! the normalized scale loses at most half a quantization step.

use deflicker_frame_model::frame::{Frame, Sample, Samples};
use deflicker_frame_model::series::ScaleFactor;

/// Scale every sample of `frame` by `scale`, keeping its type and shape.
pub fn rescale(frame: &Frame, scale: ScaleFactor) -> Frame {
    let factor = scale.value();
    let samples = match frame.samples() {
        Samples::U8(s) => Samples::U8(scale_samples(s, factor)),
        Samples::U16(s) => Samples::U16(scale_samples(s, factor)),
        Samples::F32(s) => Samples::F32(scale_samples(s, factor)),
    };
    frame.with_samples(samples)
}

fn scale_samples<S: Sample>(samples: &[S], factor: f64) -> Vec<S> {
    samples
        .iter()
        .map(|&s| S::from_unit(clamp_full_scale(s.to_unit() * factor)))
        .collect()
}

/// Pin values at or above full scale to exactly 1.0.
fn clamp_full_scale(value: f64) -> f64 {
    if value >= 1.0 {
        1.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(value: f64) -> ScaleFactor {
        ScaleFactor::new(value).unwrap()
    }

    #[test]
    fn test_identity_scale_keeps_integer_frames() {
        let data: Vec<u8> = (0..=255).collect();
        let frame = Frame::new(16, 16, 1, Samples::U8(data)).unwrap();
        assert_eq!(rescale(&frame, ScaleFactor::IDENTITY), frame);

        let data: Vec<u16> = (0..300).map(|i| (i * 218) as u16).collect();
        let frame = Frame::new(100, 1, 3, Samples::U16(data)).unwrap();
        assert_eq!(rescale(&frame, ScaleFactor::IDENTITY), frame);
    }

    #[test]
    fn test_scaling_rounds_to_nearest() {
        let frame = Frame::new(3, 1, 1, Samples::U8(vec![10, 100, 102])).unwrap();
        let out = rescale(&frame, scale(1.5));
        assert_eq!(out.samples(), &Samples::U8(vec![15, 150, 153]));

        let out = rescale(&frame, scale(0.5));
        assert_eq!(out.samples(), &Samples::U8(vec![5, 50, 51]));
    }

    #[test]
    fn test_overflow_clamps_to_type_maximum() {
        let frame = Frame::new(3, 1, 1, Samples::U8(vec![200, 250, 255])).unwrap();
        let out = rescale(&frame, scale(4.0));
        assert_eq!(out.samples(), &Samples::U8(vec![255, 255, 255]));

        let frame = Frame::new(2, 1, 1, Samples::U16(vec![40_000, 65_535])).unwrap();
        let out = rescale(&frame, scale(2.0));
        assert_eq!(out.samples(), &Samples::U16(vec![u16::MAX, u16::MAX]));

        let frame = Frame::new(2, 1, 1, Samples::F32(vec![0.6, 0.2])).unwrap();
        let out = rescale(&frame, scale(2.0));
        match out.samples() {
            Samples::F32(s) => {
                assert_eq!(s[0], 1.0);
                assert!((s[1] - 0.4).abs() < 1e-6);
            }
            other => panic!("sample type changed: {other:?}"),
        }
    }

    #[test]
    fn test_shape_and_type_are_preserved() {
        let frame = Frame::new(2, 3, 4, Samples::U16(vec![1_000; 24])).unwrap();
        let out = rescale(&frame, scale(0.8));
        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 3);
        assert_eq!(out.channels(), 4);
        assert_eq!(out.sample_type(), frame.sample_type());
        assert_eq!(out.samples(), &Samples::U16(vec![800; 24]));
    }

    #[test]
    fn test_float_identity_within_rounding() {
        let data = vec![0.0f32, 0.123, 0.5, 0.999, 1.0];
        let frame = Frame::new(5, 1, 1, Samples::F32(data.clone())).unwrap();
        match rescale(&frame, ScaleFactor::IDENTITY).samples() {
            Samples::F32(s) => {
                for (a, b) in s.iter().zip(&data) {
                    assert!((a - b).abs() < 1e-7);
                }
            }
            other => panic!("sample type changed: {other:?}"),
        }
    }
}
