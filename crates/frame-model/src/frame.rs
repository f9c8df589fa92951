//! Decoded frames and their sample representations.
//!
//! A frame stores interleaved, row-major samples in exactly one of three
//! representations. Every algorithm branches on [`Samples`] explicitly and
//! converts through the [`Sample`] trait, one implementation per
//! representation.

use deflicker_common::error::{DeflickerError, DeflickerResult};
use serde::{Deserialize, Serialize};

/// Storage type of a frame's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    /// 8-bit unsigned, full scale 255.
    U8,
    /// 16-bit unsigned, full scale 65535.
    U16,
    /// Floating point, already normalized to [0, 1].
    F32,
}

/// Conversion between a stored sample and normalized intensity.
pub trait Sample: Copy {
    /// Normalized intensity of this sample.
    fn to_unit(self) -> f64;

    /// Quantize a normalized intensity back into this representation.
    fn from_unit(value: f64) -> Self;
}

impl Sample for u8 {
    fn to_unit(self) -> f64 {
        self as f64 / u8::MAX as f64
    }

    // Halfway values round away from zero, not to even.
    fn from_unit(value: f64) -> Self {
        (value * u8::MAX as f64).round().clamp(0.0, u8::MAX as f64) as u8
    }
}

impl Sample for u16 {
    fn to_unit(self) -> f64 {
        self as f64 / u16::MAX as f64
    }

    // Same rounding as u8.
    fn from_unit(value: f64) -> Self {
        (value * u16::MAX as f64).round().clamp(0.0, u16::MAX as f64) as u16
    }
}

impl Sample for f32 {
    fn to_unit(self) -> f64 {
        self as f64
    }

    fn from_unit(value: f64) -> Self {
        value as f32
    }
}

/// Interleaved sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl Samples {
    pub fn sample_type(&self) -> SampleType {
        match self {
            Samples::U8(_) => SampleType::U8,
            Samples::U16(_) => SampleType::U16,
            Samples::F32(_) => SampleType::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::U8(s) => s.len(),
            Samples::U16(s) => s.len(),
            Samples::F32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every sample as normalized intensity, in storage order.
    pub fn to_unit_vec(&self) -> Vec<f64> {
        match self {
            Samples::U8(s) => s.iter().map(|v| v.to_unit()).collect(),
            Samples::U16(s) => s.iter().map(|v| v.to_unit()).collect(),
            Samples::F32(s) => s.iter().map(|v| v.to_unit()).collect(),
        }
    }
}

/// A decoded image of `height × width × channels` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: u8,
    samples: Samples,
}

impl Frame {
    /// Create a frame, checking that the buffer matches the shape.
    pub fn new(width: u32, height: u32, channels: u8, samples: Samples) -> DeflickerResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(DeflickerError::Other(anyhow::anyhow!(
                "Unsupported channel count: {channels}"
            )));
        }

        let expected = width as usize * height as usize * channels as usize;
        if samples.len() != expected {
            return Err(DeflickerError::Other(anyhow::anyhow!(
                "Sample buffer has {} values, expected {expected} for {width}x{height}x{channels}",
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    pub fn sample_type(&self) -> SampleType {
        self.samples.sample_type()
    }

    /// Number of spatial positions.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// A new frame of the same shape holding `samples`.
    ///
    /// The buffer may change representation but must keep its length.
    pub fn with_samples(&self, samples: Samples) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            samples,
        }
    }
}
