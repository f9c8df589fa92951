//! Per-frame brightness estimation.
//!
//! Brightness is the mean normalized intensity of a frame. With sigma
//! clipping enabled, pixels that are outliers in any color channel are left
//! out of the mean, so that a passing headlight or a blown-out sky patch
//! does not drag the estimate.

use deflicker_common::error::{DeflickerError, DeflickerResult};
use deflicker_frame_model::frame::Frame;

/// Channel standard deviations at or below this are treated as constant.
///
/// Summing identical values can leave a residual of a few ulps, which would
/// otherwise turn every pixel of a flat channel into an outlier.
const MIN_CHANNEL_STD: f64 = 1e-12;


/// Brightness estimator with optional sigma clipping.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrightnessEstimator {
    sigma: Option<f64>,
}

/// Result of a brightness estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessEstimate {
    /// Mean normalized intensity of the included pixels.
    pub brightness: f64,

    /// Pixels that survived sigma clipping.
    pub included_pixels: usize,

    /// Pixels in the frame.
    pub total_pixels: usize,
}

impl BrightnessEstimator {
    /// Create an estimator. `sigma = None` disables clipping.
    pub fn new(sigma: Option<f64>) -> Self {
        Self { sigma }
    }

    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    /// Brightness of `frame` on the normalized intensity scale.
    pub fn estimate(&self, frame: &Frame) -> DeflickerResult<f64> {
        self.estimate_with_stats(frame).map(|e| e.brightness)
    }

    /// Brightness of `frame` together with the clipping statistics.
    pub fn estimate_with_stats(&self, frame: &Frame) -> DeflickerResult<BrightnessEstimate> {
        let total_pixels = frame.pixel_count();
        if total_pixels == 0 {
            return Err(DeflickerError::Other(anyhow::anyhow!(
                "Cannot estimate the brightness of an empty frame"
            )));
        }

        let channels = frame.channels() as usize;
        let values = frame.samples().to_unit_vec();

        let Some(sigma) = self.sigma else {
            let brightness = values.iter().sum::<f64>() / values.len() as f64;
            return Ok(BrightnessEstimate {
                brightness,
                included_pixels: total_pixels,
                total_pixels,
            });
        };

        let mask = clip_mask(&values, channels, sigma);
        let included_pixels = mask.iter().filter(|&&keep| keep).count();
        if included_pixels == 0 {
            return Err(DeflickerError::degenerate_brightness(sigma));
        }

        let sum: f64 = values
            .chunks_exact(channels)
            .zip(&mask)
            .filter(|(_, &keep)| keep)
            .map(|(pixel, _)| pixel.iter().sum::<f64>())
            .sum();

        Ok(BrightnessEstimate {
            brightness: sum / (included_pixels * channels) as f64,
            included_pixels,
            total_pixels,
        })
    }
}

/// Brightness of `frame`, optionally sigma clipped.
pub fn estimate(frame: &Frame, sigma: Option<f64>) -> DeflickerResult<f64> {
    BrightnessEstimator::new(sigma).estimate(frame)
}

/// Per-pixel inclusion mask.
///
/// A pixel is excluded as soon as one of its color channels lies more than
/// `sigma` standard deviations from that channel's mean.
fn clip_mask(values: &[f64], channels: usize, sigma: f64) -> Vec<bool> {
    let mut mask = vec![true; values.len() / channels];

    for channel in 0..color_channels(channels) {
        let (mean, std) = channel_stats(values, channels, channel);
        if std.is_nan() || std <= MIN_CHANNEL_STD {
            continue;
        }

        for (keep, pixel) in mask.iter_mut().zip(values.chunks_exact(channels)) {
            if (pixel[channel] - mean).abs() / std > sigma {
                *keep = false;
            }
        }
    }

    mask
}

/// Leading color channels of an interleaved layout. Alpha, when present, is
/// never used to reject pixels.
fn color_channels(channels: usize) -> usize {
    match channels {
        1 | 2 => 1,
        _ => 3,
    }
}

/// Population mean and standard deviation of one channel.
fn channel_stats(values: &[f64], channels: usize, channel: usize) -> (f64, f64) {
    let count = (values.len() / channels) as f64;
    let mean = values
        .iter()
        .skip(channel)
        .step_by(channels)
        .sum::<f64>()
        / count;
    let variance = values
        .iter()
        .skip(channel)
        .step_by(channels)
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / count;
    (mean, variance.sqrt())
}
