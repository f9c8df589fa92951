//! Rolling-mean target brightness.
//!
//! Targets are the moving average over every fully covered window of
//! `window` consecutive frames. The averaged series is shorter than the input
//! by `window - 1` entries and is centered in the output; frames outside the
//! averaged span get [`TargetBrightness::Undefined`].

use deflicker_common::error::{DeflickerError, DeflickerResult};
use deflicker_frame_model::series::{TargetBrightness, TargetSeries};

/// Computes rolling-mean targets over a fixed window.
#[derive(Debug, Clone, Copy)]
pub struct TargetBrightnessSmoother {
    window: usize,
}

impl TargetBrightnessSmoother {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Targets for `brightness`, same length and order as the input.
    pub fn smooth(&self, brightness: &[f64]) -> DeflickerResult<TargetSeries> {
        rolling_mean(brightness, self.window)
    }
}

/// Rolling mean of `data` over `window`, padded with undefined targets.
///
/// The leading pad holds `(n - (n - window + 1)) / 2` entries (integer
/// division), the trailing pad holds the rest.
pub fn rolling_mean(data: &[f64], window: usize) -> DeflickerResult<TargetSeries> {
    if window == 0 || window > data.len() {
        return Err(DeflickerError::InvalidWindow {
            window,
            count: data.len(),
        });
    }

    let averaged = valid_moving_average(data, window);
    let leading = (data.len() - averaged.len()) / 2;
    let trailing = data.len() - averaged.len() - leading;

    let mut result = Vec::with_capacity(data.len());
    result.extend(std::iter::repeat(TargetBrightness::Undefined).take(leading));
    result.extend(averaged.into_iter().map(TargetBrightness::Defined));
    result.extend(std::iter::repeat(TargetBrightness::Undefined).take(trailing));

    tracing::debug!(
        window,
        frames = data.len(),
        leading,
        trailing,
        "Computed rolling-mean targets"
    );

    Ok(result)
}

/// Unweighted mean of every complete window, `data.len() - window + 1` values.
///
/// Returns an empty vector when no window fits.
pub fn valid_moving_average(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }

    data.windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}
