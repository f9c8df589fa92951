//! Validated run parameters.

use deflicker_common::error::{DeflickerError, DeflickerResult};
use deflicker_frame_model::format::OutputFormat;

/// Parameters of a deflicker run, checked before any image is touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeflickerSettings {
    window: usize,
    sigma: Option<f64>,
    format: OutputFormat,
}

impl DeflickerSettings {
    /// Validate and bundle the run parameters.
    ///
    /// `window` must be positive; `sigma`, when given, must be positive and
    /// finite.
    pub fn new(window: usize, sigma: Option<f64>, format: OutputFormat) -> DeflickerResult<Self> {
        if window == 0 {
            return Err(DeflickerError::invalid_configuration(
                "--window has to be a positive integer",
            ));
        }

        if let Some(sigma) = sigma {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(DeflickerError::invalid_configuration(format!(
                    "--sigma must be positive, got {sigma}"
                )));
            }
        }

        Ok(Self {
            window,
            sigma,
            format,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}
