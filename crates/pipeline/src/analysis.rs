//! Dry-run analysis: brightness, targets and scale factors without writing.

use std::path::{Path, PathBuf};

use deflicker_common::error::{DeflickerError, DeflickerResult};
use deflicker_frame_model::series::BrightnessSeries;
use deflicker_image_io::discovery::find_images;
use deflicker_processing_core::brightness::BrightnessEstimator;
use deflicker_processing_core::rolling_mean::TargetBrightnessSmoother;
use serde::Serialize;

use crate::progress::ProgressReporter;
use crate::run::{measure_brightness, FrameAction};
use crate::settings::DeflickerSettings;

/// Per-frame analysis of a sequence.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub input_dir: PathBuf,
    pub window: usize,
    pub sigma: Option<f64>,
    pub frames: Vec<FrameAnalysis>,
}

/// What the deflicker would do with one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameAnalysis {
    pub path: PathBuf,

    /// Observed brightness (normalized).
    pub brightness: f64,

    /// Pixels kept by sigma clipping.
    pub included_pixels: usize,

    pub total_pixels: usize,

    /// Rolling-mean target; `None` at the sequence edges.
    pub target: Option<f64>,

    /// Scale factor that would be applied; `None` when the frame is copied.
    pub scale: Option<f64>,
}

impl AnalysisReport {
    /// Frames that would be rescaled.
    pub fn corrected_count(&self) -> usize {
        self.frames.iter().filter(|f| f.scale.is_some()).count()
    }
}

/// Run the brightness pass and the smoother over `input_dir`.
pub fn analyze_directory(
    input_dir: &Path,
    settings: &DeflickerSettings,
    reporter: &dyn ProgressReporter,
) -> DeflickerResult<AnalysisReport> {
    let images = find_images(input_dir);
    if images.is_empty() {
        return Err(DeflickerError::NoInputImages {
            dir: input_dir.to_path_buf(),
        });
    }

    let estimator = BrightnessEstimator::new(settings.sigma());
    let estimates = measure_brightness(&images, &estimator, reporter)?;
    let brightness: BrightnessSeries = estimates.iter().map(|e| e.brightness).collect();
    let targets = TargetBrightnessSmoother::new(settings.window()).smooth(&brightness)?;

    let frames = images
        .into_iter()
        .zip(estimates)
        .zip(targets)
        .map(|((path, estimate), target)| {
            let scale = match FrameAction::plan(target, estimate.brightness) {
                FrameAction::Rescale(scale) => Some(scale.value()),
                FrameAction::PassThroughEdge | FrameAction::PassThroughUnscalable => None,
            };
            FrameAnalysis {
                path,
                brightness: estimate.brightness,
                included_pixels: estimate.included_pixels,
                total_pixels: estimate.total_pixels,
                target: target.value(),
                scale,
            }
        })
        .collect();

    Ok(AnalysisReport {
        input_dir: input_dir.to_path_buf(),
        window: settings.window(),
        sigma: settings.sigma(),
        frames,
    })
}
