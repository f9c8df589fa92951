//! Deflicker job execution.

use std::path::{Path, PathBuf};

use deflicker_common::error::{DeflickerError, DeflickerResult};
use deflicker_frame_model::format::OutputFormat;
use deflicker_frame_model::frame::Frame;
use deflicker_frame_model::series::{
    undefined_edges, BrightnessSeries, ScaleFactor, TargetBrightness,
};
use deflicker_image_io::codec::{decode_frame, encode_frame, output_path_for};
use deflicker_image_io::discovery::find_images;
use deflicker_processing_core::brightness::{BrightnessEstimate, BrightnessEstimator};
use deflicker_processing_core::rescale::rescale;
use deflicker_processing_core::rolling_mean::TargetBrightnessSmoother;

use crate::progress::{DeflickerProgress, DeflickerStage, ProgressReporter};
use crate::settings::DeflickerSettings;

/// A deflicker job ready to run.
#[derive(Debug, Clone)]
pub struct DeflickerJob {
    /// Directory holding the input frames.
    pub input_dir: PathBuf,

    /// Directory receiving the corrected frames (created if missing).
    pub output_dir: PathBuf,

    /// Validated run parameters.
    pub settings: DeflickerSettings,
}

/// Outcome of a finished job.
#[derive(Debug, Clone, Default)]
pub struct DeflickerSummary {
    /// Written files, in input order.
    pub outputs: Vec<PathBuf>,

    /// Frames that were rescaled.
    pub corrected: usize,

    /// Frames copied through unchanged.
    pub passed_through: usize,
}

/// What happens to a single frame in the correction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameAction {
    /// Scale the frame towards its target.
    Rescale(ScaleFactor),

    /// The frame sits outside the averaged span and is copied unchanged.
    PassThroughEdge,

    /// The frame has a target but no usable scale factor (e.g. black frame).
    PassThroughUnscalable,
}

impl FrameAction {
    /// Decide how to treat a frame from its target and observed brightness.
    pub fn plan(target: TargetBrightness, observed: f64) -> Self {
        match target {
            TargetBrightness::Undefined => FrameAction::PassThroughEdge,
            TargetBrightness::Defined(target) => match ScaleFactor::from_targets(target, observed) {
                Some(scale) => FrameAction::Rescale(scale),
                None => FrameAction::PassThroughUnscalable,
            },
        }
    }
}

/// Deflicker every image in `job.input_dir` into `job.output_dir`.
///
/// Fails before touching the output directory if there are no input images
/// or the window does not fit the sequence. Any decode or encode failure
/// aborts the run; files already written are left in place.
pub fn deflicker_directory(
    job: &DeflickerJob,
    reporter: &dyn ProgressReporter,
) -> DeflickerResult<DeflickerSummary> {
    let images = find_images(&job.input_dir);
    if images.is_empty() {
        return Err(DeflickerError::NoInputImages {
            dir: job.input_dir.clone(),
        });
    }

    let window = job.settings.window();
    if window > images.len() {
        return Err(DeflickerError::InvalidWindow {
            window,
            count: images.len(),
        });
    }

    if !job.output_dir.exists() {
        tracing::info!(
            "Output directory {} does not exist, creating it",
            job.output_dir.display()
        );
        std::fs::create_dir_all(&job.output_dir).map_err(|e| {
            DeflickerError::encode(
                &job.output_dir,
                format!("cannot create output directory: {e}"),
            )
        })?;
    }

    let estimator = BrightnessEstimator::new(job.settings.sigma());
    let brightness: BrightnessSeries = measure_brightness(&images, &estimator, reporter)?
        .iter()
        .map(|e| e.brightness)
        .collect();

    let targets = TargetBrightnessSmoother::new(window).smooth(&brightness)?;
    let (leading, trailing) = undefined_edges(&targets);
    tracing::info!(
        window,
        leading,
        trailing,
        "Rolling-mean targets ready, edge frames are copied unchanged"
    );

    let summary = correct_images(job, &images, &brightness, &targets, reporter)?;

    reporter.report(&DeflickerProgress {
        stage: DeflickerStage::Complete,
        completed: images.len(),
        total: images.len(),
        path: None,
    });
    tracing::info!(
        corrected = summary.corrected,
        passed_through = summary.passed_through,
        "Brightness correction finished"
    );

    Ok(summary)
}

/// First pass: decode every image and estimate its brightness.
pub(crate) fn measure_brightness(
    images: &[PathBuf],
    estimator: &BrightnessEstimator,
    reporter: &dyn ProgressReporter,
) -> DeflickerResult<Vec<BrightnessEstimate>> {
    tracing::info!("Calculating brightness of {} images", images.len());
    report_stage_start(reporter, DeflickerStage::Measuring, images.len());

    let mut estimates = Vec::with_capacity(images.len());
    for (index, path) in images.iter().enumerate() {
        let frame = decode_frame(path)?;
        let estimate = estimator
            .estimate_with_stats(&frame)
            .map_err(|e| e.with_path(path))?;

        tracing::debug!(
            path = %path.display(),
            brightness = estimate.brightness,
            included = estimate.included_pixels,
            total = estimate.total_pixels,
            "Measured brightness"
        );
        estimates.push(estimate);

        reporter.report(&DeflickerProgress {
            stage: DeflickerStage::Measuring,
            completed: index + 1,
            total: images.len(),
            path: Some(path.clone()),
        });
    }

    Ok(estimates)
}

/// Second pass: rescale or pass through each frame and write it out.
fn correct_images(
    job: &DeflickerJob,
    images: &[PathBuf],
    brightness: &[f64],
    targets: &[TargetBrightness],
    reporter: &dyn ProgressReporter,
) -> DeflickerResult<DeflickerSummary> {
    tracing::info!("Start brightness correction");
    report_stage_start(reporter, DeflickerStage::Correcting, images.len());

    let format = job.settings.format();
    let mut summary = DeflickerSummary {
        outputs: Vec::with_capacity(images.len()),
        ..Default::default()
    };

    for (index, ((path, &observed), &target)) in
        images.iter().zip(brightness).zip(targets).enumerate()
    {
        let frame = decode_frame(path)?;
        let corrected = match FrameAction::plan(target, observed) {
            FrameAction::Rescale(scale) => {
                tracing::debug!(
                    path = %path.display(),
                    scale = scale.value(),
                    "Rescaling frame"
                );
                summary.corrected += 1;
                rescale(&frame, scale)
            }
            FrameAction::PassThroughEdge => {
                summary.passed_through += 1;
                frame
            }
            FrameAction::PassThroughUnscalable => {
                tracing::warn!(
                    "No usable scale factor for {} (brightness {observed}), copying it unchanged",
                    path.display()
                );
                summary.passed_through += 1;
                frame
            }
        };

        let output = write_frame(corrected, path, &job.output_dir, format)?;
        summary.outputs.push(output);

        reporter.report(&DeflickerProgress {
            stage: DeflickerStage::Correcting,
            completed: index + 1,
            total: images.len(),
            path: Some(path.clone()),
        });
    }

    Ok(summary)
}

fn write_frame(
    frame: Frame,
    input: &Path,
    outdir: &Path,
    format: OutputFormat,
) -> DeflickerResult<PathBuf> {
    let output = output_path_for(input, outdir, format);
    encode_frame(frame, &output, format)?;
    Ok(output)
}

fn report_stage_start(reporter: &dyn ProgressReporter, stage: DeflickerStage, total: usize) {
    reporter.report(&DeflickerProgress {
        stage,
        completed: 0,
        total,
        path: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_target_always_passes_through() {
        assert_eq!(
            FrameAction::plan(TargetBrightness::Undefined, 0.4),
            FrameAction::PassThroughEdge
        );
        assert_eq!(
            FrameAction::plan(TargetBrightness::Undefined, 0.0),
            FrameAction::PassThroughEdge
        );
    }

    #[test]
    fn test_defined_target_rescales_by_ratio() {
        match FrameAction::plan(TargetBrightness::Defined(0.6), 0.3) {
            FrameAction::Rescale(scale) => assert!((scale.value() - 2.0).abs() < 1e-12),
            other => panic!("unexpected action {other:?}"),
        }

        // An exact match still goes through the rescale path.
        assert_eq!(
            FrameAction::plan(TargetBrightness::Defined(0.5), 0.5),
            FrameAction::Rescale(ScaleFactor::IDENTITY)
        );
    }

    #[test]
    fn test_black_frame_is_unscalable() {
        assert_eq!(
            FrameAction::plan(TargetBrightness::Defined(0.5), 0.0),
            FrameAction::PassThroughUnscalable
        );
    }
}
