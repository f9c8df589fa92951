//! Deflicker a directory of frames.

use std::path::PathBuf;

use deflicker_common::config::RunDefaults;
use deflicker_frame_model::format::OutputFormat;
use deflicker_pipeline::{deflicker_directory, DeflickerJob, DeflickerSettings};

pub fn run(
    input_dir: PathBuf,
    outdir: Option<PathBuf>,
    window: Option<usize>,
    format: Option<String>,
    sigma: Option<f64>,
    defaults: &RunDefaults,
    quiet: bool,
) -> anyhow::Result<()> {
    let format: OutputFormat = format.as_deref().unwrap_or(&defaults.format).parse()?;
    let settings = DeflickerSettings::new(
        window.unwrap_or(defaults.window),
        sigma.or(defaults.sigma),
        format,
    )?;

    let job = DeflickerJob {
        input_dir,
        output_dir: outdir.unwrap_or_else(|| defaults.outdir.clone()),
        settings,
    };

    tracing::info!(
        input = %job.input_dir.display(),
        output = %job.output_dir.display(),
        window = settings.window(),
        sigma = ?settings.sigma(),
        format = %settings.format(),
        "Starting deflicker"
    );

    let reporter = super::console_reporter(quiet);
    let summary = deflicker_directory(&job, reporter.as_ref())?;

    if !quiet {
        println!(
            "Deflickered {} images ({} corrected, {} copied unchanged) into {}",
            summary.outputs.len(),
            summary.corrected,
            summary.passed_through,
            job.output_dir.display()
        );
    }

    Ok(())
}
