//! Report brightness, targets and scale factors without writing images.

use std::path::PathBuf;

use deflicker_common::config::RunDefaults;
use deflicker_frame_model::format::OutputFormat;
use deflicker_pipeline::{analyze_directory, DeflickerSettings};

pub fn run(
    input_dir: PathBuf,
    window: Option<usize>,
    sigma: Option<f64>,
    json: bool,
    defaults: &RunDefaults,
    quiet: bool,
) -> anyhow::Result<()> {
    // The output format plays no part in the analysis.
    let settings = DeflickerSettings::new(
        window.unwrap_or(defaults.window),
        sigma.or(defaults.sigma),
        OutputFormat::default(),
    )?;

    let reporter = super::console_reporter(quiet || json);
    let report = analyze_directory(&input_dir, &settings, reporter.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Analysis of {}", report.input_dir.display());
    println!("  Window: {}", report.window);
    match report.sigma {
        Some(sigma) => println!("  Sigma clipping: {sigma}"),
        None => println!("  Sigma clipping: off"),
    }
    println!();
    println!(
        "  {:<32} {:>10} {:>10} {:>8} {:>8}",
        "file", "brightness", "target", "scale", "kept %"
    );

    for frame in &report.frames {
        let name = frame
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = frame
            .target
            .map(|t| format!("{t:.5}"))
            .unwrap_or_else(|| "-".to_string());
        let scale = frame
            .scale
            .map(|s| format!("{s:.4}"))
            .unwrap_or_else(|| "copy".to_string());
        let kept = frame.included_pixels as f64 / frame.total_pixels as f64 * 100.0;

        println!(
            "  {name:<32} {:>10.5} {target:>10} {scale:>8} {kept:>8.1}",
            frame.brightness
        );
    }

    println!(
        "\n{} of {} images would be rescaled.",
        report.corrected_count(),
        report.frames.len()
    );

    Ok(())
}
