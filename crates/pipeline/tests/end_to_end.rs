use std::cell::RefCell;
use std::path::{Path, PathBuf};

use deflicker_common::error::DeflickerError;
use deflicker_frame_model::format::OutputFormat;
use deflicker_pipeline::{
    analyze_directory, deflicker_directory, DeflickerJob, DeflickerProgress, DeflickerSettings,
    DeflickerStage, SilentReporter,
};
use image::{DynamicImage, ImageBuffer, Luma, Rgb, RgbImage};

/// Gray levels of a flickering sequence that darkens, then brightens again.
const FLICKER_LEVELS: [u8; 12] = [200, 170, 185, 150, 160, 120, 135, 110, 150, 140, 180, 175];

fn fresh_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn write_gray_sequence(dir: &Path, levels: &[u8]) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            let path = dir.join(format!("frame_{i:03}.png"));
            RgbImage::from_pixel(6, 4, Rgb([level, level, level]))
                .save(&path)
                .unwrap();
            path
        })
        .collect()
}

fn job(input: &Path, output: &Path, window: usize, sigma: Option<f64>, format: OutputFormat) -> DeflickerJob {
    DeflickerJob {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        settings: DeflickerSettings::new(window, sigma, format).unwrap(),
    }
}

#[test]
fn flickering_sequence_is_pulled_to_rolling_mean() {
    let root = fresh_dir("deflicker_e2e_flicker");
    let input = root.join("in");
    let output = root.join("out");
    let inputs = write_gray_sequence(&input, &FLICKER_LEVELS);

    let summary = deflicker_directory(
        &job(&input, &output, 5, None, OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap();

    assert_eq!(summary.outputs.len(), 12);
    assert_eq!(summary.corrected, 8);
    assert_eq!(summary.passed_through, 4);

    for (i, (source, written)) in inputs.iter().zip(&summary.outputs).enumerate() {
        assert_eq!(written.file_name(), source.file_name());
        let before = image::open(source).unwrap().to_rgb8();
        let after = image::open(written).unwrap().to_rgb8();

        if i < 2 || i >= 10 {
            assert_eq!(before.as_raw(), after.as_raw(), "edge frame {i} was modified");
            continue;
        }

        let window = &FLICKER_LEVELS[i - 2..=i + 2];
        let target = window.iter().map(|&v| v as f64).sum::<f64>() / 5.0 / 255.0;
        for &sample in after.as_raw() {
            let got = sample as f64 / 255.0;
            assert!(
                (got - target).abs() <= 0.5 / 255.0 + 1e-9,
                "frame {i}: got {got}, expected {target}"
            );
        }
    }

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn empty_input_fails_before_creating_output() {
    let root = fresh_dir("deflicker_e2e_empty");
    let input = root.join("in");
    let output = root.join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("notes.txt"), "not an image").unwrap();

    let err = deflicker_directory(
        &job(&input, &output, 3, None, OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap_err();

    assert!(matches!(err, DeflickerError::NoInputImages { ref dir } if dir == &input));
    assert!(!output.exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn window_equal_to_sequence_defines_single_center_target() {
    let root = fresh_dir("deflicker_e2e_full_window");
    let input = root.join("in");
    write_gray_sequence(&input, &FLICKER_LEVELS[..6]);

    let settings = DeflickerSettings::new(6, None, OutputFormat::Png).unwrap();
    let report = analyze_directory(&input, &settings, &SilentReporter).unwrap();

    let defined: Vec<usize> = report
        .frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.target.is_some())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(defined, vec![2]);
    assert_eq!(report.corrected_count(), 1);

    let expected = FLICKER_LEVELS[..6].iter().map(|&v| v as f64).sum::<f64>() / 6.0 / 255.0;
    assert!((report.frames[2].target.unwrap() - expected).abs() < 1e-12);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["frames"].as_array().unwrap().len(), 6);
    assert!(json["frames"][0]["target"].is_null());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn oversized_window_is_rejected_before_output_exists() {
    let root = fresh_dir("deflicker_e2e_big_window");
    let input = root.join("in");
    let output = root.join("out");
    write_gray_sequence(&input, &FLICKER_LEVELS[..4]);

    let err = deflicker_directory(
        &job(&input, &output, 5, None, OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        DeflickerError::InvalidWindow {
            window: 5,
            count: 4
        }
    ));
    assert!(!output.exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn sixteen_bit_frames_stay_sixteen_bit() {
    let root = fresh_dir("deflicker_e2e_16bit");
    let input = root.join("in");
    let output = root.join("out");
    std::fs::create_dir_all(&input).unwrap();

    for (i, level) in [30_000u16, 20_000, 40_000].into_iter().enumerate() {
        let frame = ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(4, 4, Luma([level]));
        DynamicImage::ImageLuma16(frame)
            .save(input.join(format!("f{i}.png")))
            .unwrap();
    }

    let summary = deflicker_directory(
        &job(&input, &output, 3, None, OutputFormat::Tif),
        &SilentReporter,
    )
    .unwrap();

    assert_eq!(summary.corrected, 1);
    assert!(summary.outputs.iter().all(|p| p.extension().unwrap() == "tif"));

    match image::open(&summary.outputs[1]).unwrap() {
        DynamicImage::ImageLuma16(buf) => {
            assert!(buf.pixels().all(|p| p.0[0] == 30_000));
        }
        other => panic!("expected 16-bit gray output, got {:?}", other.color()),
    }

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn fully_clipped_frame_reports_its_path() {
    let root = fresh_dir("deflicker_e2e_degenerate");
    let input = root.join("in");
    let output = root.join("out");
    std::fs::create_dir_all(&input).unwrap();

    let checker = RgbImage::from_fn(4, 4, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let path = input.join("checker.png");
    checker.save(&path).unwrap();

    let err = deflicker_directory(
        &job(&input, &output, 1, Some(0.5), OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap_err();

    match err {
        DeflickerError::DegenerateBrightness { path: Some(p), .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn reporter_sees_both_passes_in_order() {
    let root = fresh_dir("deflicker_e2e_progress");
    let input = root.join("in");
    let output = root.join("out");
    write_gray_sequence(&input, &FLICKER_LEVELS[..3]);

    let seen = RefCell::new(Vec::new());
    let reporter = |p: &DeflickerProgress| seen.borrow_mut().push((p.stage, p.completed, p.total));

    deflicker_directory(&job(&input, &output, 3, None, OutputFormat::Jpg), &reporter).unwrap();

    use DeflickerStage::*;
    assert_eq!(
        *seen.borrow(),
        vec![
            (Measuring, 0, 3),
            (Measuring, 1, 3),
            (Measuring, 2, 3),
            (Measuring, 3, 3),
            (Correcting, 0, 3),
            (Correcting, 1, 3),
            (Correcting, 2, 3),
            (Correcting, 3, 3),
            (Complete, 3, 3),
        ]
    );
    assert!(output.join("frame_001.jpg").exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn unreadable_frame_aborts_with_its_path() {
    let root = fresh_dir("deflicker_e2e_corrupt");
    let input = root.join("in");
    let output = root.join("out");
    write_gray_sequence(&input, &FLICKER_LEVELS[..3]);
    let corrupt = input.join("frame_001.png");
    std::fs::write(&corrupt, b"definitely not a png").unwrap();

    let err = deflicker_directory(
        &job(&input, &output, 3, None, OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap_err();

    match err {
        DeflickerError::DecodeUnavailable { path, .. } => assert_eq!(path, corrupt),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.join("frame_000.png").exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn unwritable_output_aborts_with_its_path() {
    let root = fresh_dir("deflicker_e2e_unwritable");
    let input = root.join("in");
    let output = root.join("out");
    write_gray_sequence(&input, &FLICKER_LEVELS[..3]);
    let blocked = output.join("frame_000.png");
    std::fs::create_dir_all(&blocked).unwrap();

    let err = deflicker_directory(
        &job(&input, &output, 3, None, OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap_err();

    match err {
        DeflickerError::EncodeUnavailable { path, .. } => assert_eq!(path, blocked),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.join("frame_001.png").exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn output_dir_that_cannot_be_created_is_named() {
    let root = fresh_dir("deflicker_e2e_blocked_outdir");
    let input = root.join("in");
    write_gray_sequence(&input, &FLICKER_LEVELS[..3]);
    let blocker = root.join("blocker");
    std::fs::write(&blocker, "regular file").unwrap();
    let output = blocker.join("out");

    let err = deflicker_directory(
        &job(&input, &output, 3, None, OutputFormat::Png),
        &SilentReporter,
    )
    .unwrap_err();

    assert!(err.to_string().contains(&output.display().to_string()));
    match err {
        DeflickerError::EncodeUnavailable { path, .. } => assert_eq!(path, output),
        other => panic!("unexpected error: {other}"),
    }

    std::fs::remove_dir_all(&root).ok();
}
