//! Subcommand implementations.

pub mod analyze;
pub mod run;

use deflicker_pipeline::{DeflickerProgress, DeflickerStage, ProgressReporter, SilentReporter};

/// Progress shown on stderr, or nothing with `--quiet`.
pub fn console_reporter(quiet: bool) -> Box<dyn ProgressReporter> {
    if quiet {
        return Box::new(SilentReporter);
    }

    Box::new(|p: &DeflickerProgress| {
        let label = match p.stage {
            DeflickerStage::Measuring => "Measuring brightness",
            DeflickerStage::Correcting => "Correcting brightness",
            DeflickerStage::Complete => return,
        };
        eprint!(
            "\r  {label}: {:>5.1}% ({}/{})  ",
            p.fraction() * 100.0,
            p.completed,
            p.total
        );
        if p.total > 0 && p.completed == p.total {
            eprintln!();
        }
    })
}
