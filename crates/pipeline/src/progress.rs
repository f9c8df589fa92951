//! Progress reporting for deflicker runs.

use std::path::PathBuf;

/// Stages of a deflicker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflickerStage {
    /// Decoding frames and estimating their brightness.
    Measuring,
    /// Rescaling frames and writing them out.
    Correcting,
    Complete,
}

/// Progress report emitted once per stage start and once per frame.
#[derive(Debug, Clone)]
pub struct DeflickerProgress {
    /// Current stage.
    pub stage: DeflickerStage,

    /// Frames finished in this stage.
    pub completed: usize,

    /// Frames in this stage.
    pub total: usize,

    /// Frame that was just finished, if any.
    pub path: Option<PathBuf>,
}

impl DeflickerProgress {
    /// Completed share of the stage in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Observer of deflicker progress.
///
/// Callers construct one and pass it to the run explicitly; closures taking
/// a `&DeflickerProgress` can be used directly.
pub trait ProgressReporter {
    fn report(&self, progress: &DeflickerProgress);
}

impl<F> ProgressReporter for F
where
    F: Fn(&DeflickerProgress),
{
    fn report(&self, progress: &DeflickerProgress) {
        self(progress)
    }
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _progress: &DeflickerProgress) {}
}

/// Emits progress as debug-level tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, progress: &DeflickerProgress) {
        tracing::debug!(
            stage = ?progress.stage,
            completed = progress.completed,
            total = progress.total,
            path = ?progress.path,
            "Deflicker progress"
        );
    }
}
