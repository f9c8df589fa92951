//! Deflicker Pipeline
//!
//! Runs the deflicker over a directory of frames in two passes:
//!
//! ```text
//! input dir ──► discover ──► decode ──► brightness ──┐
//!                                                    ▼
//!                                            rolling-mean targets
//!                                                    │
//! input dir ──► decode ──► rescale / pass through ◄──┘
//!                                   │
//!                                   ▼
//!                         encode ──► output dir
//! ```
//!
//! Progress is reported through an explicitly passed [`ProgressReporter`].

pub mod analysis;
pub mod progress;
pub mod run;
pub mod settings;

pub use analysis::{analyze_directory, AnalysisReport, FrameAnalysis};
pub use progress::{DeflickerProgress, DeflickerStage, ProgressReporter, SilentReporter, TracingReporter};
pub use run::{deflicker_directory, DeflickerJob, DeflickerSummary, FrameAction};
pub use settings::DeflickerSettings;
