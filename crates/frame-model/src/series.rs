//! Brightness and target brightness series.

/// Observed brightness per frame, index-aligned with the input files.
pub type BrightnessSeries = Vec<f64>;

/// Rolling-mean target per frame, index-aligned with the input files.
pub type TargetSeries = Vec<TargetBrightness>;

/// Target brightness for one frame.
///
/// Frames near either end of the sequence are not covered by a full window
/// and have no target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetBrightness {
    Defined(f64),
    Undefined,
}

impl TargetBrightness {
    pub fn value(self) -> Option<f64> {
        match self {
            TargetBrightness::Defined(v) => Some(v),
            TargetBrightness::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, TargetBrightness::Defined(_))
    }
}

/// Number of undefined targets before and after the defined run.
pub fn undefined_edges(targets: &[TargetBrightness]) -> (usize, usize) {
    let leading = targets.iter().take_while(|t| !t.is_defined()).count();
    if leading == targets.len() {
        return (leading, 0);
    }
    let trailing = targets.iter().rev().take_while(|t| !t.is_defined()).count();
    (leading, trailing)
}

/// Multiplier applied to a frame's normalized intensities.
///
/// Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// `target / observed`, if that ratio is usable.
    pub fn from_targets(target: f64, observed: f64) -> Option<Self> {
        Self::new(target / observed)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}
