//! Deflicker Processing Core
//!
//! The three numeric stages of the deflicker:
//! - **Brightness:** Per-frame mean intensity, optionally sigma clipped
//! - **Rolling Mean:** Centered moving-average targets with undefined edges
//! - **Rescale:** Intensity scaling that clamps at full scale and keeps the
//!   frame's sample type
//!
//! This crate is pure computation: no I/O, no decoding.
//! All inputs are data; all outputs are data.

pub mod brightness;
pub mod rescale;
pub mod rolling_mean;

pub use brightness::{BrightnessEstimate, BrightnessEstimator};
pub use rescale::rescale;
pub use rolling_mean::TargetBrightnessSmoother;
