//! Deflicker Frame Model
//!
//! Defines the core data contracts of the deflicker:
//! - **Frame:** A decoded image over a closed set of sample representations
//! - **Series:** Per-frame brightness and rolling-mean targets
//! - **Format:** Output container tokens accepted on the command line
//!
//! All brightness values live on the normalized `[0.0, 1.0]` intensity scale
//! so that 8-bit, 16-bit and float frames compare directly.

pub mod format;
pub mod frame;
pub mod series;

pub use format::*;
pub use frame::*;
pub use series::*;
