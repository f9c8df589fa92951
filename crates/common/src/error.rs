//! Error types shared across deflicker crates.

use std::path::{Path, PathBuf};

/// Top-level error type for deflicker operations.
#[derive(Debug, thiserror::Error)]
pub enum DeflickerError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("No images found in {}", dir.display())]
    NoInputImages { dir: PathBuf },

    #[error("Invalid rolling window {window} for {count} image(s): window must be between 1 and the image count")]
    InvalidWindow { window: usize, count: usize },

    #[error("Failed to read image {}: {message}", path.display())]
    DecodeUnavailable { path: PathBuf, message: String },

    #[error("Failed to write image {}: {message}", path.display())]
    EncodeUnavailable { path: PathBuf, message: String },

    #[error("Sigma clipping with sigma={sigma} excluded every pixel{}", describe_path(.path))]
    DegenerateBrightness { sigma: f64, path: Option<PathBuf> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DeflickerError.
pub type DeflickerResult<T> = Result<T, DeflickerError>;

impl DeflickerError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: msg.into(),
        }
    }

    pub fn decode(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::DecodeUnavailable {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::EncodeUnavailable {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn degenerate_brightness(sigma: f64) -> Self {
        Self::DegenerateBrightness { sigma, path: None }
    }

    /// Attach the offending file to errors raised by path-agnostic code.
    ///
    /// Only variants without a path yet are touched.
    pub fn with_path(self, path: &Path) -> Self {
        match self {
            Self::DegenerateBrightness { sigma, path: None } => Self::DegenerateBrightness {
                sigma,
                path: Some(path.to_path_buf()),
            },
            other => other,
        }
    }
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}
