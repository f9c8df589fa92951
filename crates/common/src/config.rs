//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for a deflicker run, overridable on the command line.
    pub defaults: RunDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunDefaults {
    /// Rolling mean window size (number of images).
    pub window: usize,

    /// Output format token (png, tiff, tif, jpg, jpeg).
    pub format: String,

    /// Output directory for corrected images.
    pub outdir: PathBuf,

    /// Sigma clipping threshold; `None` disables clipping.
    pub sigma: Option<f64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "deflicker=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            window: 10,
            format: "png".to_string(),
            outdir: PathBuf::from("deflickered"),
            sigma: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Level used by the CLI for the `--quiet` / `--verbose` flags.
    pub fn for_verbosity(quiet: bool, verbose: bool) -> Self {
        let level = if quiet {
            "warn"
        } else if verbose {
            "debug"
        } else {
            "info"
        };
        Self {
            level: level.to_string(),
            ..Self::default()
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> crate::DeflickerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("deflicker").join("config.json")
}
