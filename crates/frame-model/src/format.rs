//! Output format tokens.

use std::fmt;
use std::str::FromStr;

use deflicker_common::error::DeflickerError;
use serde::{Deserialize, Serialize};

/// Output container, keeping the spelling the user chose.
///
/// `tif` and `tiff` are the same container but produce different file
/// extensions, likewise `jpg` and `jpeg`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Tiff,
    Tif,
    Jpg,
    Jpeg,
}

impl OutputFormat {
    /// All accepted tokens.
    pub const TOKENS: [&'static str; 5] = ["png", "tiff", "tif", "jpg", "jpeg"];

    /// File extension written for this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Tif => "tif",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    pub fn is_jpeg(self) -> bool {
        matches!(self, OutputFormat::Jpg | OutputFormat::Jpeg)
    }

    pub fn is_tiff(self) -> bool {
        matches!(self, OutputFormat::Tiff | OutputFormat::Tif)
    }
}

impl FromStr for OutputFormat {
    type Err = DeflickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "tiff" => Ok(OutputFormat::Tiff),
            "tif" => Ok(OutputFormat::Tif),
            "jpg" => Ok(OutputFormat::Jpg),
            "jpeg" => Ok(OutputFormat::Jpeg),
            _ => Err(DeflickerError::invalid_configuration(format!(
                "Unsupported output format: {s}. Use one of: {}",
                Self::TOKENS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
