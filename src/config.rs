use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Defaults for plot output, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "PlotConfig::default_format")]
    pub format: String,
    #[serde(default = "PlotConfig::default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "PlotConfig::default_width")]
    pub width: u32,
    #[serde(default = "PlotConfig::default_height")]
    pub height: u32,
    #[serde(default = "PlotConfig::default_true")]
    pub show: bool,
    #[serde(default = "PlotConfig::default_true")]
    pub save: bool,
}

impl PlotConfig {
    fn default_format() -> String {
        "pdf".to_string()
    }
    fn default_output_dir() -> PathBuf {
        PathBuf::from(".")
    }
    fn default_width() -> u32 {
        1024
    }
    fn default_height() -> u32 {
        768
    }
    fn default_true() -> bool {
        true
    }

    /// Read a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
            output_dir: Self::default_output_dir(),
            width: Self::default_width(),
            height: Self::default_height(),
            show: Self::default_true(),
            save: Self::default_true(),
        }
    }
}
