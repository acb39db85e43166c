use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::SpatialFilter;

/// Image formats a plot can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Pdf,
    Ps,
    Eps,
    Svg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Png,
        OutputFormat::Pdf,
        OutputFormat::Ps,
        OutputFormat::Eps,
        OutputFormat::Svg,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Ps => "ps",
            OutputFormat::Eps => "eps",
            OutputFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.extension() == s)
            .ok_or_else(|| Error::InvalidFormat(s.to_string()))
    }
}

/// Check the arguments shared by every plot operation.
///
/// The format is checked first, without looking at the filter. Then the
/// filter must expose at least one area and one insert source, define every
/// per-area lookup, and hold at least one member.
pub fn validate<F: SpatialFilter + ?Sized>(filter: &F, format: &str) -> Result<OutputFormat> {
    let format = format.parse::<OutputFormat>()?;

    if filter.num_areas() == 0 {
        return Err(Error::InvalidFilter("the filter has no areas".into()));
    }
    if filter.insert_file_list().is_empty() {
        return Err(Error::InvalidFilter("the insert file list is empty".into()));
    }
    filter.check_consistency()?;
    if filter.members() == 0 {
        return Err(Error::EmptyFilter);
    }
    Ok(format)
}
