use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a plot operation.
///
/// The first five variants are the plot-level failures callers are expected
/// to match on; the rest wrap I/O and rendering problems.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid format '{0}' (it should be png, pdf, ps, eps or svg)")]
    InvalidFormat(String),

    #[error("the filter passed as argument is not a usable SBF: {0}")]
    InvalidFilter(String),

    #[error("the filter passed as argument is empty")]
    EmptyFilter,

    #[error("empirical inter-set errors need a filter built on a single insert file, this one has {0}")]
    UnsupportedMultiSource(usize),

    #[error("no check results available for '{0}'")]
    EmptyCheckResults(String),

    #[error("check log {path}: {message}")]
    CheckLog { path: PathBuf, message: String },

    #[error("rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn render(err: impl std::fmt::Display) -> Self {
        Error::Render(err.to_string())
    }
}
