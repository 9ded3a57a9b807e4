use std::fmt::Display;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal errors. The first three variants are raised before any row is
/// processed; `Persistence` aborts a run whose checkpoint or final write failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence failed for {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },
}

impl Error {
    pub fn persistence(path: &Path, err: impl Display) -> Self {
        Self::Persistence { path: path.to_path_buf(), message: err.to_string() }
    }

    /// True for the errors that stop a run before processing starts.
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::NotFound(_) | Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-row failure of a single embedding request. Never fatal: the row is
/// skipped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedFailure {
    /// Network error or non-2xx status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body was not a numeric vector.
    #[error("format failure: {0}")]
    Format(String),
}
