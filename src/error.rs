use crate::types::Layout;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Debug)]
pub enum CliError {
    /// Print message to stdout and exit with code 0 (help/version/usage).
    Exit(String),
    /// Print message to stderr and exit with code 1.
    Message(String),
}

impl From<String> for CliError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for CliError {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Exit(msg) | CliError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

/// Failure to build a bounding-box or point matcher.
#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("At least one layout is required")]
    NoLayouts,
    #[error("Layout {0} listed more than once")]
    DuplicateLayout(Layout),
    #[error("Invalid pattern for {name}: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure to open or read a line-oriented input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{line}: failed to read line: {source}")]
    Read {
        path: String,
        line: usize,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "parquet")]
    #[error("Parquet writer error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Failure to set up an extraction job before any line is processed.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Matcher(#[from] MatcherError),
    #[error(transparent)]
    Input(#[from] InputError),
}
