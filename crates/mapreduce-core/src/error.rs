//! Error types for the MapReduce framework.

use core::fmt;

/// Result type returned by the public API.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur setting up or running a MapReduce job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `num_workers == 0` or `num_partitions == 0` was passed to `run`.
    ///
    /// No pool or partition store is allocated when this is returned --
    /// `run` has no partial side effects on this path.
    Configuration(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
