//! Error types for vtdd.
//!
//! Only structural problems are errors. Per-testbench failures (no sources,
//! compile errors, failing simulations) are outcomes, see
//! [`FailureKind`](crate::runner::FailureKind).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A source directory to index does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The testbench directory does not exist.
    #[error("'{}' directory not found", .0.display())]
    TestDirectoryNotFound(PathBuf),

    /// The testbench directory holds no testbench.
    #[error("No test files found (*{pattern}) in {}", dir.display())]
    NoTestbenches { dir: PathBuf, pattern: String },

    /// A testbench named on the command line does not exist.
    #[error("Test file not found: {0}")]
    TestbenchNotFound(String),

    /// IO error while reading a file or walking a directory.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be started or waited on.
    #[error("Failed to run '{program}': {source}")]
    Tool {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool did not finish within the configured limit.
    #[error("'{program}' timed out after {}s", after.as_secs())]
    Timeout {
        program: String,
        after: std::time::Duration,
    },

    /// Template parameters out of range.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Invalid configuration value.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Create an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a tool error for `program`.
    pub fn tool(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Tool {
            program: program.into(),
            source,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read configuration: {0}")]
    ParseError(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
