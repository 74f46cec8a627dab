//! Error types for splitting runs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Split operation result type.
pub type Result<T> = std::result::Result<T, SplitError>;

/// A configuration that cannot be run. Detected before any file is touched.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("TargetDir={} does not exist. Aborting", .0.display())]
    TargetNotFound(PathBuf),

    #[error("SourceDir={} does not exist. Aborting", .0.display())]
    SourceNotFound(PathBuf),

    #[error("TargetDir={} cannot be one of the source dirs. Aborting", .0.display())]
    TargetIsSource(PathBuf),

    #[error("FilesPerDir={0} must be >= 1. Aborting")]
    InvalidFilesPerDir(usize),

    #[error("At least one source directory is required")]
    NoSources,
}

/// Errors raised while splitting.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Configuration failed validation
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Filesystem failure while listing, creating or copying
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory listing failure reported by the walker
    #[error("Failed to list source directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Source path has no final segment to name subdirectories after
    #[error("Cannot derive a directory name from source path: {}", .0.display())]
    UnnamedSource(PathBuf),

    /// Config file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SplitError {
    /// Wrap an I/O error with the operation and path that produced it.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True when the run was rejected before any filesystem writes.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}
