//! Run configuration and the precondition checks that gate every run.

use crate::error::{PreconditionError, SplitError};
use crate::events::EventSink;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Files per target subdirectory when nothing else is specified.
pub const DEFAULT_FILES_PER_DIR: usize = 250;

/// What to split, where to, and how many files per subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Source directories, processed in this order
    #[serde(default)]
    pub source_dirs: Vec<PathBuf>,

    /// Root under which `<source>_<n>` subdirectories are created
    #[serde(default)]
    pub target_root: PathBuf,

    /// Maximum files per target subdirectory
    #[serde(default = "default_files_per_dir")]
    pub files_per_dir: usize,
}

fn default_files_per_dir() -> usize {
    DEFAULT_FILES_PER_DIR
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source_dirs: Vec::new(),
            target_root: PathBuf::new(),
            files_per_dir: default_files_per_dir(),
        }
    }
}

impl SplitConfig {
    pub fn new(
        source_dirs: impl IntoIterator<Item = impl Into<PathBuf>>,
        target_root: impl Into<PathBuf>,
        files_per_dir: usize,
    ) -> Self {
        Self {
            source_dirs: source_dirs.into_iter().map(Into::into).collect(),
            target_root: target_root.into(),
            files_per_dir,
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SplitError::io("read config", path, e))?;
        toml::from_str(&content)
            .map_err(|e| SplitError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check every precondition, in a fixed order, before anything is copied.
    ///
    /// Order: target exists, each source exists, target is not a source,
    /// cap is at least one. The first failure is reported.
    pub fn validate(&self, events: &dyn EventSink) -> Result<ValidatedConfig, PreconditionError> {
        let result = self.check(events);
        if let Err(err) = &result {
            events.emit(Level::ERROR, &err.to_string());
        }
        result
    }

    fn check(&self, events: &dyn EventSink) -> Result<ValidatedConfig, PreconditionError> {
        if !self.target_root.is_dir() {
            return Err(PreconditionError::TargetNotFound(self.target_root.clone()));
        }
        events.emit(
            Level::DEBUG,
            &format!("TargetDir={} exists", self.target_root.display()),
        );

        if self.source_dirs.is_empty() {
            return Err(PreconditionError::NoSources);
        }

        for source in &self.source_dirs {
            if !source.is_dir() {
                return Err(PreconditionError::SourceNotFound(source.clone()));
            }
            events.emit(Level::DEBUG, &format!("SourceDir={} exists", source.display()));
        }

        let target_identity = identity(&self.target_root);
        if self
            .source_dirs
            .iter()
            .any(|source| identity(source) == target_identity)
        {
            return Err(PreconditionError::TargetIsSource(self.target_root.clone()));
        }
        events.emit(
            Level::DEBUG,
            &format!(
                "TargetDir={} is not one of the source dirs. This is ok",
                self.target_root.display()
            ),
        );

        if self.files_per_dir < 1 {
            return Err(PreconditionError::InvalidFilesPerDir(self.files_per_dir));
        }

        Ok(ValidatedConfig {
            source_dirs: self.source_dirs.clone(),
            target_root: self.target_root.clone(),
            files_per_dir: self.files_per_dir,
        })
    }
}

/// Canonical form used to compare directories; falls back to the path as given.
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// A configuration that passed [`SplitConfig::validate`]. Read-only for the
/// duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedConfig {
    source_dirs: Vec<PathBuf>,
    target_root: PathBuf,
    files_per_dir: usize,
}

impl ValidatedConfig {
    pub fn source_dirs(&self) -> &[PathBuf] {
        &self.source_dirs
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn files_per_dir(&self) -> usize {
        self.files_per_dir
    }
}
