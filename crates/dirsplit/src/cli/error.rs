//! Helpful error types for the command line
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use dirsplit_core::{PreconditionError, SplitError};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug, Serialize)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Precondition failures ===

    pub fn target_not_found(path: &Path) -> Self {
        Self::new(format!("TargetDir={} does not exist. Aborting", path.display()))
            .with_context("The target directory must exist before splitting")
            .with_suggestions([
                format!("TRY: Create it first: mkdir -p {}", path.display()),
                "TRY: Check that the device or share is mounted".to_string(),
            ])
    }

    pub fn source_not_found(path: &Path) -> Self {
        Self::new(format!("SourceDir={} does not exist. Aborting", path.display()))
            .with_context("Every source must be an existing directory")
            .with_suggestions([
                format!("TRY: Check that the path exists: ls -la {}", path.display()),
                "TRY: Check for typos in the path".to_string(),
            ])
    }

    pub fn target_is_source(path: &Path) -> Self {
        Self::new(format!(
            "TargetDir={} cannot be one of the source dirs. Aborting",
            path.display()
        ))
        .with_context("Splitting a directory into itself would copy the new subdirectories' files again")
        .with_suggestion("TRY: Pick a target directory outside the source list")
    }

    pub fn invalid_files_per_dir(files_per_dir: usize) -> Self {
        Self::new(format!("FilesPerDir={} must be >= 1. Aborting", files_per_dir))
            .with_context("Each target subdirectory must be allowed to hold at least one file")
            .with_suggestion("TRY: dirsplit -f 250 -t TARGET -s SOURCE...")
    }

    pub fn no_sources() -> Self {
        Self::new("No source directories given")
            .with_context("Pass sources with -s/--sourcedirs or list them as source_dirs in --config")
            .with_suggestion("TRY: dirsplit -t TARGET -s SOURCE...")
    }

    // === Run failures ===

    pub fn copy_failed(op: &str, path: &Path, reason: &str) -> Self {
        Self::new(format!("Failed to {} {}", op, path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Check free space on the target device".to_string(),
                "TRY: Check write permissions on the target directory".to_string(),
                "NOTE: Files copied before the failure were left in place".to_string(),
            ])
    }

    pub fn config_file(details: &str) -> Self {
        Self::new("Invalid config file")
            .with_context(details.to_string())
            .with_suggestion(
                "TRY: Keys are source_dirs (list), target_root (path), files_per_dir (integer)",
            )
    }
}

impl From<PreconditionError> for HelpfulError {
    fn from(err: PreconditionError) -> Self {
        match err {
            PreconditionError::TargetNotFound(path) => Self::target_not_found(&path),
            PreconditionError::SourceNotFound(path) => Self::source_not_found(&path),
            PreconditionError::TargetIsSource(path) => Self::target_is_source(&path),
            PreconditionError::InvalidFilesPerDir(n) => Self::invalid_files_per_dir(n),
            PreconditionError::NoSources => Self::no_sources(),
        }
    }
}

impl From<SplitError> for HelpfulError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::Precondition(inner) => inner.into(),
            SplitError::Io { op, path, source } => {
                Self::copy_failed(op, &path, &source.to_string())
            }
            SplitError::Config(details) => Self::config_file(&details),
            other => Self::new(other.to_string()),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Render an error as a JSON object on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({ "error": helpful }),
        None => serde_json::json!({ "error": { "message": format!("{:#}", err) } }),
    };
    println!("{}", payload);
}
