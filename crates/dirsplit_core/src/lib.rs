//! Dirsplit core - spread a directory's files across capped subdirectories
//!
//! Some consumers (car stereos, media players, old filesystems) refuse to
//! read more than a fixed number of files from one directory. Dirsplit copies
//! each source directory into numbered siblings under a target root, each
//! holding at most `files_per_dir` files:
//!
//! ```text
//! /music/album (5 files), files_per_dir = 2
//!
//! /media/stick/album_1   2 files
//! /media/stick/album_2   2 files
//! /media/stick/album_3   1 file
//! ```
//!
//! # Core Concepts
//!
//! - **SplitConfig**: sources, target root and cap; validated into a [`ValidatedConfig`]
//! - **BatchPlan**: one source's sorted listing and its partition
//! - **Splitter**: walks each plan and copies files into place
//! - **EventSink**: where step tracing and failures are reported

pub mod config;
pub mod error;
pub mod events;
pub mod partition;
pub mod splitter;

// Re-exports for convenience
pub use config::{SplitConfig, ValidatedConfig, DEFAULT_FILES_PER_DIR};
pub use error::{PreconditionError, Result, SplitError};
pub use events::{EventSink, MemorySink, NullSink, TracingSink};
pub use partition::{
    dir_count, subdir_index_for_rank, subdir_name, suffix_width, Assignment, BatchPlan,
};
pub use splitter::{list_files, source_name, CopyRecord, RunSummary, SourceSummary, Splitter, SubdirSummary};
