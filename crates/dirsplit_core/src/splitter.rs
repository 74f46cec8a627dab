//! The batch partitioner/copier.
//!
//! Each source directory is listed (direct children only), sorted, partitioned
//! with [`BatchPlan`], and copied file by file into
//! `<target_root>/<source_name>_<n>`. Sources are handled one at a time, in
//! the order configured. The first filesystem error ends the run; files that
//! were already copied stay where they are.

use crate::config::ValidatedConfig;
use crate::error::{Result, SplitError};
use crate::events::EventSink;
use crate::partition::BatchPlan;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::Level;
use walkdir::WalkDir;

/// One file placed (or to be placed) in a target subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub dest_dir: PathBuf,
    /// 1-based position in the source's sorted listing
    pub rank: usize,
    /// 1-based target subdirectory index
    pub subdir_index: usize,
}

impl fmt::Display for CopyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "COPIED FILE: {}   TO: {}",
            self.source.display(),
            self.dest_dir.display()
        )
    }
}

/// Per-subdirectory totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdirSummary {
    pub name: String,
    pub files: usize,
}

/// What happened (or would happen) to one source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source_dir: PathBuf,
    pub source_name: String,
    pub total_files: usize,
    pub suffix_width: usize,
    pub subdirs: Vec<SubdirSummary>,
}

impl SourceSummary {
    pub fn from_plan(plan: &BatchPlan) -> Self {
        let subdirs = plan
            .subdir_names()
            .into_iter()
            .zip(plan.subdir_sizes())
            .map(|(name, files)| SubdirSummary { name, files })
            .collect();
        Self {
            source_dir: plan.source_dir().to_path_buf(),
            source_name: plan.source_name().to_string(),
            total_files: plan.total_count(),
            suffix_width: plan.suffix_width(),
            subdirs,
        }
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub target_root: PathBuf,
    pub files_per_dir: usize,
    pub total_files: usize,
    pub sources: Vec<SourceSummary>,
}

/// Splits every configured source into capped target subdirectories.
pub struct Splitter<'a> {
    config: &'a ValidatedConfig,
    events: &'a dyn EventSink,
}

impl<'a> Splitter<'a> {
    pub fn new(config: &'a ValidatedConfig, events: &'a dyn EventSink) -> Self {
        Self { config, events }
    }

    /// Copy every source. `on_copy` is called after each successful copy.
    pub fn run(&self, mut on_copy: impl FnMut(&CopyRecord)) -> Result<RunSummary> {
        let mut sources = Vec::with_capacity(self.config.source_dirs().len());

        for source in self.config.source_dirs() {
            let plan = self.plan_source(source)?;
            self.copy_batch(&plan, &mut on_copy)?;
            sources.push(SourceSummary::from_plan(&plan));
        }

        Ok(self.summary(sources, false))
    }

    /// List and partition every source without touching the target root.
    pub fn plan(&self) -> Result<Vec<BatchPlan>> {
        self.config
            .source_dirs()
            .iter()
            .map(|source| self.plan_source(source))
            .collect()
    }

    /// Records for every copy a run would make, in copy order.
    pub fn dry_run(&self, mut on_plan: impl FnMut(&CopyRecord)) -> Result<RunSummary> {
        let plans = self.plan()?;
        for plan in &plans {
            for record in self.records(plan) {
                on_plan(&record);
            }
        }
        let sources = plans.iter().map(SourceSummary::from_plan).collect();
        Ok(self.summary(sources, true))
    }

    fn records<'p>(&self, plan: &'p BatchPlan) -> impl Iterator<Item = CopyRecord> + 'p {
        let target_root = self.config.target_root().to_path_buf();
        plan.assignments().map(move |a| CopyRecord {
            source: a.path.to_path_buf(),
            dest_dir: target_root.join(plan.subdir_name(a.index)),
            rank: a.rank,
            subdir_index: a.index,
        })
    }

    fn plan_source(&self, source: &Path) -> Result<BatchPlan> {
        self.build_plan(source).map_err(|e| self.fail(e))
    }

    fn build_plan(&self, source: &Path) -> Result<BatchPlan> {
        let source_name = source_name(source)?;
        self.events.emit(
            Level::DEBUG,
            &format!("Processing: SourceDirName={}", source_name),
        );

        let files = list_files(source)?;
        let plan = BatchPlan::build(source, source_name, files, self.config.files_per_dir());

        self.events.emit(
            Level::DEBUG,
            &format!(
                "SourceDir={} has {} files. Splitting to {} files per dir. \
                 Number of target dirs required: {}. SuffixWidth={}",
                source.display(),
                plan.total_count(),
                plan.files_per_dir(),
                plan.dir_count(),
                plan.suffix_width()
            ),
        );
        Ok(plan)
    }

    fn copy_batch(&self, plan: &BatchPlan, on_copy: &mut impl FnMut(&CopyRecord)) -> Result<()> {
        let mut ensured: Option<usize> = None;

        for record in self.records(plan) {
            if ensured != Some(record.subdir_index) {
                fs::create_dir_all(&record.dest_dir)
                    .map_err(|e| self.fail(SplitError::io("create directory", &record.dest_dir, e)))?;
                self.events.emit(
                    Level::DEBUG,
                    &format!("Created dir: {}", record.dest_dir.display()),
                );
                ensured = Some(record.subdir_index);
            }

            let file_name = record
                .source
                .file_name()
                .ok_or_else(|| SplitError::UnnamedSource(record.source.clone()))?;
            fs::copy(&record.source, record.dest_dir.join(file_name))
                .map_err(|e| self.fail(SplitError::io("copy", &record.source, e)))?;

            self.events.emit(
                Level::DEBUG,
                &format!(
                    "Copied file: {}   to: {}",
                    record.source.display(),
                    record.dest_dir.display()
                ),
            );
            on_copy(&record);
        }

        self.events.emit(
            Level::DEBUG,
            &format!("Copying completed: {}", plan.source_dir().display()),
        );
        Ok(())
    }

    fn fail(&self, err: SplitError) -> SplitError {
        self.events.emit(Level::ERROR, &err.to_string());
        err
    }

    fn summary(&self, sources: Vec<SourceSummary>, dry_run: bool) -> RunSummary {
        RunSummary {
            dry_run,
            target_root: self.config.target_root().to_path_buf(),
            files_per_dir: self.config.files_per_dir(),
            total_files: sources.iter().map(|s| s.total_files).sum(),
            sources,
        }
    }
}

/// Name target subdirectories are derived from: the source's final path
/// segment, trailing separators ignored.
pub fn source_name(source: &Path) -> Result<String> {
    let last_normal = |path: &Path| {
        path.components().next_back().and_then(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
    };

    if let Some(name) = last_normal(source) {
        return Ok(name);
    }

    // `.` and `..` only have a name once resolved
    let canonical =
        fs::canonicalize(source).map_err(|e| SplitError::io("resolve", source, e))?;
    last_normal(&canonical).ok_or_else(|| SplitError::UnnamedSource(source.to_path_buf()))
}

/// Regular files directly inside `dir`. Symlinks count when they resolve to
/// a regular file; subdirectories are never descended into.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let file_type = entry.file_type();
        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .map(|m| m.is_file())
                .unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if is_file {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
