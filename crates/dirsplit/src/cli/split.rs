//! The split command - copy source directories into capped subdirectories.
//!
//! # Usage
//!
//! ```bash
//! # 200 files per subdirectory
//! dirsplit -f 200 -t /media/stick/ -s /tmp/dir1/ /tmp/dir2/ /tmp/dir3/
//!
//! # Show where files would go without copying
//! dirsplit -t /media/stick -s ~/music/album --dry-run
//!
//! # Sources and target from a config file, cap from the environment
//! DIRSPLIT_FILES_PER_DIR=100 dirsplit --config stereo.toml
//! ```

use anyhow::Result;
use clap::Args;
use dirsplit_core::{CopyRecord, RunSummary, SplitConfig, Splitter, TracingSink};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::cli::error::HelpfulError;

/// Arguments for a split run
#[derive(Debug, Clone, Args)]
pub struct SplitArgs {
    /// How many files per directory? [default: 250]
    #[arg(short = 'f', long = "filesperdir", env = "DIRSPLIT_FILES_PER_DIR", value_name = "N")]
    pub files_per_dir: Option<usize>,

    /// One or more source directories to copy
    #[arg(
        short = 's',
        long = "sourcedirs",
        value_name = "DIR",
        num_args = 1..,
        required_unless_present = "config"
    )]
    pub source_dirs: Vec<PathBuf>,

    /// Target directory to put your split dirs
    #[arg(
        short = 't',
        long = "targetdir",
        value_name = "DIR",
        required_unless_present = "config"
    )]
    pub target_dir: Option<PathBuf>,

    /// TOML file with source_dirs, target_root and files_per_dir
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show where each file would go without creating or copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print a JSON summary instead of per-file progress lines
    #[arg(long)]
    pub json: bool,
}

impl SplitArgs {
    /// Merge the config file (if any) with command-line values; the command
    /// line wins.
    pub fn resolve(&self) -> Result<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::load(path).map_err(|e| {
                error!("{}", e);
                HelpfulError::from(e)
            })?,
            None => SplitConfig::default(),
        };

        if !self.source_dirs.is_empty() {
            config.source_dirs = self.source_dirs.clone();
        }
        if let Some(target) = &self.target_dir {
            config.target_root = trim_trailing_whitespace(target);
        }
        if let Some(files_per_dir) = self.files_per_dir {
            config.files_per_dir = files_per_dir;
        }

        debug!(
            "FilesPerDir={} , SourceDirs={:?} , TargetDir={}",
            config.files_per_dir,
            config.source_dirs,
            config.target_root.display()
        );
        Ok(config)
    }
}

fn trim_trailing_whitespace(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(s.trim_end()),
        None => path.to_path_buf(),
    }
}

/// Execute a split run
pub fn run(args: SplitArgs) -> Result<()> {
    let config = args.resolve()?;
    let validated = config
        .validate(&TracingSink)
        .map_err(HelpfulError::from)?;

    let splitter = Splitter::new(&validated, &TracingSink);
    let quiet = args.json;
    let summary = if args.dry_run {
        splitter.dry_run(|record| {
            if !quiet {
                println!("{}", planned_line(record));
            }
        })
    } else {
        splitter.run(|record| {
            if !quiet {
                println!("{}", record);
            }
        })
    }
    .map_err(HelpfulError::from)?;

    report(&summary, args.json)
}

fn planned_line(record: &CopyRecord) -> String {
    format!(
        "PLANNED FILE: {}   TO: {}",
        record.source.display(),
        record.dest_dir.display()
    )
}

fn report(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    for source in &summary.sources {
        info!(
            "{}: {} files into {} subdirectories{}",
            source.source_dir.display(),
            source.total_files,
            source.subdirs.len(),
            if summary.dry_run { " (dry run)" } else { "" }
        );
    }
    Ok(())
}
