//! Partition math: how many subdirectories a source needs, how they are
//! named, and which one each file lands in.
//!
//! Everything here is pure. Assignment depends only on a file's rank in the
//! sorted listing, so the same listing and cap always produce the same
//! mapping.

use std::path::{Path, PathBuf};

/// Number of subdirectories needed for `total_count` files at `files_per_dir`
/// files each. Zero files need zero subdirectories.
pub fn dir_count(total_count: usize, files_per_dir: usize) -> usize {
    debug_assert!(files_per_dir >= 1, "files_per_dir must be >= 1");
    total_count.div_ceil(files_per_dir.max(1))
}

/// Decimal digits in `n`. Zero has one digit.
pub fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Zero-padding width for subdirectory suffixes.
///
/// No upper bracket: a source needing a billion subdirectories simply gets
/// ten-digit suffixes.
pub fn suffix_width(dir_count: usize) -> usize {
    digit_count(dir_count).max(1)
}

/// 1-based subdirectory index for the file at 1-based `rank`.
///
/// The file whose rank is an exact multiple of `files_per_dir` is the last
/// one in its subdirectory; the next rank opens a new one.
pub fn subdir_index_for_rank(rank: usize, files_per_dir: usize) -> usize {
    rank.max(1).div_ceil(files_per_dir.max(1))
}

/// Subdirectory name: `<source_name>_<index zero-padded to width>`.
pub fn subdir_name(source_name: &str, index: usize, width: usize) -> String {
    format!("{}_{:0width$}", source_name, index, width = width)
}

/// One file's place in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    /// 1-based position in the sorted listing
    pub rank: usize,
    pub path: &'a Path,
    /// 1-based subdirectory index
    pub index: usize,
}

/// The partition of one source directory's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    source_dir: PathBuf,
    source_name: String,
    files: Vec<PathBuf>,
    files_per_dir: usize,
    dir_count: usize,
    suffix_width: usize,
}

impl BatchPlan {
    /// Build a plan. `files` is sorted here; callers may pass any order.
    pub fn build(
        source_dir: impl Into<PathBuf>,
        source_name: impl Into<String>,
        mut files: Vec<PathBuf>,
        files_per_dir: usize,
    ) -> Self {
        let files_per_dir = files_per_dir.max(1);
        files.sort();
        let dir_count = dir_count(files.len(), files_per_dir);
        Self {
            source_dir: source_dir.into(),
            source_name: source_name.into(),
            files,
            files_per_dir,
            dir_count,
            suffix_width: suffix_width(dir_count),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Files in assignment order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn total_count(&self) -> usize {
        self.files.len()
    }

    pub fn files_per_dir(&self) -> usize {
        self.files_per_dir
    }

    pub fn dir_count(&self) -> usize {
        self.dir_count
    }

    pub fn suffix_width(&self) -> usize {
        self.suffix_width
    }

    /// Name of the subdirectory with the given 1-based index.
    pub fn subdir_name(&self, index: usize) -> String {
        subdir_name(&self.source_name, index, self.suffix_width)
    }

    /// Every subdirectory name, in index order.
    pub fn subdir_names(&self) -> Vec<String> {
        (1..=self.dir_count).map(|i| self.subdir_name(i)).collect()
    }

    /// Files in rank order with their subdirectory index.
    pub fn assignments(&self) -> impl Iterator<Item = Assignment<'_>> + '_ {
        self.files.iter().enumerate().map(move |(i, path)| {
            let rank = i + 1;
            Assignment {
                rank,
                path: path.as_path(),
                index: subdir_index_for_rank(rank, self.files_per_dir),
            }
        })
    }

    /// File count per subdirectory, in index order.
    pub fn subdir_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.dir_count];
        for assignment in self.assignments() {
            sizes[assignment.index - 1] += 1;
        }
        sizes
    }
}
