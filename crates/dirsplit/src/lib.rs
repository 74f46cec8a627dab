//! Dirsplit command-line front end.
//!
//! Argument parsing, config-file merging and user-facing diagnostics around
//! the [`dirsplit_core`] splitter.

pub mod cli;
