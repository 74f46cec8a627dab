//! CLI module for dirsplit

pub mod error;
pub mod split;
