// src/fs/mod.rs

//! Filesystem capability.
//!
//! Everything that touches disk (the pipeline loader and the
//! `valid-executable-file` lint rule) goes through [`FileSystem`], so tests
//! can swap in [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Read-only view of the files a pipeline refers to.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Open `path` for streaming reads; fails for directories and files the
    /// process may not read.
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {}", path.display()))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        if self.is_dir(path) {
            anyhow::bail!("{} is a directory", path.display());
        }
        let file =
            fs::File::open(path).with_context(|| format!("opening file {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_file())
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_dir())
    }
}
