// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, readable: bool },
    Dir,
}

/// In-memory filesystem for tests.
///
/// Parent directories are created implicitly when a file is added.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("."), MockEntry::Dir);

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert_file(path.as_ref(), content.into(), true);
    }

    /// Add a file that exists but fails every read (permission denied).
    pub fn add_unreadable_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert_file(path.as_ref(), content.into(), false);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.lock();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    fn insert_file(&self, path: &Path, content: Vec<u8>, readable: bool) {
        let mut files = self.lock();
        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Self::ensure_dir_entry(&mut files, parent);
        }
        files.insert(path.to_path_buf(), MockEntry::File { content, readable });
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && parent != path {
                Self::ensure_dir_entry(files, parent);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A poisoned map is still usable: entries are only ever inserted whole.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::File { content, readable: true }) => Ok(content.clone()),
            Some(MockEntry::File { readable: false, .. }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let content = self.read_bytes(path)?;
        String::from_utf8(content).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let content = self.read_bytes(path)?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir))
    }
}
