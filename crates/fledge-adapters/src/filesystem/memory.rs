//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use fledge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{FledgeError, FledgeResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state. [`deny_writes_under`](Self::deny_writes_under) injects
/// failures for every write or directory creation below a prefix.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    denied: Vec<PathBuf>,
}

impl MemoryFilesystemInner {
    fn is_denied(&self, path: &Path) -> bool {
        self.denied.iter().any(|prefix| path.starts_with(prefix))
    }
}

fn failure(path: &Path, reason: &str) -> FledgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write at or below `prefix` fail.
    pub fn deny_writes_under(&self, prefix: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.denied.push(prefix.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    pub fn file_count(&self) -> usize {
        self.inner.read().map(|inner| inner.files.len()).unwrap_or(0)
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> FledgeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| failure(path, "lock poisoned"))?;

        if inner.is_denied(path) {
            return Err(failure(path, "Permission denied"));
        }

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(failure(&current, "Not a directory"));
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> FledgeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| failure(path, "lock poisoned"))?;

        if inner.is_denied(path) {
            return Err(failure(path, "Permission denied"));
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(failure(path, "Parent directory does not exist"));
            }
        }
        if inner.directories.contains(path) {
            return Err(failure(path, "Is a directory"));
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn ensure_writable(&self, path: &Path) -> FledgeResult<()> {
        let inner = self
            .inner
            .read()
            .map_err(|_| failure(path, "lock poisoned"))?;

        if !inner.directories.contains(path) {
            return Err(failure(path, "not a directory"));
        }
        if inner.is_denied(path) {
            return Err(failure(path, "directory is read-only"));
        }
        Ok(())
    }
}
