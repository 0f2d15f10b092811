//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use fledge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{FledgeError, FledgeResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> FledgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> FledgeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_writable(&self, path: &Path) -> FledgeResult<()> {
        let metadata = std::fs::metadata(path).map_err(|e| map_io_error(path, e, "inspect"))?;
        if !metadata.is_dir() {
            return Err(filesystem_error(path, "not a directory"));
        }
        if metadata.permissions().readonly() {
            return Err(filesystem_error(path, "directory is read-only"));
        }
        Ok(())
    }
}

fn filesystem_error(path: &Path, reason: &str) -> FledgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> FledgeError {
    filesystem_error(path, &format!("Failed to {}: {}", operation, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_truncates() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let file = dir.path().join("nested/a.txt");

        fs.create_dir_all(file.parent().unwrap()).unwrap();
        fs.write_file(&file, "longer content").unwrap();
        fs.write_file(&file, "short").unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "short");
        assert!(fs.exists(&file));
    }

    #[test]
    fn ensure_writable_rejects_files_and_missing_paths() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "").unwrap();
        let fs = LocalFilesystem::new();

        assert!(fs.ensure_writable(dir.path()).is_ok());
        assert!(fs.ensure_writable(&file).is_err());
        assert!(fs.ensure_writable(&dir.path().join("missing")).is_err());
    }
}
