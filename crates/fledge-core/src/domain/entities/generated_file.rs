use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// One rendered output file, ready for materialization.
///
/// This is the output of a renderer and the input of the write stage. It
/// contains no behavior beyond its own invariants.
///
/// Invariant: `path` is a relative POSIX path. It is non-empty, never starts
/// with `/`, never contains `//`, `\`, `.` or `..` segments. Enforced at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedFile {
    path: String,
    content: String,
    overwrite: bool,
}

impl GeneratedFile {
    /// Create a file that overwrites any existing file at `path`.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        validate_relative_path(&path)?;
        Ok(Self {
            path,
            content: content.into(),
            overwrite: true,
        })
    }

    /// Same file, but left untouched if something already exists at `path`.
    pub fn preserve_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Resolve this file's location under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }

    pub fn into_parts(self) -> (String, String, bool) {
        (self.path, self.content, self.overwrite)
    }
}

impl fmt::Display for GeneratedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Check the relative POSIX path invariant shared by generated files and
/// write operations.
pub fn validate_relative_path(path: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidFilePath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }
    if path.starts_with('/') {
        return Err(invalid("path must be relative"));
    }
    if path.contains("//") {
        return Err(invalid("path contains an empty segment"));
    }
    if path.contains('\\') {
        return Err(invalid("path must use '/' separators"));
    }
    if path.contains('\0') {
        return Err(invalid("path contains a NUL byte"));
    }
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(invalid("path must not contain '.' or '..' segments"));
    }

    Ok(())
}
