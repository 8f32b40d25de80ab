//! The injected file backend: three operations (read/write/delete) the core
//! treats as opaque. Idiomatic-Rust shape of the spec's callback triple,
//! per the teacher crate's own design principle of an injected backend over
//! globals.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("path '{0}' resolves outside the target directory")]
    PathTraversal(PathBuf),
}

/// Read/write/delete by path, returning an opaque receipt string on
/// success. The core never inspects the receipt; it only concatenates them.
pub trait FileBackend {
    fn read(&self, path: &Path) -> Result<String, BackendError>;
    fn write(&self, path: &Path, contents: &str) -> Result<String, BackendError>;
    fn delete(&self, path: &Path) -> Result<String, BackendError>;
}

/// A real-filesystem backend rooted at `base_dir`, with the same
/// path-traversal guard the teacher crate applies before ever touching disk:
/// canonicalize both the base and the resolved target, and refuse anything
/// that resolves outside the base.
pub struct FsBackend {
    base_dir: PathBuf,
}

impl FsBackend {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn base(&self) -> Result<PathBuf, BackendError> {
        fs::canonicalize(&self.base_dir).map_err(|source| BackendError::Io {
            path: self.base_dir.clone(),
            source,
        })
    }

    /// Resolves `path` for a read-only operation (read/delete). Never
    /// touches the filesystem beyond canonicalizing an existing ancestor;
    /// a non-existent target is checked lexically against `base_dir`.
    fn resolve_readonly(&self, path: &Path) -> Result<PathBuf, BackendError> {
        let base = self.base()?;
        let target = self.base_dir.join(path);

        let resolved = if target.exists() {
            fs::canonicalize(&target).map_err(|source| BackendError::Io {
                path: target.clone(),
                source,
            })?
        } else {
            base.join(path)
        };

        if !resolved.starts_with(&base) {
            return Err(BackendError::PathTraversal(path.to_path_buf()));
        }
        Ok(target)
    }

    /// Resolves `path` for a write, creating any missing parent directories
    /// so the write itself never fails on a missing directory.
    fn resolve_for_write(&self, path: &Path) -> Result<PathBuf, BackendError> {
        let base = self.base()?;
        let target = self.base_dir.join(path);

        let parent = target.parent().unwrap_or(Path::new(""));
        fs::create_dir_all(parent).map_err(|source| BackendError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        let resolved = fs::canonicalize(parent)
            .map_err(|source| BackendError::Io {
                path: parent.to_path_buf(),
                source,
            })?
            .join(target.file_name().unwrap_or_default());

        if !resolved.starts_with(&base) {
            return Err(BackendError::PathTraversal(path.to_path_buf()));
        }
        Ok(target)
    }
}

impl FileBackend for FsBackend {
    fn read(&self, path: &Path) -> Result<String, BackendError> {
        let target = self.resolve_readonly(path)?;
        fs::read_to_string(&target).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                BackendError::NotFound(path.to_path_buf())
            } else {
                BackendError::Io {
                    path: target.clone(),
                    source,
                }
            }
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<String, BackendError> {
        let target = self.resolve_for_write(path)?;
        fs::write(&target, contents).map_err(|source| BackendError::Io {
            path: target.clone(),
            source,
        })?;
        Ok(format!("Wrote file: {}", path.display()))
    }

    fn delete(&self, path: &Path) -> Result<String, BackendError> {
        let target = self.resolve_readonly(path)?;
        fs::remove_file(&target).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                BackendError::NotFound(path.to_path_buf())
            } else {
                BackendError::Io {
                    path: target.clone(),
                    source,
                }
            }
        })?;
        Ok(format!("Deleted file: {}", path.display()))
    }
}

/// An in-memory backend for tests, grounded directly in the reference
/// Python test suite's `mock_read`/`mock_write`/`mock_delete` fixtures.
#[derive(Default)]
pub struct InMemoryBackend {
    files: RefCell<HashMap<PathBuf, String>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(pairs: impl IntoIterator<Item = (PathBuf, String)>) -> Self {
        Self {
            files: RefCell::new(pairs.into_iter().collect()),
        }
    }

    pub fn snapshot(&self) -> HashMap<PathBuf, String> {
        self.files.borrow().clone()
    }
}

impl FileBackend for InMemoryBackend {
    fn read(&self, path: &Path) -> Result<String, BackendError> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<String, BackendError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(format!("Wrote file: {}", path.display()))
    }

    fn delete(&self, path: &Path) -> Result<String, BackendError> {
        if self.files.borrow_mut().remove(path).is_none() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        Ok(format!("Deleted file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_backend_round_trips() {
        let backend = InMemoryBackend::new();
        backend.write(Path::new("a.txt"), "hello").unwrap();
        assert_eq!(backend.read(Path::new("a.txt")).unwrap(), "hello");
        backend.delete(Path::new("a.txt")).unwrap();
        assert!(matches!(
            backend.read(Path::new("a.txt")).unwrap_err(),
            BackendError::NotFound(_)
        ));
    }

    #[test]
    fn fs_backend_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        let err = backend.write(Path::new("../escape.txt"), "x").unwrap_err();
        assert!(matches!(err, BackendError::PathTraversal(_)));
    }

    #[test]
    fn fs_backend_writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        backend.write(Path::new("nested/file.txt"), "content").unwrap();
        assert_eq!(backend.read(Path::new("nested/file.txt")).unwrap(), "content");
    }
}
