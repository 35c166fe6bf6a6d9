//! TOML file store.
//!
//! A [`TomlFile`] binds a parsed document to its on-disk path. Reads go
//! through `toml_edit` so that comments, key order, and whitespace survive a
//! later write unchanged. The store holds no cache: callers decide when to
//! re-read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml_edit::DocumentMut;

/// Errors from reading or writing a manifest file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read manifest file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse manifest file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("failed to write manifest file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle to a single TOML document on disk.
#[derive(Debug, Clone)]
pub struct TomlFile {
    path: PathBuf,
}

impl TomlFile {
    /// Create a handle for the given path. The file is not touched until
    /// [`TomlFile::read`] or [`TomlFile::write`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing path denotes a present file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the file, retaining all formatting metadata.
    ///
    /// Fails with [`StoreError::Read`] if the file is absent or unreadable,
    /// and with [`StoreError::Parse`] if the contents are not well-formed
    /// TOML.
    pub fn read(&self) -> Result<DocumentMut, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        raw.parse::<DocumentMut>().map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Serialize `document` with its formatting intact and replace the file's
    /// contents. The prior contents are fully overwritten.
    pub fn write(&self, document: &DocumentMut) -> Result<(), StoreError> {
        fs::write(&self.path, document.to_string()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.toml");

        let file = TomlFile::new(&path);
        assert!(!file.exists());

        fs::write(&path, "name = \"demo\"\n").unwrap();
        assert!(file.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let file = TomlFile::new(dir.path().join("absent.toml"));

        let err = file.read().unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_read_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "name = \n").unwrap();

        let err = TomlFile::new(&path).read().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.toml");
        fs::write(&path, "name = \"demo\"\nversion = \"0.1.0\"\n").unwrap();

        let file = TomlFile::new(&path);
        let document = file.read().unwrap();
        file.write(&document).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "name = \"demo\"\nversion = \"0.1.0\"\n");
    }

    #[test]
    fn test_write_preserves_comments_and_order() {
        let source = "\
# project manifest
name = \"demo\"   # inline comment

[dependencies]
serde = \"1.0\"
";
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.toml");
        fs::write(&path, source).unwrap();

        let file = TomlFile::new(&path);
        let document = file.read().unwrap();
        file.write(&document).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let file = TomlFile::new(dir.path().join("no-such-dir").join("project.toml"));

        let err = file.write(&DocumentMut::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
