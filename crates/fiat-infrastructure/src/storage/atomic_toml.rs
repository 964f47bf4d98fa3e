//! Atomic TOML file operations.
//!
//! Writes go to a sibling temp file that is fsynced and renamed over the
//! target, so readers only ever see a complete old or complete new file.
//! Read-modify-write cycles additionally hold an exclusive `fs2` lock.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fiat_core::FiatError;
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error on {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl From<AtomicTomlError> for FiatError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io { path, source } => {
                FiatError::io(format!("{}: {}", path.display(), source))
            }
            AtomicTomlError::Parse { path, source } => FiatError::Serialization {
                format: "TOML".to_string(),
                message: format!("{}: {}", path.display(), source),
            },
            AtomicTomlError::Serialize(e) => e.into(),
            AtomicTomlError::Lock { path, message } => {
                FiatError::io(format!("cannot lock {}: {}", path.display(), message))
            }
        }
    }
}

/// Handle to a TOML document stored at one path.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    private: bool,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _phantom: PhantomData,
        }
    }

    /// Like [`new`](Self::new), but every write leaves the file readable by the owner only.
    pub fn private(path: PathBuf) -> Self {
        Self {
            path,
            private: true,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file. A missing or blank file yields `None`.
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path();
        let mut tmp_file = self.create_temp(&tmp_path)?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| self.io_error(e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Read-modify-write under an exclusive lock. Returns the stored value.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T, AtomicTomlError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)?;
        Ok(data)
    }

    /// Deletes the file. Removing a missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicTomlError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "fiat".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn create_temp(&self, tmp_path: &Path) -> Result<File, AtomicTomlError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        if self.private {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(tmp_path).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> AtomicTomlError {
        AtomicTomlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Exclusive lock on `<path>.lock`, released on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        let io_error = |source| AtomicTomlError::Io {
            path: lock_path.clone(),
            source,
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error)?;

        file.lock_exclusive().map_err(|e| AtomicTomlError::Lock {
            path: lock_path.clone(),
            message: e.to_string(),
        })?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Doc>::new(temp_dir.path().join("doc.toml"));

        let doc = Doc {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&doc).unwrap();
        assert_eq!(file.load().unwrap(), Some(doc));
    }

    #[test]
    fn test_missing_and_blank_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        let file = AtomicTomlFile::<Doc>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        fs::write(&path, "name = ").unwrap();
        let err = AtomicTomlFile::<Doc>::new(path).load().unwrap_err();
        assert!(matches!(err, AtomicTomlError::Parse { .. }));
        assert!(err.to_string().contains("doc.toml"));
    }

    #[test]
    fn test_update_accumulates() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Doc>::new(temp_dir.path().join("doc.toml"));
        let default = Doc {
            name: "default".to_string(),
            count: 0,
        };

        file.update(default.clone(), |d| d.count += 10).unwrap();
        let stored = file.update(default, |d| d.count += 5).unwrap();
        assert_eq!(stored.count, 15);
        assert_eq!(file.load().unwrap().unwrap().count, 15);
        assert!(!temp_dir.path().join("doc.lock").exists());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        let file = AtomicTomlFile::<Doc>::new(path.clone());
        file.save(&Doc {
            name: "x".into(),
            count: 1,
        })
        .unwrap();
        assert!(path.exists());
        assert!(!temp_dir.path().join(".doc.toml.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Doc>::new(temp_dir.path().join("doc.toml"));
        file.save(&Doc {
            name: "x".into(),
            count: 1,
        })
        .unwrap();
        file.remove().unwrap();
        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.toml");
        AtomicTomlFile::<Doc>::private(path.clone())
            .save(&Doc {
                name: "x".into(),
                count: 1,
            })
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
