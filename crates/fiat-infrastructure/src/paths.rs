//! Unified path management for fiat files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fiat/              # Config directory
//! ├── config.toml              # Application configuration
//! └── session.toml             # Persisted auth session (0600)
//!
//! ~/.local/share/fiat/         # Data directory
//! ├── fiat.db                  # Local store (SQLite)
//! └── logs/
//!     └── fiat.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use fiat_core::FiatError;

const APP_DIR: &str = "fiat";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for FiatError {
    fn from(err: PathError) -> Self {
        FiatError::config(err.to_string())
    }
}

/// Resolves every file location fiat uses.
///
/// With a base path, both config and data live under it; this keeps tests
/// and portable installs away from the user's real directories.
#[derive(Debug, Clone)]
pub struct FiatPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl FiatPaths {
    pub fn new(base_path: Option<&Path>) -> Result<Self, PathError> {
        match base_path {
            Some(base) => Ok(Self {
                config_dir: base.join("config"),
                data_dir: base.join("data"),
            }),
            None => {
                let config = dirs::config_dir().ok_or(PathError::HomeDirNotFound)?;
                let data = dirs::data_dir().ok_or(PathError::HomeDirNotFound)?;
                Ok(Self {
                    config_dir: config.join(APP_DIR),
                    data_dir: data.join(APP_DIR),
                })
            }
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Persisted session credentials.
    ///
    /// # Security Note
    ///
    /// Written with 600 permissions on Unix systems.
    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.toml")
    }

    /// Default location of the local SQLite store.
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join("fiat.db")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
