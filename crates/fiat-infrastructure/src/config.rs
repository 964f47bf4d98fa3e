//! Configuration service.
//!
//! Loads `config.toml` and fills anything the file leaves unset from the
//! environment, then from built-in defaults.
//!
//! Priority: config file > environment variables > defaults.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use fiat_core::{FiatError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::FiatPaths;
use crate::storage::AtomicTomlFile;

pub const ENV_BACKEND_URL: &str = "FIAT_BACKEND_URL";
pub const ENV_BACKEND_ANON_KEY: &str = "FIAT_BACKEND_ANON_KEY";
pub const ENV_DATABASE_PATH: &str = "FIAT_DATABASE_PATH";
pub const ENV_LOG: &str = "FIAT_LOG";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiatConfig {
    pub backend: BackendConfig,
    pub local: LocalConfig,
    pub logging: LoggingConfig,
    pub limits: Limits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Overrides `<data_dir>/fiat.db`.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `fiat_application=debug`.
    pub level: Option<String>,
}

/// Fixed listing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub recent_moods: usize,
    pub journal_list: usize,
    pub confession_list: usize,
    pub truth_list: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            recent_moods: 30,
            journal_list: 200,
            confession_list: 100,
            truth_list: 50,
        }
    }
}

/// Everything needed to reach the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    /// Project URL without a trailing slash.
    pub url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

impl FiatConfig {
    /// Fills unset fields from `lookup` (normally the process environment).
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.backend.url.is_none() {
            self.backend.url = non_empty(ENV_BACKEND_URL);
        }
        if self.backend.anon_key.is_none() {
            self.backend.anon_key = non_empty(ENV_BACKEND_ANON_KEY);
        }
        if self.local.database_path.is_none() {
            self.local.database_path = non_empty(ENV_DATABASE_PATH).map(PathBuf::from);
        }
        if self.logging.level.is_none() {
            self.logging.level = non_empty(ENV_LOG);
        }
        self
    }

    /// Backend coordinates. Missing values only become an error here, when a
    /// remote adapter is actually being built.
    pub fn backend_settings(&self) -> Result<BackendSettings> {
        let url = self
            .backend
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                FiatError::config(format!(
                    "backend URL is not set (config [backend] url or {ENV_BACKEND_URL})"
                ))
            })?;
        let anon_key = self
            .backend
            .anon_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                FiatError::config(format!(
                    "backend key is not set (config [backend] anon_key or {ENV_BACKEND_ANON_KEY})"
                ))
            })?;

        Ok(BackendSettings {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            timeout: Duration::from_secs(self.backend.request_timeout_secs.max(1)),
        })
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn database_path(&self, paths: &FiatPaths) -> PathBuf {
        self.local
            .database_path
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }
}

/// Loads and caches the resolved configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<FiatConfig>>,
    cache: Arc<RwLock<Option<FiatConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &FiatPaths) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(paths.config_file())),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// The resolved configuration, reading the file on first access.
    pub fn get_config(&self) -> Result<FiatConfig> {
        if let Some(cached) = self.cache.read().ok().and_then(|c| c.clone()) {
            return Ok(cached);
        }

        let from_file = self.file.load()?.unwrap_or_default();
        let resolved = from_file.with_env(|key| std::env::var(key).ok());
        tracing::debug!(
            "Loaded configuration from {} (backend configured: {})",
            self.file.path().display(),
            resolved.backend.url.is_some()
        );

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(resolved.clone());
        }
        Ok(resolved)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
    }
}
