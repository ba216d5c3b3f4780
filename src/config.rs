//! Persisted settings stored as `config.toml` in the app directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alerts::api::DEFAULT_BASE_URL;
use crate::app_dirs::AppDirs;

/// Server-side cap for both list and classification batch sizes.
const MAX_BATCH: u32 = 200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub api: ApiSettings,
}

/// How the dashboard talks to the alerts backend.
///
/// Config keys: `base_url`, `list_limit`, `default_analyse_batch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Classification batch used before stats have loaded.
    #[serde(default = "default_analyse_batch")]
    pub default_analyse_batch: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_limit: default_list_limit(),
            default_analyse_batch: default_analyse_batch(),
        }
    }
}

impl ApiSettings {
    /// Trim the URL and pull limits into the range the backend accepts.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            default_base_url()
        } else {
            trimmed.to_string()
        };
        self.list_limit = self.list_limit.clamp(1, MAX_BATCH);
        self.default_analyse_batch = self.default_analyse_batch.clamp(1, MAX_BATCH);
        self
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_list_limit() -> u32 {
    200
}

fn default_analyse_batch() -> u32 {
    10
}

/// Load settings from the app directory, writing defaults on first launch.
pub fn load_or_default(dirs: &AppDirs) -> Result<AppSettings, ConfigError> {
    let path = dirs.config_file();
    if !path.exists() {
        let settings = AppSettings::default();
        save_to_path(&settings, &path)?;
        return Ok(settings);
    }
    load_from_path(&path)
}

/// Parse a settings file and normalize its values.
pub fn load_from_path(path: &Path) -> Result<AppSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: AppSettings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(AppSettings {
        api: settings.api.normalized(),
    })
}

pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
