//! Where RegSense keeps its settings and logs.
//!
//! Everything lives under one `.regsense` folder inside the OS config
//! directory. Setting `REGSENSE_CONFIG_HOME` replaces the OS config directory,
//! which keeps tests and portable installs self-contained.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Folder created under the config base directory.
pub const APP_DIR_NAME: &str = ".regsense";
/// Environment variable that overrides the config base directory.
pub const CONFIG_HOME_ENV: &str = "REGSENSE_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory could be resolved for application files")]
    NoBaseDir,
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolved application directory layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// Resolve the layout from the environment and create the root folder.
    pub fn resolve() -> Result<Self, AppDirError> {
        let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
        Self::under(&base)
    }

    /// Use `base` in place of the OS config directory.
    pub fn under(base: &Path) -> Result<Self, AppDirError> {
        let root = base.join(APP_DIR_NAME);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Log folder, created on demand.
    pub fn logs_dir(&self) -> Result<PathBuf, AppDirError> {
        let path = self.root.join(LOGS_DIR_NAME);
        ensure_dir(&path)?;
        Ok(path)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}

fn ensure_dir(path: &Path) -> Result<(), AppDirError> {
    std::fs::create_dir_all(path).map_err(|source| AppDirError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn config_base_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_HOME_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()),
    }
}
