//! File-layout configuration shared with the surrounding service.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// Root-layout section of the service configuration file.
///
/// All served trees hang off `data_root`; the production tree the resolver
/// walks lives under `production_dir`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfig {
    /// Mount point all served data lives under.
    pub data_root: PathBuf,
    /// Production tree directory under the data root.
    pub production_dir: String,
    /// Raw (pre-production) uploads directory, if served.
    #[serde(default)]
    pub raw_data_dir: Option<String>,
    /// Packaged-download staging directory, if served.
    #[serde(default)]
    pub download_dir: Option<String>,
}

impl FilesConfig {
    /// Reads and parses a JSON configuration file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// The production tree root the resolver walks.
    pub fn production_root(&self) -> PathBuf {
        self.data_root.join(&self.production_dir)
    }

    pub fn raw_data_root(&self) -> Option<PathBuf> {
        self.raw_data_dir
            .as_ref()
            .map(|dir| self.data_root.join(dir))
    }

    pub fn download_root(&self) -> Option<PathBuf> {
        self.download_dir
            .as_ref()
            .map(|dir| self.data_root.join(dir))
    }
}
