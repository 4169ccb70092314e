//! Configuration parsing and management for Avatar Studio

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AvatarError, Result};
use crate::persistence::JsonDirRepository;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Where saved avatars live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per saved avatar
    pub dir: PathBuf,
    /// Pretty-print saved files
    pub pretty: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("avatars"),
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl StudioConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| AvatarError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| AvatarError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self> {
        let paths = [
            PathBuf::from("avatar-studio.toml"),
            PathBuf::from("config/avatar-studio.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.dir.as_os_str().is_empty() {
            return Err(AvatarError::Config {
                field: "storage.dir".to_string(),
                message: "Storage directory must not be empty".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(AvatarError::Config {
                field: "logging.level".to_string(),
                message: "Log level must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Repository for the configured storage directory
    pub fn repository(&self) -> JsonDirRepository {
        JsonDirRepository::new(&self.storage.dir).with_pretty(self.storage.pretty)
    }
}
