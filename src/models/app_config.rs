use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file
pub const CONFIG_PATH_ENV: &str = "PLATE_ORGANIZER_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "./data/config.toml";

/// Application settings, read from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the `images` table
    pub database_path: PathBuf,
    /// Root directory of the local asset library
    pub library_path: PathBuf,
    /// Shortest plate accepted when saving photos
    pub min_plate_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./data/plates.db"),
            library_path: PathBuf::from("./data/library"),
            min_plate_len: 3,
        }
    }
}

impl AppConfig {
    /// Converts to TOML string
    #[allow(dead_code)]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Loads from TOML string, missing keys keep their defaults
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Path of the config file for this process
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Loads the config from [`AppConfig::config_path`]
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads the config file at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded config from {:?}: {:?}", path, config);

        Ok(config)
    }
}
