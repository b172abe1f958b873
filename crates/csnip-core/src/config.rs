//! User configuration for csnip

use crate::database::default_db_path;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "CSNIP_CONFIG";

/// Environment variable overriding the database location
pub const DATABASE_ENV: &str = "CSNIP_DATABASE";

/// Settings read from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the snippets
    pub database_path: Option<PathBuf>,
    /// Rows per page when listing everything
    pub page_size: i64,
    /// Copy a single fetched snippet to the clipboard
    pub copy_on_get: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            page_size: 100,
            copy_on_get: true,
        }
    }
}

impl Config {
    /// The database file to open: configured path or the platform default
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(dirs::config_dir()
        .ok_or_else(|| Error::other("Could not determine config directory"))?
        .join("csnip")
        .join("config.toml"))
}

/// Parse a config file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let config_str = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    if config.page_size < 1 {
        return Err(Error::Config(format!(
            "page_size must be at least 1, got {}",
            config.page_size
        )));
    }
    Ok(config)
}

/// Load the user's config and apply environment overrides.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;
    let mut config = load_config_from(&path)?;
    log::debug!("Loaded configuration from {}", path.display());

    if let Some(db) = std::env::var_os(DATABASE_ENV).filter(|v| !v.is_empty()) {
        config.database_path = Some(PathBuf::from(db));
    }

    Ok(config)
}
