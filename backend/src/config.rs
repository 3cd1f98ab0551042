//! # Configuration
//!
//! Settings are read from a YAML file, by default
//! `<config_dir>/rikedom/config.yaml`, overridable with the `RIKEDOM_CONFIG`
//! environment variable. A missing file or key falls back to the default.
//! Without a `primary_store` entry the SQLite database lives in
//! `data_directory` as `rikedom.db`.
//!
//! ```yaml
//! bind_address: "127.0.0.1:3000"
//! allowed_origin: "http://localhost:8080"
//! data_directory: "/home/anna/.local/share/rikedom"
//! static_directory: "./dist"
//! primary_store:
//!   type: sqlite
//!   url: "sqlite:/home/anna/.local/share/rikedom/rikedom.db"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "RIKEDOM_CONFIG";

const APP_DIRECTORY: &str = "rikedom";
const DATABASE_FILE: &str = "rikedom.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimaryStoreConfig {
    /// SQLite database at `url`, created on first start
    Sqlite { url: String },
    /// Process-local store, lost on exit
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    /// Origin allowed to call the API from a browser
    pub allowed_origin: String,
    /// Home of the local cache and the default database
    pub data_directory: PathBuf,
    /// Built frontend served for every non-API path
    pub static_directory: Option<PathBuf>,
    /// Explicit primary store; see [`AppConfig::primary_store`]
    #[serde(rename = "primary_store")]
    pub primary_store_override: Option<PrimaryStoreConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
            data_directory: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIRECTORY),
            static_directory: None,
            primary_store_override: None,
        }
    }
}

impl AppConfig {
    /// The configured primary store, else SQLite inside `data_directory`
    pub fn primary_store(&self) -> PrimaryStoreConfig {
        match &self.primary_store_override {
            Some(store) => store.clone(),
            None => PrimaryStoreConfig::Sqlite {
                url: format!("sqlite:{}", self.data_directory.join(DATABASE_FILE).display()),
            },
        }
    }

    /// Config file location: `RIKEDOM_CONFIG` if set, else the user config directory
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_DIRECTORY).join("config.yaml"))
    }

    /// Load the config at the default location, or the defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                info!("No config directory available, using default configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using default configuration", path);
            return Ok(Self::default());
        }

        let yaml_content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig =
            serde_yaml::from_str(&yaml_content).with_context(|| format!("Invalid config file {:?}", path))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&temp_dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.allowed_origin, "http://localhost:8080");
        assert!(matches!(config.primary_store(), PrimaryStoreConfig::Sqlite { .. }));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(
            &path,
            "bind_address: \"0.0.0.0:8000\"\nprimary_store:\n  type: memory\nstatic_directory: ./dist\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.primary_store(), PrimaryStoreConfig::Memory);
        assert_eq!(config.static_directory, Some(PathBuf::from("./dist")));
        assert_eq!(config.allowed_origin, AppConfig::default().allowed_origin);
    }

    #[test]
    fn test_sqlite_store_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "primary_store:\n  type: sqlite\n  url: \"sqlite:/tmp/r.db\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            config.primary_store(),
            PrimaryStoreConfig::Sqlite {
                url: "sqlite:/tmp/r.db".to_string()
            }
        );
    }

    #[test]
    fn test_default_database_follows_data_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "data_directory: /srv/rikedom\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/srv/rikedom"));
        assert_eq!(
            config.primary_store(),
            PrimaryStoreConfig::Sqlite {
                url: "sqlite:/srv/rikedom/rikedom.db".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "primary_store: [not, a, store]\n").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
