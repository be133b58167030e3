//! Configuration management with file persistence
//!
//! All settings are passed explicitly into constructors; there is no
//! process-wide configuration singleton.

use crate::error::{Error, Result};
use crate::storage::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Agenda configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Database-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite database file path; `None` uses the platform data directory
    pub path: Option<PathBuf>,
    /// Maximum connections in the pool
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 5,
        }
    }
}

/// Default configuration file path
pub fn default_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("agenda").join("config.toml")
    } else {
        PathBuf::from("agenda.toml")
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    ///
    /// `AGENDA_CONFIG` overrides the file location and `AGENDA_DB_PATH`
    /// overrides the database path.
    pub fn load() -> Result<Self> {
        let path = env::var("AGENDA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))?
        } else {
            Self::default()
        };

        if let Ok(db_path) = env::var("AGENDA_DB_PATH") {
            config.database.path = Some(PathBuf::from(db_path));
        }

        Ok(config)
    }

    /// Persist the configuration to the given path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Build the storage layer configuration from these settings
    pub fn database_config(&self) -> DatabaseConfig {
        let mut db = match &self.database.path {
            Some(path) => DatabaseConfig::with_path(path.clone()),
            None => DatabaseConfig::default(),
        };
        db.max_connections = self.database.max_connections;
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let config = Config::default();
        assert!(config.database.path.is_none());
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.database.path = Some(PathBuf::from("/tmp/clinic.db"));
        config.database.max_connections = 2;
        config.save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let loaded: Config = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.database.path, Some(PathBuf::from("/tmp/clinic.db")));
        assert_eq!(loaded.database.max_connections, 2);
    }

    #[test]
    fn test_database_config_uses_configured_path() {
        let mut config = Config::default();
        config.database.path = Some(PathBuf::from("/tmp/clinic.db"));
        let db = config.database_config();
        assert_eq!(db.path, PathBuf::from("/tmp/clinic.db"));
    }
}
