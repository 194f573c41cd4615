//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error: defaults apply and a warning is logged.

use crate::db::{RefreshColumn, UpsertPolicy};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "ARMORY_ROOT_FOLDER";

/// Configuration loaded from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the character database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Battle.net API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API region (us, eu, kr, tw)
    #[serde(default = "default_region")]
    pub region: String,

    /// Locale key used to pick display names out of localized fields
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Override for the OAuth token endpoint
    #[serde(default)]
    pub oauth_url: Option<String>,

    /// Override for the game data API base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            locale: default_locale(),
            oauth_url: None,
            base_url: None,
        }
    }
}

/// Store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Columns refreshed when a re-imported character already exists
    #[serde(default = "default_refresh_columns")]
    pub refresh_columns: Vec<RefreshColumn>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            refresh_columns: default_refresh_columns(),
        }
    }
}

impl StoreConfig {
    pub fn upsert_policy(&self) -> UpsertPolicy {
        UpsertPolicy::new(self.refresh_columns.clone())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "us".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_refresh_columns() -> Vec<RefreshColumn> {
    UpsertPolicy::default().refresh
}

/// Default configuration file path (`~/.config/armory/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("armory").join("config.toml"))
}

/// Load TOML configuration
///
/// An explicitly requested file must exist. Without one, the default path is
/// tried and compiled defaults are used when it is absent.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_toml_config(&path),
        Some(path) => {
            warn!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Read and parse a TOML configuration file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_root: Option<&Path>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_root {
        return path.to_path_buf();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("armory"))
        .unwrap_or_else(|| PathBuf::from("./armory_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.api.region, "us");
        assert_eq!(config.api.locale, "en_US");
        assert_eq!(
            config.store.refresh_columns,
            vec![RefreshColumn::CharacterClass]
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [api]
            region = "eu"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.region, "eu");
        assert_eq!(config.api.locale, "en_US");
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_refresh_columns_from_toml() {
        let config: TomlConfig = toml::from_str(
            r#"
            [store]
            refresh_columns = ["character_class", "level", "average_item_level"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.store.upsert_policy(),
            UpsertPolicy::new(vec![
                RefreshColumn::CharacterClass,
                RefreshColumn::Level,
                RefreshColumn::AverageItemLevel,
            ])
        );
    }

    #[test]
    fn test_unknown_refresh_column_rejected() {
        let result: std::result::Result<TomlConfig, _> = toml::from_str(
            r#"
            [store]
            refresh_columns = ["id"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_arg_wins() {
        let resolved = resolve_root_folder(
            Some(Path::new("/from/cli")),
            "ARMORY_TEST_UNSET_VARIABLE",
            Some(Path::new("/from/toml")),
        );
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_toml_used_when_no_cli_or_env() {
        let resolved = resolve_root_folder(
            None,
            "ARMORY_TEST_UNSET_VARIABLE",
            Some(Path::new("/from/toml")),
        );
        assert_eq!(resolved, PathBuf::from("/from/toml"));
    }
}
