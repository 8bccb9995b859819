//! Application configuration loaded from `feast-ledger.toml`.
//!
//! Everything has a default so the app runs without a config file at all; the
//! defaults describe the lists of the event the tracker was first built for.
//! A config file only needs the keys it wants to override.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::Deserialize;
use tracing::info;

use crate::errors::ConfigError;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FEAST_LEDGER_CONFIG";
/// Config file looked up in the working directory when the variable is unset.
const DEFAULT_CONFIG_FILE: &str = "feast-ledger.toml";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".feast-ledger";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "feast-ledger.sqlite";

/// One named list shown in a selector, keyed by the name stored in the
/// database and the CSV file stem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListConfig {
    pub key: String,
    pub label: String,
    /// Marks the guest category whose travel cohort is tracked.
    #[serde(default)]
    pub cohort: bool,
}

impl ListConfig {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            cohort: false,
        }
    }

    fn cohort(key: &str, label: &str) -> Self {
        Self {
            cohort: true,
            ..Self::new(key, label)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Explicit SQLite path; falls back to `~/.feast-ledger/feast-ledger.sqlite`.
    pub database_path: Option<PathBuf>,
    pub busy_timeout_secs: u64,
    /// Root of the `ingredients/`, `invitees/` and `menus/` CSV folders.
    pub data_dir: PathBuf,
    pub menu_file: String,
    pub ingredient_lists: Vec<ListConfig>,
    pub invitee_lists: Vec<ListConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            busy_timeout_secs: 30,
            data_dir: PathBuf::from("data"),
            menu_file: "Menus-List.csv".to_string(),
            ingredient_lists: vec![
                ListConfig::new("Local-List", "Local List"),
                ListConfig::new("Reception-Raasan", "Reception - Raasan"),
                ListConfig::new("Reception-Tent", "Reception - Tent"),
                ListConfig::new("Reception-Extras", "Reception - Extras"),
                ListConfig::new("Reception-Pakoda", "Reception - Pakoda"),
                ListConfig::new("Reception-Coffee", "Reception - Coffee"),
                ListConfig::new("Home-Raasan", "Home - Raasan"),
                ListConfig::new("Home-Dessert", "Home - Dessert"),
                ListConfig::new("Home-Tent", "Home - Tent"),
            ],
            invitee_lists: vec![
                ListConfig::new("Invitee-List-Poite-03.12.25", "Poite (03/12/25)"),
                ListConfig::cohort("Invitee-List-Barati-05.12.25", "Barati (05/12/25)"),
                ListConfig::new("Invitee-List-Boubhaat-07.12.25", "Boubhaat (07/12/25)"),
                ListConfig::new("Invitee-List-Return-06.12.25", "Return (06/12/25)"),
            ],
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// An explicit path wins even when the file is missing, so a typo in the
/// variable surfaces as a read error instead of silently using defaults.
fn locate_from(env_path: Option<OsString>, fallback: &Path) -> ConfigSource {
    match env_path {
        Some(path) if !path.is_empty() => ConfigSource::File(PathBuf::from(path)),
        _ if fallback.exists() => ConfigSource::File(fallback.to_path_buf()),
        _ => ConfigSource::Defaults,
    }
}

impl AppConfig {
    /// Load from `$FEAST_LEDGER_CONFIG`, then `./feast-ledger.toml`, then the
    /// built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_source(&Self::locate())
    }

    /// Which source [`AppConfig::load`] would read. The binary resolves this
    /// before logging is up and reports it afterwards.
    pub fn locate() -> ConfigSource {
        locate_from(env::var_os(CONFIG_ENV_VAR), Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Read `source`, or build the defaults.
    pub fn load_source(source: &ConfigSource) -> Result<Self, ConfigError> {
        match source {
            ConfigSource::File(path) => Self::load_from(path),
            ConfigSource::Defaults => Ok(Self::default()),
        }
    }

    /// Parse one TOML file; missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolve the absolute path to the SQLite database.
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }

    /// `<data_dir>/ingredients/<key>.csv`
    pub fn ingredient_csv(&self, list: &ListConfig) -> PathBuf {
        self.data_dir
            .join("ingredients")
            .join(format!("{}.csv", list.key))
    }

    /// `<data_dir>/invitees/<key>.csv`
    pub fn invitee_csv(&self, list: &ListConfig) -> PathBuf {
        self.data_dir
            .join("invitees")
            .join(format!("{}.csv", list.key))
    }

    pub fn menu_csv(&self) -> PathBuf {
        self.data_dir.join("menus").join(&self.menu_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_original_event() {
        let config = AppConfig::default();
        assert_eq!(config.ingredient_lists.len(), 9);
        assert_eq!(config.invitee_lists.len(), 4);
        let cohort: Vec<_> = config.invitee_lists.iter().filter(|l| l.cohort).collect();
        assert_eq!(cohort.len(), 1);
        assert_eq!(cohort[0].key, "Invitee-List-Barati-05.12.25");
        assert_eq!(config.busy_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            database_path = "/tmp/party.sqlite"
            data_dir = "seed"

            [[invitee_lists]]
            key = "Guests"
            label = "All guests"
            cohort = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/party.sqlite")
        );
        assert_eq!(config.invitee_lists.len(), 1);
        assert!(config.invitee_lists[0].cohort);
        assert_eq!(config.ingredient_lists.len(), 9);
        assert_eq!(config.menu_csv(), PathBuf::from("seed/menus/Menus-List.csv"));
    }

    #[test]
    fn csv_paths_follow_list_keys() {
        let config = AppConfig::default();
        let list = &config.ingredient_lists[0];
        assert_eq!(
            config.ingredient_csv(list),
            PathBuf::from("data/ingredients/Local-List.csv")
        );
    }

    #[test]
    fn explicit_path_beats_fallback_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let fallback = dir.path().join("feast-ledger.toml");

        assert_eq!(locate_from(None, &fallback), ConfigSource::Defaults);
        assert_eq!(
            locate_from(Some(OsString::new()), &fallback),
            ConfigSource::Defaults
        );

        fs::write(&fallback, "busy_timeout_secs = 5").unwrap();
        assert_eq!(
            locate_from(None, &fallback),
            ConfigSource::File(fallback.clone())
        );
        assert_eq!(
            locate_from(Some(OsString::from("/etc/party.toml")), &fallback),
            ConfigSource::File(PathBuf::from("/etc/party.toml"))
        );

        let config = AppConfig::load_source(&ConfigSource::File(fallback)).unwrap();
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/feast-ledger.toml"));
        assert!(matches!(
            AppConfig::load_source(&source),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(AppConfig::from_toml_str("busy_timeout_secs = \"soon\"").is_err());
    }
}
