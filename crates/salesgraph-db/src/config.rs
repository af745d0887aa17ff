//! # Loader Configuration
//!
//! Where the record source lives and how to reach the database.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALESGRAPH_SOURCE=sqlite                                           │
//! │     SALESGRAPH_DATA_DIR=/srv/sales/data                                │
//! │     SALESGRAPH_DB_PATH=/srv/sales/salesgraph.db                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/salesgraph/salesgraph.toml (Linux)                       │
//! │     ~/Library/Application Support/com.salesgraph.salesgraph/ (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     CSV files under ./data, database at ./salesgraph.db               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # salesgraph.toml
//! [source]
//! kind = "csv"            # csv | sqlite
//! data_dir = "data"
//! persons = "Persons.csv"
//! stores = "Stores.csv"
//! items = "Items.csv"
//! sales = "Sales.csv"
//! sale_items = "SaleItems.csv"
//!
//! [database]
//! path = "salesgraph.db"
//! max_connections = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use salesgraph_core::RecordKind;

use crate::csv_source::{default_file_name, CsvSource};
use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

// =============================================================================
// Source Kind
// =============================================================================

/// Which record source the loader reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Delimited files in a data directory.
    #[default]
    Csv,

    /// A snapshot of the SQLite database.
    Sqlite,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Csv => write!(f, "csv"),
            SourceKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "file" | "files" => Ok(SourceKind::Csv),
            "sqlite" | "db" | "database" => Ok(SourceKind::Sqlite),
            _ => Err(DbError::Config(format!(
                "Unknown source kind: '{}'. Valid: csv, sqlite",
                s
            ))),
        }
    }
}

// =============================================================================
// Source Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default)]
    pub kind: SourceKind,

    /// Directory holding the record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File names relative to `data_dir`. An empty name disables that kind.
    #[serde(default = "default_persons")]
    pub persons: String,

    #[serde(default = "default_stores")]
    pub stores: String,

    #[serde(default = "default_items")]
    pub items: String,

    #[serde(default = "default_sales")]
    pub sales: String,

    #[serde(default = "default_sale_items")]
    pub sale_items: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_persons() -> String {
    default_file_name(RecordKind::Person).to_string()
}

fn default_stores() -> String {
    default_file_name(RecordKind::Store).to_string()
}

fn default_items() -> String {
    default_file_name(RecordKind::Item).to_string()
}

fn default_sales() -> String {
    default_file_name(RecordKind::Sale).to_string()
}

fn default_sale_items() -> String {
    default_file_name(RecordKind::SaleItem).to_string()
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            kind: SourceKind::default(),
            data_dir: default_data_dir(),
            persons: default_persons(),
            stores: default_stores(),
            items: default_items(),
            sales: default_sales(),
            sale_items: default_sale_items(),
        }
    }
}

impl SourceSettings {
    /// The configured file name for a kind.
    pub fn file_name(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Person => &self.persons,
            RecordKind::Store => &self.stores,
            RecordKind::Item => &self.items,
            RecordKind::Sale => &self.sales,
            RecordKind::SaleItem => &self.sale_items,
        }
    }

    /// Builds the CSV source, leaving out kinds whose file name is empty.
    pub fn csv_source(&self) -> CsvSource {
        RecordKind::PIPELINE
            .iter()
            .fold(CsvSource::empty(), |source, &kind| match self.file_name(kind) {
                "" => source,
                name => source.with_file(kind, self.data_dir.join(name)),
            })
    }
}

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("salesgraph.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSettings {
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.path.clone()).max_connections(self.max_connections)
    }
}

// =============================================================================
// Loader Configuration
// =============================================================================

/// Complete loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub source: SourceSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl LoaderConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (salesgraph.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses one TOML file without applying overrides.
    pub fn from_file(path: &Path) -> DbResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DbError::File {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| DbError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        if self.source.kind == SourceKind::Csv && self.source.data_dir.as_os_str().is_empty() {
            return Err(DbError::Config("data_dir must not be empty for a csv source".into()));
        }

        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// An unrecognized `SALESGRAPH_SOURCE` is an error rather than a silent
    /// fallback to the file value.
    fn apply_overrides<F>(&mut self, lookup: F) -> DbResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("SALESGRAPH_SOURCE") {
            debug!(kind = %kind, "Overriding source kind from environment");
            self.source.kind = kind.parse()?;
        }

        if let Some(dir) = lookup("SALESGRAPH_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.source.data_dir = PathBuf::from(dir);
        }

        if let Some(path) = lookup("SALESGRAPH_DB_PATH") {
            if path.is_empty() {
                warn!("Ignoring empty SALESGRAPH_DB_PATH");
            } else {
                debug!(path = %path, "Overriding database path from environment");
                self.database.path = PathBuf::from(path);
            }
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "salesgraph", "salesgraph")
            .map(|dirs| dirs.config_dir().join("salesgraph.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("csv".parse::<SourceKind>().unwrap(), SourceKind::Csv);
        assert_eq!("SQLite".parse::<SourceKind>().unwrap(), SourceKind::Sqlite);
        assert_eq!("db".parse::<SourceKind>().unwrap(), SourceKind::Sqlite);
        assert!("mysql".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.source.kind, SourceKind::Csv);
        assert_eq!(config.source.data_dir, PathBuf::from("data"));
        assert_eq!(config.source.sale_items, "SaleItems.csv");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LoaderConfig = toml::from_str(
            r#"
            [source]
            kind = "sqlite"
            items = "Catalog.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.kind, SourceKind::Sqlite);
        assert_eq!(config.source.items, "Catalog.csv");
        assert_eq!(config.source.persons, "Persons.csv");
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: LoaderConfig = toml::from_str(
            r#"
            [source]
            kind = "csv"
            data_dir = "from-file"
            "#,
        )
        .unwrap();

        config
            .apply_overrides(env(&[
                ("SALESGRAPH_SOURCE", "sqlite"),
                ("SALESGRAPH_DATA_DIR", "from-env"),
                ("SALESGRAPH_DB_PATH", "/tmp/sales.db"),
            ]))
            .unwrap();

        assert_eq!(config.source.kind, SourceKind::Sqlite);
        assert_eq!(config.source.data_dir, PathBuf::from("from-env"));
        assert_eq!(config.database.path, PathBuf::from("/tmp/sales.db"));
    }

    #[test]
    fn test_bad_env_source_is_error() {
        let mut config = LoaderConfig::default();
        assert!(config
            .apply_overrides(env(&[("SALESGRAPH_SOURCE", "ftp")]))
            .is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = LoaderConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = LoaderConfig::default();
        config.source.data_dir = PathBuf::new();
        assert!(config.validate().is_err());

        // An empty data dir does not matter when reading from SQLite
        config.source.kind = SourceKind::Sqlite;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_csv_source_from_settings() {
        let mut settings = SourceSettings {
            data_dir: PathBuf::from("/srv/data"),
            ..Default::default()
        };
        settings.stores = String::new();

        let source = settings.csv_source();
        assert_eq!(
            source.path(RecordKind::Person),
            Some(Path::new("/srv/data/Persons.csv"))
        );
        assert!(source.path(RecordKind::Store).is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salesgraph.toml");
        std::fs::write(&path, "[database]\nmax_connections = 2\n").unwrap();

        let config = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(config.database.max_connections, 2);

        std::fs::write(&path, "[database]\nmax_connections = \"many\"\n").unwrap();
        assert!(matches!(
            LoaderConfig::from_file(&path),
            Err(DbError::Config(_))
        ));
    }
}
