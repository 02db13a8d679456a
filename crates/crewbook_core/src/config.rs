//! Explicit application configuration.
//!
//! # Responsibility
//! - Describe which worker backend to open and where it lives.
//! - Parse the optional `crewbook.toml` file.
//!
//! # Invariants
//! - Configuration is passed down explicitly; core code never reads
//!   environment variables for storage settings.
//!
//! ```toml
//! log_level = "info"
//! log_dir = "/var/log/crewbook"
//!
//! [store]
//! backend = "json"
//! path = "colaboradores_db.json"
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_SQLITE_FILE: &str = "crewbook.sqlite3";
pub const DEFAULT_JSON_FILE: &str = "colaboradores_db.json";

/// Storage engine behind the worker service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Relational store: one base table plus one table per variant.
    Sqlite,
    /// Whole-collection JSON document keyed by `dni`.
    Json,
    /// Process-local map; nothing survives exit.
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
            Self::Memory => "memory",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "json" => Some(Self::Json),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    /// File name used when no explicit path is configured.
    pub fn default_path(self) -> PathBuf {
        match self {
            Self::Sqlite => PathBuf::from(DEFAULT_SQLITE_FILE),
            Self::Json => PathBuf::from(DEFAULT_JSON_FILE),
            Self::Memory => PathBuf::new(),
        }
    }
}

/// Storage selection handed to the repository factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database or document file. Ignored for `memory`.
    #[serde(default)]
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(backend: StoreBackend, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    /// Fills an empty path with the backend default file name.
    pub fn with_default_path(mut self) -> Self {
        if self.path.as_os_str().is_empty() {
            self.path = self.backend.default_path();
        }
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(StoreBackend::Sqlite, DEFAULT_SQLITE_FILE)
    }
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.store = config.store.with_default_path();
        Ok(config)
    }

    /// Reads and parses a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, StoreBackend, DEFAULT_JSON_FILE};
    use std::path::PathBuf;

    #[test]
    fn empty_file_uses_sqlite_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.path, PathBuf::from("crewbook.sqlite3"));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn json_backend_without_path_gets_default_document_name() {
        let config = AppConfig::from_toml_str(
            r#"
            log_level = "debug"

            [store]
            backend = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Json);
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_JSON_FILE));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[store]\nbackend = \"mysql\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn backend_parse_is_case_insensitive() {
        assert_eq!(StoreBackend::parse(" JSON "), Some(StoreBackend::Json));
        assert_eq!(StoreBackend::parse("postgres"), None);
    }
}
