//! Registry configuration loading from file and environment variables.

use serde::Deserialize;
use thiserror::Error;

/// Top-level registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Search settings.
    #[serde(default)]
    pub search: SearchSettings,

    /// Version rendering settings.
    #[serde(default)]
    pub version: VersionSettings,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// How long a connection waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Search configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    /// Namespaces whose modules count as trusted in search results.
    #[serde(default)]
    pub trusted_namespaces: Vec<String>,
}

/// Version rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionSettings {
    /// Template used to render example version constraints for module
    /// usage snippets. Supports placeholders such as `{major}`,
    /// `{minor}`, `{patch}` and their `_plus_one` / `_minus_one` forms.
    #[serde(default = "default_example_template")]
    pub example_template: String,
}

fn default_db_path() -> String {
    "modreg.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_example_template() -> String {
    "{major}.{minor}.{patch}".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for VersionSettings {
    fn default() -> Self {
        Self {
            example_template: default_example_template(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `MODREG_DB_PATH` overrides `database.path`
/// - `MODREG_TRUSTED_NAMESPACES` overrides `search.trusted_namespaces`
///   (comma-separated)
/// - `MODREG_VERSION_TEMPLATE` overrides `version.example_template`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(db_path) = std::env::var("MODREG_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(namespaces) = std::env::var("MODREG_TRUSTED_NAMESPACES") {
        config.search.trusted_namespaces = namespaces
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Ok(template) = std::env::var("MODREG_VERSION_TEMPLATE") {
        config.version.example_template = template;
    }

    Ok(config)
}
