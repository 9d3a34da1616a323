//! Configuration management for the Heptapal store
//!
//! This module handles loading, parsing, and validation of configuration files.
//! The configuration is read once and handed to the connection manager and the
//! tool facade; nothing re-reads it afterwards.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_GENERATED, DEFAULT_CHARSET, DEFAULT_MAX_OVERFLOW, DEFAULT_MYSQL_PORT,
    DEFAULT_POOL_RECYCLE_SECS, DEFAULT_POOL_SIZE, DEFAULT_POOL_TIMEOUT_SECS, SQLITE_MEMORY,
};
use crate::entities::Priority;
use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub todos: TodoConfig,
    pub logging: LoggingConfig,
}

/// Storage engine driver
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Mysql,
    Sqlite,
}

/// Database configuration
///
/// For MySQL, `host`, `port`, `user` and `database` are required; for SQLite
/// only `database` is, holding a file path or `:memory:`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: Driver,
    pub host: String,
    /// 0 means "not configured"
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    /// Connections kept open in the pool
    pub pool_size: u32,
    /// Extra transient connections allowed beyond `pool_size`
    pub max_overflow: u32,
    /// Seconds to wait for a free connection before failing
    pub pool_timeout_secs: u64,
    /// Seconds after which a pooled connection is replaced
    pub pool_recycle_secs: u64,
}

/// Todo defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TodoConfig {
    /// Priority used when a todo is added without one
    pub default_priority: Priority,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: off, error, warn, info, debug, trace
    pub level: String,
    /// Optional file that receives a copy of every log line
    pub file: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: Driver::Mysql,
            host: String::new(),
            port: 0,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            charset: DEFAULT_CHARSET.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            max_overflow: DEFAULT_MAX_OVERFLOW,
            pool_timeout_secs: DEFAULT_POOL_TIMEOUT_SECS,
            pool_recycle_secs: DEFAULT_POOL_RECYCLE_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl DatabaseConfig {
    /// MySQL configuration with default charset and pool settings
    pub fn mysql(host: &str, port: u16, user: &str, password: &str, database: &str) -> Self {
        Self {
            driver: Driver::Mysql,
            host: host.to_string(),
            port,
            user: user.to_string(),
            password: password.to_string(),
            database: database.to_string(),
            ..Self::default()
        }
    }

    /// SQLite configuration backed by a database file
    pub fn sqlite<P: AsRef<Path>>(path: P) -> Self {
        Self {
            driver: Driver::Sqlite,
            database: path.as_ref().display().to_string(),
            ..Self::default()
        }
    }

    /// SQLite configuration backed by a private in-memory database
    pub fn sqlite_memory() -> Self {
        Self {
            driver: Driver::Sqlite,
            database: SQLITE_MEMORY.to_string(),
            ..Self::default()
        }
    }

    pub fn is_memory(&self) -> bool {
        self.driver == Driver::Sqlite && self.database == SQLITE_MEMORY
    }

    /// Upper bound on simultaneously open connections
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow)
    }

    /// Validate required fields and pool bounds
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            anyhow::bail!("database.database is required");
        }

        if self.driver == Driver::Mysql {
            if self.host.trim().is_empty() {
                anyhow::bail!("database.host is required");
            }
            if self.port == 0 {
                anyhow::bail!("database.port is required");
            }
            if self.user.trim().is_empty() {
                anyhow::bail!("database.user is required");
            }
            if self.charset.trim().is_empty() {
                anyhow::bail!("database.charset cannot be empty");
            }
        }

        if self.pool_size == 0 {
            anyhow::bail!("database.pool_size must be at least 1");
        }
        if self.pool_timeout_secs == 0 {
            anyhow::bail!("database.pool_timeout_secs must be at least 1");
        }

        Ok(())
    }

    /// Build the connection URL for the configured driver.
    ///
    /// Credentials are percent-encoded.
    pub fn connection_url(&self) -> Result<String> {
        match self.driver {
            Driver::Mysql => {
                let mut url = Url::parse(&format!("mysql://{}", self.host))
                    .with_context(|| format!("Invalid database host: {}", self.host))?;
                url.set_username(&self.user)
                    .map_err(|_| anyhow::anyhow!("Invalid database user: {}", self.user))?;
                let password = (!self.password.is_empty()).then_some(self.password.as_str());
                url.set_password(password)
                    .map_err(|_| anyhow::anyhow!("Invalid database password"))?;
                url.set_port(Some(self.port))
                    .map_err(|_| anyhow::anyhow!("Invalid database port: {}", self.port))?;
                url.set_path(&self.database);
                url.query_pairs_mut().append_pair("charset", &self.charset);
                Ok(url.to_string())
            }
            Driver::Sqlite if self.is_memory() => Ok("sqlite::memory:".to_string()),
            Driver::Sqlite => Ok(format!("sqlite://{}?mode=rwc", self.database)),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level
            .parse::<LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid logging level '{}'", self.level))
    }
}

impl Config {
    /// Configuration written by [`Config::generate_default_config`]
    pub fn template() -> Self {
        Self {
            database: DatabaseConfig::mysql("localhost", DEFAULT_MYSQL_PORT, "root", "", "heptapal"),
            ..Self::default()
        }
    }

    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(CONFIG_DIR_NAME).join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;
        self.logging.level_filter()?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::template();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# Heptapal Store Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(crate::constants::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(CONFIG_DIR_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
