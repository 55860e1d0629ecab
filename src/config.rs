//! Configuration for the `options-cli` binary
//!
//! Read from `$ASYNC_OPTIONS_CONFIG`, or `config.toml` in the platform
//! config directory. A missing file means defaults. Environment variables
//! (also picked up from a `.env` file) override values from the file:
//!
//! | key        | variable                  |
//! |------------|---------------------------|
//! | `backend`  | `ASYNC_OPTIONS_BACKEND`   |
//! | `database` | `ASYNC_OPTIONS_DATABASE`  |
//! | `log_file` | `ASYNC_OPTIONS_LOG_FILE`  |

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::store::{MemoryStore, OptionStore, SqliteStore};

const APP_NAME: &str = "async-options";

pub const CONFIG_ENV: &str = "ASYNC_OPTIONS_CONFIG";
pub const BACKEND_ENV: &str = "ASYNC_OPTIONS_BACKEND";
pub const DATABASE_ENV: &str = "ASYNC_OPTIONS_DATABASE";
pub const LOG_FILE_ENV: &str = "ASYNC_OPTIONS_LOG_FILE";

/// Which [`OptionStore`] to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    /// Lives as long as the process. Meant for library use and tests; a
    /// one-shot `options-cli` run starts from and leaves behind nothing.
    Memory,
}

impl Backend {
    /// Whether options written through this backend outlive the process
    pub fn is_persistent(self) -> bool {
        match self {
            Backend::Sqlite => true,
            Backend::Memory => false,
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => Ok(Backend::Memory),
            other => anyhow::bail!("Unknown backend '{}', expected 'sqlite' or 'memory'", other),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// SQLite database file; defaults to `options.db` in the config directory
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Write logs here instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Platform directory holding the config file and default database
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_NAME)
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_NAME))
        };
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::config_dir()?.join("config.toml")),
        }
    }

    /// Load `.env`, the config file and environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse `path`, falling back to defaults if it doesn't exist
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file {:?} doesn't exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    /// Override file values with whatever `lookup` finds for the `ASYNC_OPTIONS_*` keys
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(backend) = lookup(BACKEND_ENV) {
            self.backend = backend
                .parse()
                .with_context(|| format!("Invalid {}", BACKEND_ENV))?;
        }
        if let Some(database) = lookup(DATABASE_ENV) {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(log_file) = lookup(LOG_FILE_ENV) {
            self.log_file = Some(PathBuf::from(log_file));
        }
        Ok(())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("options.db")),
        }
    }

    /// Open the configured store, running migrations for SQLite
    pub async fn open_store(&self) -> Result<Arc<dyn OptionStore>> {
        match self.backend {
            Backend::Memory => {
                info!("Using in-memory option store");
                Ok(Arc::new(MemoryStore::new()))
            }
            Backend::Sqlite => {
                let path = self.database_path()?;
                info!("Using SQLite option store at {:?}", path);
                Ok(Arc::new(SqliteStore::open(&path).await?))
            }
        }
    }
}
