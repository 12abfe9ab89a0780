//! Configuration loading and management
//!
//! Defaults, then an optional YAML file (path in `BIZTIME_CONFIG`), then
//! environment overrides:
//!
//! | Variable          | Field                      |
//! |-------------------|----------------------------|
//! | `BIZTIME_BIND`    | `bind`                     |
//! | `BIZTIME_BACKEND` | `database.backend`         |
//! | `DATABASE_URL`    | `database.url`             |

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_PATH_VAR: &str = "BIZTIME_CONFIG";
pub const BIND_VAR: &str = "BIZTIME_BIND";
pub const BACKEND_VAR: &str = "BIZTIME_BACKEND";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Which store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    InMemory,
    Postgres,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(Backend::InMemory),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            other => Err(anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

/// Store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,

    /// Connection URL, required for `postgres`
    pub url: Option<String>,

    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::InMemory,
            url: None,
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// The connection URL, or an error naming the missing setting
    pub fn url(&self) -> Result<&str> {
        self.url.as_deref().ok_or_else(|| {
            anyhow!(
                "database.url (or {}) is required for the {:?} backend",
                DATABASE_URL_VAR,
                self.backend
            )
        })
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// `tracing-subscriber` filter used when `RUST_LOG` is unset
    pub log_filter: String,

    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            log_filter: "biztime=info,tower_http=info".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(bind) = lookup(BIND_VAR) {
            self.bind = bind;
        }
        if let Some(backend) = lookup(BACKEND_VAR) {
            self.database.backend = backend.parse()?;
        }
        if let Some(url) = lookup(DATABASE_URL_VAR) {
            self.database.url = Some(url);
        }
        Ok(self)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.database.backend == Backend::Postgres {
            self.database.url()?;
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }

    /// Defaults, then `BIZTIME_CONFIG`, then environment overrides
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) => Self::default(),
        };
        let config = config.apply_env()?;
        config.validate()?;
        Ok(config)
    }
}
