//! Server configuration.

use crate::store::{MemorySessionStore, SessionStore, SqliteSessionStore, StoreError};
use derive_getters::Getters;
use derive_setters::Setters;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tictactoe_rules::{MoveAgent, RandomAgent};
use tracing::{debug, info, instrument};

/// Where session state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-process map, lost on restart.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite {
        /// Path to the database file (created if missing).
        path: String,
    },
}

/// Configuration for the game server.
#[derive(Debug, Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Name of the cookie carrying the session id.
    #[serde(default = "default_cookie_name")]
    cookie_name: String,

    /// Seconds a session may sit idle before it is discarded.
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,

    /// Fixed seed for the computer opponent; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent_seed: Option<u64>,

    /// Session storage backend.
    #[serde(default)]
    store: StoreConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cookie_name() -> String {
    "tictactoe_session".to_string()
}

fn default_session_ttl_secs() -> u64 {
    60 * 60 * 24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cookie_name: default_cookie_name(),
            session_ttl_secs: default_session_ttl_secs(),
            agent_seed: None,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(host = %config.host, port = config.port, store = ?config.store, "Config loaded");
        Ok(config)
    }

    /// Loads the file at `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to encode config: {}", e)))
    }

    /// Idle lifetime of a session.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Opens the configured session store.
    #[instrument(skip(self), fields(store = ?self.store))]
    pub fn build_store(&self) -> Result<Arc<dyn SessionStore>, StoreError> {
        Ok(match &self.store {
            StoreConfig::Memory => Arc::new(MemorySessionStore::new(self.session_ttl())),
            StoreConfig::Sqlite { path } => {
                Arc::new(SqliteSessionStore::open(path.clone(), self.session_ttl())?)
            }
        })
    }

    /// Builds the computer opponent.
    #[instrument(skip(self), fields(seed = ?self.agent_seed))]
    pub fn build_agent(&self) -> Arc<dyn MoveAgent> {
        match self.agent_seed {
            Some(seed) => {
                info!(seed, "Using seeded random agent");
                Arc::new(RandomAgent::new(ChaCha8Rng::seed_from_u64(seed)))
            }
            None => Arc::new(RandomAgent::from_entropy()),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
        assert_eq!(config.cookie_name(), "tictactoe_session");
        assert_eq!(config.session_ttl(), Duration::from_secs(86_400));
        assert_eq!(*config.agent_seed(), None);
        assert_eq!(*config.store(), StoreConfig::Memory);
    }

    #[test]
    fn test_sqlite_backend_parses() {
        let config = ServerConfig::from_toml(
            r#"
port = 8080
agent_seed = 11

[store]
backend = "sqlite"
path = "sessions.db"
"#,
        )
        .unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(*config.agent_seed(), Some(11));
        assert_eq!(
            *config.store(),
            StoreConfig::Sqlite {
                path: "sessions.db".to_string()
            }
        );
    }

    #[test]
    fn test_written_config_reads_back() {
        let config = ServerConfig::default()
            .with_port(4000)
            .with_store(StoreConfig::Sqlite {
                path: "x.db".to_string(),
            });
        let text = config.to_toml().unwrap();
        let back = ServerConfig::from_toml(&text).unwrap();
        assert_eq!(*back.port(), 4000);
        assert_eq!(back.store(), config.store());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = ServerConfig::from_toml("port = \"not a number\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }
}
