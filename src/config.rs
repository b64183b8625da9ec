//! Application configuration.
//!
//! Loaded from a TOML file (`SIXDEGREES_CONFIG`, default `sixdegrees.toml`),
//! then overridden by `SIXDEGREES_STORE_URL`, `SIXDEGREES_STORE_KEY` and
//! `SIXDEGREES_PORT`. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "SIXDEGREES_CONFIG";
pub const STORE_URL_VAR: &str = "SIXDEGREES_STORE_URL";
pub const STORE_KEY_VAR: &str = "SIXDEGREES_STORE_KEY";
pub const PORT_VAR: &str = "SIXDEGREES_PORT";

const DEFAULT_CONFIG_FILE: &str = "sixdegrees.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },
}

/// Connection settings for the hosted results store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store, e.g. `https://project.supabase.co`.
    pub endpoint: Option<String>,
    /// Sent both as `apikey` and as the bearer token.
    pub credential: String,
    /// Overrides the HTTP client's default timeout.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub similarity_threshold: f32,
    pub max_steps: usize,
    pub min_puzzle_steps: usize,
    /// One word per line; built-in list when unset.
    pub words_path: Option<PathBuf>,
    /// `word f1 f2 ... fn` per line; hash embeddings when unset.
    pub embeddings_path: Option<PathBuf>,
    pub embedding_dim: usize,
    pub pair_attempts: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.49,
            max_steps: 6,
            min_puzzle_steps: 2,
            words_path: None,
            embeddings_path: None,
            embedding_dim: 16,
            pair_attempts: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Reads the config file named by the environment and applies overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            log::info!("CONFIG: {:?} not found, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| {
            log::error!("CONFIG: Failed to parse TOML file {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(STORE_URL_VAR) {
            self.store.endpoint = Some(url);
        }
        if let Some(key) = lookup(STORE_KEY_VAR) {
            self.store.credential = key;
        }
        if let Some(port) = lookup(PORT_VAR) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Env {
                name: PORT_VAR,
                value: port.clone(),
            })?;
        }
        Ok(())
    }
}
