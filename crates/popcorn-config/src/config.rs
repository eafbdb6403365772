use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use crate::credentials::CredentialStore;

/// Environment variable that overrides the stored OMDb API key.
pub const API_KEY_ENV: &str = "POPCORN_OMDB_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OMDb API key is not configured (set POPCORN_OMDB_API_KEY or run `popcorn config omdb`)")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) never reach the catalog.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Title shown when no movie detail is open.
    #[serde(default = "default_title")]
    pub default_title: String,
}

fn default_base_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_min_query_len() -> usize {
    3
}

fn default_storage_key() -> String {
    "watched".to_string()
}

fn default_max_rating() -> u8 {
    popcorn_models::DEFAULT_MAX_RATING
}

fn default_title() -> String {
    "usePopcorn".to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_rating: default_max_rating(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if there is one, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.omdb.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("omdb.base_url cannot be empty".to_string()));
        }
        if !self.omdb.base_url.starts_with("http://") && !self.omdb.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "omdb.base_url must be an http(s) URL, got {}",
                self.omdb.base_url
            )));
        }
        if self.search.min_query_len == 0 {
            return Err(ConfigError::Invalid("search.min_query_len must be at least 1".to_string()));
        }
        if !is_valid_storage_key(&self.watchlist.storage_key) {
            return Err(ConfigError::Invalid(format!(
                "watchlist.storage_key must be non-empty and use only letters, digits, '_' or '-', got {:?}",
                self.watchlist.storage_key
            )));
        }
        if self.watchlist.max_rating == 0 {
            return Err(ConfigError::Invalid("watchlist.max_rating must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Storage keys double as file names, so they are limited to `[A-Za-z0-9_-]`.
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Pick the API key: the environment wins over the credentials file.
pub fn resolve_api_key(env_value: Option<String>, credentials: &CredentialStore) -> Result<String, ConfigError> {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| credentials.get_omdb_api_key().cloned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
