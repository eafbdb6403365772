pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ConfigError, DisplayConfig, OmdbConfig, SearchConfig, WatchlistConfig, is_valid_storage_key, resolve_api_key, API_KEY_ENV};
pub use credentials::CredentialStore;
pub use paths::{PathManager, base_path_override};
