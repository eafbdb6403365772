//! Builds the catalog client from configuration.
//!
//! The API key is injected here, once, so nothing downstream holds a
//! hardcoded credential and tests can point the client anywhere.

use popcorn_config::{resolve_api_key, Config, ConfigError, CredentialStore, API_KEY_ENV};
use std::time::Duration;
use tracing::debug;
use crate::omdb::OmdbClient;
use crate::traits::MovieCatalog;

pub fn create_catalog(config: &Config, credentials: &CredentialStore) -> Result<OmdbClient, ConfigError> {
    config.validate()?;
    let api_key = resolve_api_key(std::env::var(API_KEY_ENV).ok(), credentials)?;

    let client = OmdbClient::new(api_key)
        .with_base_url(config.omdb.base_url.clone())
        .with_timeout(Duration::from_secs(config.omdb.timeout_seconds));
    debug!("Using {} catalog at {}", client.source_name(), client.base_url());
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_create_catalog_uses_configured_base_url() {
        let mut config = Config::default();
        config.omdb.base_url = "http://localhost:9999".to_string();
        let mut credentials = CredentialStore::new(PathBuf::from("/tmp/unused"));
        credentials.set_omdb_api_key("k".to_string());

        let catalog = create_catalog(&config, &credentials).unwrap();
        assert_eq!(catalog.base_url(), "http://localhost:9999");
        assert_eq!(catalog.source_name(), "omdb");
    }

    #[test]
    fn test_create_catalog_rejects_invalid_config() {
        let mut config = Config::default();
        config.omdb.base_url = String::new();
        let mut credentials = CredentialStore::new(PathBuf::from("/tmp/unused"));
        credentials.set_omdb_api_key("k".to_string());

        assert!(matches!(create_catalog(&config, &credentials), Err(ConfigError::Invalid(_))));
    }
}
