use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieCatalog;
use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

/// Create the shared reqwest client used for every OMDb call.
pub fn create_omdb_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Arc::new(create_omdb_client(Duration::from_secs(15))),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Arc::new(create_omdb_client(timeout));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError> {
        api::search(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn movie_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        api::get_movie_detail(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}
