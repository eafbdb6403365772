use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResult};
use crate::error::SourceError;

/// A remote movie catalog: free-text search plus per-title details.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn source_name(&self) -> &str;

    /// Titles matching `query`. An empty match is reported as `SourceError::NotFound`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError>;

    async fn movie_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError>;
}
