use thiserror::Error;

/// Failures talking to a movie catalog. A superseded request is aborted
/// rather than failed, so there is no cancellation variant here.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The catalog answered, but reported no match.
    #[error("{0}")]
    NotFound(String),

    #[error("Failed to fetch movies (HTTP {0})")]
    Status(u16),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from catalog: {0}")]
    Decode(String),
}
