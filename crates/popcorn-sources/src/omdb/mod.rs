pub mod client;
pub mod api;

pub use client::{OmdbClient, create_omdb_client};
