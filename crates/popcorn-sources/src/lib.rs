pub mod traits;
pub mod factory;
pub mod omdb;
pub mod error;

pub use traits::MovieCatalog;
pub use factory::create_catalog;
pub use error::SourceError;
pub use omdb::OmdbClient;
