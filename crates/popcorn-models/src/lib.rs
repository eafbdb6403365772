pub mod movie;
pub mod query;
pub mod rating;
pub mod watchlist;

pub use movie::{MovieDetail, SearchResult};
pub use query::QueryState;
pub use rating::{RatingError, RatingInput, UserRating, DEFAULT_MAX_RATING};
pub use watchlist::{WatchedEntry, WatchedSummary};
