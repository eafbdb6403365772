pub mod request;
pub mod search;
pub mod detail;
pub mod title;
pub mod storage;
pub mod watchlist;
pub mod keys;

#[cfg(test)]
pub(crate) mod testing;

pub use request::{RequestError, RequestHandle, Settled};
pub use search::SearchController;
pub use detail::{DetailController, DetailState};
pub use title::{RecordingTitleSink, TitleSink};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use watchlist::{WatchlistError, WatchlistStore};
pub use keys::{dispatch, Key, KeyAction, KeyContext};
