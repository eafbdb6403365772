use popcorn_models::{UserRating, WatchedEntry, WatchedSummary};
use thiserror::Error;
use tracing::{debug, info, warn};
use crate::storage::{Storage, StorageError};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("{0} is already in the watched list")]
    AlreadyWatched(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize watched list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The user's watched list, backed by one storage slot.
///
/// The whole collection is rewritten to the slot after every mutation, before
/// the mutating call returns.
pub struct WatchlistStore<S: Storage> {
    storage: S,
    key: String,
    entries: Vec<WatchedEntry>,
}

impl<S: Storage> WatchlistStore<S> {
    /// Rehydrate from `key`. A missing, unreadable or malformed slot starts an
    /// empty list; entries that fail to decode are skipped. Neither is
    /// reported to the caller.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(values) => {
                    let entries = parse_entries(&key, values);
                    info!("Loaded {} watched movies from {}", entries.len(), key);
                    entries
                }
                Err(e) => {
                    warn!("Watched list in {} is malformed ({}); starting empty", key, e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No watched list stored under {}", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read watched list from {}: {}; starting empty", key, e);
                Vec::new()
            }
        };

        Self { storage, key, entries }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.imdb_id == imdb_id)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    /// The rating the user gave when adding `imdb_id`, if any.
    pub fn user_rating(&self, imdb_id: &str) -> Option<UserRating> {
        self.get(imdb_id).and_then(|e| e.user_rating)
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    /// Append `entry`. An id can only be on the list once.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), WatchlistError> {
        if self.contains(&entry.imdb_id) {
            return Err(WatchlistError::AlreadyWatched(entry.imdb_id));
        }

        debug!("Adding {} to watched list", entry.imdb_id);
        self.entries.push(entry);
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Drop every entry for `imdb_id`, keeping the others in order.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, imdb_id: &str) -> Result<bool, WatchlistError> {
        let before = self.entries.clone();
        self.entries.retain(|e| e.imdb_id != imdb_id);
        if self.entries.len() == before.len() {
            return Ok(false);
        }

        debug!("Removed {} from watched list", imdb_id);
        if let Err(e) = self.persist() {
            self.entries = before;
            return Err(e);
        }
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), WatchlistError> {
        let before = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist() {
            self.entries = before;
            return Err(e);
        }
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), WatchlistError> {
        let serialized = serde_json::to_string(&self.entries)?;
        self.storage.set(&self.key, &serialized)?;
        Ok(())
    }
}

/// Decode each element on its own so one bad entry costs only itself.
fn parse_entries(key: &str, values: Vec<serde_json::Value>) -> Vec<WatchedEntry> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<WatchedEntry>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry {} in {}: {}", i, key, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use popcorn_models::RatingInput;

    fn create_entry(imdb_id: &str, title: &str) -> WatchedEntry {
        WatchedEntry {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "2020".to_string(),
            poster: "url".to_string(),
            imdb_rating: Some(7.5),
            runtime: Some(120),
            user_rating: RatingInput::default().rate(8).ok(),
            added_at: None,
        }
    }

    fn persisted(store: &WatchlistStore<MemoryStorage>) -> Vec<WatchedEntry> {
        let raw = store.storage().get("watched").unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Storage whose writes always fail.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let store = WatchlistStore::load(MemoryStorage::new(), "watched");
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_slot_is_empty() {
        let storage = MemoryStorage::new().with_slot("watched", "{not json");
        let store = WatchlistStore::load(storage, "watched");
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_keeps_good_entries_next_to_bad_ones() {
        let raw = r#"[
            {"imdbID":"tt0096895","title":"Batman","year":"1989","poster":"url","imdbRating":7.5,"runtime":126,"userRating":8},
            {"imdbID":"tt0000000","imdbRating":null,"runtime":null,"userRating":5},
            {"title":"no id"}
        ]"#;
        let storage = MemoryStorage::new().with_slot("watched", raw);
        let mut store = WatchlistStore::load(storage, "watched");
        assert_eq!(store.len(), 2);

        store.add(create_entry("tt1", "New")).unwrap();

        let ids: Vec<String> = persisted(&store).into_iter().map(|e| e.imdb_id).collect();
        assert_eq!(ids, vec!["tt0096895", "tt0000000", "tt1"]);
    }

    #[test]
    fn test_add_persists_immediately() {
        let mut store = WatchlistStore::load(MemoryStorage::new(), "watched");
        store.add(create_entry("tt001", "Movie 1")).unwrap();

        let before = persisted(&store);
        store.add(create_entry("tt002", "Movie 2")).unwrap();
        let after = persisted(&store);

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.iter().filter(|e| e.imdb_id == "tt002").count(), 1);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = WatchlistStore::load(MemoryStorage::new(), "watched");
        store.add(create_entry("tt001", "Movie 1")).unwrap();

        let err = store.add(create_entry("tt001", "Movie 1 again")).unwrap_err();

        assert!(matches!(err, WatchlistError::AlreadyWatched(ref id) if id == "tt001"));
        assert_eq!(store.len(), 1);
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_remove_keeps_others_in_order() {
        let mut store = WatchlistStore::load(MemoryStorage::new(), "watched");
        for (id, title) in [("tt001", "A"), ("tt002", "B"), ("tt003", "C"), ("tt004", "D")] {
            store.add(create_entry(id, title)).unwrap();
        }

        assert!(store.remove("tt002").unwrap());

        let ids: Vec<String> = persisted(&store).into_iter().map(|e| e.imdb_id).collect();
        assert_eq!(ids, vec!["tt001", "tt003", "tt004"]);
        assert!(!store.contains("tt002"));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = WatchlistStore::load(MemoryStorage::new(), "watched");
        store.add(create_entry("tt001", "A")).unwrap();

        assert!(!store.remove("tt999").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = WatchlistStore::load(MemoryStorage::new(), "watched");
        store.add(create_entry("tt001", "A")).unwrap();
        store.add(create_entry("tt002", "B")).unwrap();
        let original = store.entries().to_vec();

        let reloaded = WatchlistStore::load(store.storage().clone(), "watched");
        assert_eq!(reloaded.entries(), original.as_slice());
    }

    #[test]
    fn test_reload_from_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = WatchlistStore::load(FileStorage::new(dir.path()), "watched");
            store.add(create_entry("tt0096895", "Batman")).unwrap();
        }

        let store = WatchlistStore::load(FileStorage::new(dir.path()), "watched");
        assert_eq!(store.len(), 1);
        assert_eq!(store.user_rating("tt0096895").map(|r| r.value()), Some(8));
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut store = WatchlistStore::load(BrokenStorage, "watched");

        assert!(matches!(
            store.add(create_entry("tt001", "A")),
            Err(WatchlistError::Storage(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_and_summary() {
        let mut store = WatchlistStore::load(MemoryStorage::new(), "watched");
        store.add(create_entry("tt001", "A")).unwrap();
        store.add(create_entry("tt002", "B")).unwrap();

        let summary = store.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_runtime, Some(120.0));

        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(persisted(&store).is_empty());
    }
}
