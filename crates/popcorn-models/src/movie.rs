use serde::{Deserialize, Serialize};

/// One hit from a catalog search. Lives only as long as the result set of
/// the query that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
}

/// Full record for a single title, fetched on demand when a result is selected.
///
/// Numeric-looking fields are kept as the catalog sends them (`"142 min"`,
/// `"7.5"`, `"N/A"`); use the accessor helpers to get numbers out of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub plot: String,
    pub genre: String,
    pub director: String,
    pub actors: String,
    pub runtime: String,
    pub released: String,
    pub imdb_rating: String,
}

impl MovieDetail {
    /// Runtime in minutes, taken from the first token of `runtime`.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.split_whitespace().next()?.parse().ok()
    }

    /// Critic rating as a number, `None` when the catalog has no rating ("N/A").
    pub fn critic_rating(&self) -> Option<f64> {
        self.imdb_rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
