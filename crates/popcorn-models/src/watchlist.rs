use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::movie::MovieDetail;
use crate::rating::UserRating;

/// A movie the user marked as watched. The persisted key names match the
/// format the browser client wrote, so existing watch lists load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(rename = "userRating", default, deserialize_with = "deserialize_user_rating")]
    pub user_rating: Option<UserRating>,
    #[serde(rename = "addedAt", default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchedEntry {
    pub fn from_detail(detail: &MovieDetail, user_rating: Option<UserRating>) -> Self {
        Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating: detail.critic_rating(),
            runtime: detail.runtime_minutes(),
            user_rating,
            added_at: Some(Utc::now()),
        }
    }
}

// Older lists store an unrated movie as `""` rather than null.
fn deserialize_user_rating<'de, D>(deserializer: D) -> Result<Option<UserRating>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u8),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(0)) => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(UserRating::from_raw(n))),
        Some(Raw::Text(s)) => match s.trim().parse::<u8>() {
            Ok(n) if n > 0 => Ok(Some(UserRating::from_raw(n))),
            _ => Ok(None),
        },
    }
}

/// Aggregate figures over a watch list. Each average only counts entries
/// that carry the value, and is `None` when no entry does.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: Option<f64>,
    pub avg_user_rating: Option<f64>,
    pub avg_runtime: Option<f64>,
}

impl WatchedSummary {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(
                entries
                    .iter()
                    .filter_map(|e| e.user_rating.map(|r| f64::from(r.value()))),
            ),
            avg_runtime: average(entries.iter().filter_map(|e| e.runtime.map(f64::from))),
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
