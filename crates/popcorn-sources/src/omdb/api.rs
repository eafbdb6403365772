use popcorn_models::{MovieDetail, SearchResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::SourceError;

const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        SearchResult {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster: item.poster,
        }
    }
}

fn is_false(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

fn not_found(error: Option<String>) -> SourceError {
    let message = error
        .map(|e| e.trim().trim_end_matches('!').to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
    SourceError::NotFound(message)
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    params: &[(&str, &str)],
) -> Result<T, SourceError> {
    let url = format!("{}/", base_url.trim_end_matches('/'));

    let response = client.get(&url).query(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        warn!("OMDb request failed with status {}", status);
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Search the catalog by title.
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, SourceError> {
    debug!("OMDb search: {:?}", query);

    let body: OmdbSearchResponse =
        get_json(client, base_url, &[("apikey", api_key), ("s", query)]).await?;

    if is_false(&body.response) || body.search.is_empty() {
        return Err(not_found(body.error));
    }

    let results: Vec<SearchResult> = body.search.into_iter().map(SearchResult::from).collect();
    debug!("OMDb search {:?} returned {} results", query, results.len());
    Ok(results)
}

/// Fetch the full record for one title.
pub async fn get_movie_detail(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetail, SourceError> {
    debug!("OMDb detail: {}", imdb_id);

    let body: OmdbDetailResponse =
        get_json(client, base_url, &[("apikey", api_key), ("i", imdb_id)]).await?;

    if is_false(&body.response) {
        return Err(not_found(body.error));
    }

    Ok(MovieDetail {
        // Some responses omit the id; the one we asked for is authoritative.
        imdb_id: if body.imdb_id.is_empty() { imdb_id.to_string() } else { body.imdb_id },
        title: body.title,
        year: body.year,
        poster: body.poster,
        plot: body.plot,
        genre: body.genre,
        director: body.director,
        actors: body.actors,
        runtime: body.runtime,
        released: body.released,
        imdb_rating: body.imdb_rating,
    })
}
