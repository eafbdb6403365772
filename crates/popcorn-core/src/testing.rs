//! In-memory catalog for controller tests. Replies are scripted per query or
//! id, and any of them can be held back behind a gate to force a slow response.

use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResult};
use popcorn_sources::{MovieCatalog, SourceError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use crate::request::lock;

#[derive(Clone)]
pub enum Reply {
    Results(Vec<SearchResult>),
    Detail(MovieDetail),
    NotFound(&'static str),
    Status(u16),
}

impl Reply {
    fn into_error(self) -> SourceError {
        match self {
            Reply::NotFound(msg) => SourceError::NotFound(msg.to_string()),
            Reply::Status(code) => SourceError::Status(code),
            Reply::Results(_) | Reply::Detail(_) => SourceError::Decode("wrong reply kind".to_string()),
        }
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    replies: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, key: &str, reply: Reply) -> Self {
        lock(&self.replies).insert(key.to_string(), reply);
        self
    }

    /// Hold the reply for `key` until the returned gate is notified.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.gates).insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    async fn respond(&self, key: &str) -> Reply {
        lock(&self.calls).push(key.to_string());
        let gate = lock(&self.gates).get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        lock(&self.replies)
            .get(key)
            .cloned()
            .unwrap_or(Reply::NotFound("Movie not found"))
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError> {
        match self.respond(query).await {
            Reply::Results(results) => Ok(results),
            other => Err(other.into_error()),
        }
    }

    async fn movie_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        match self.respond(imdb_id).await {
            Reply::Detail(detail) => Ok(detail),
            other => Err(other.into_error()),
        }
    }
}

pub fn result(imdb_id: &str, title: &str, year: &str) -> SearchResult {
    SearchResult {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: year.to_string(),
        poster: "url".to_string(),
    }
}

pub fn detail(imdb_id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "1989".to_string(),
        poster: "url".to_string(),
        runtime: "126 min".to_string(),
        imdb_rating: "7.5".to_string(),
        ..Default::default()
    }
}

/// Give spawned tasks a chance to run on the current-thread test runtime.
pub async fn let_tasks_run() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
