use serde::{Deserialize, Serialize};
use crate::movie::SearchResult;

/// Observable state of a search: the last query issued and what came back for it.
///
/// `error` is empty when there is nothing to report. In practice a non-empty
/// error and a non-empty result set never coexist.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: String,
}

impl QueryState {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Reset to the idle state for `query`: nothing loading, nothing found, no error.
    pub fn idle(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}
