use serde::Serialize;
use std::fmt;

use crate::details::MovieDetails;
use crate::search_result::SearchResult;

/// Why a search produced no results list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SearchFailure {
    /// The request failed or the endpoint answered with a non-success status
    Transport(String),
    /// The endpoint answered normally but reported no match
    NotFound,
}

impl SearchFailure {
    /// User-facing message; the two failure kinds never share one.
    pub fn message(&self) -> &'static str {
        match self {
            SearchFailure::Transport(_) => "Something went wrong with fetching movies",
            SearchFailure::NotFound => "Movie not found",
        }
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SearchOutcome {
    #[default]
    Idle,
    Loading,
    Success(Vec<SearchResult>),
    Failure(SearchFailure),
}

impl SearchOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchOutcome::Loading)
    }

    /// Success or Failure
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchOutcome::Success(_) | SearchOutcome::Failure(_))
    }

    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::Success(results) => results,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::Failure(failure) => Some(failure.message()),
            _ => None,
        }
    }
}

/// Snapshot published by the search controller.
///
/// `generation` increases on every query change; an outcome is only ever
/// stored next to the generation of the query that produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchState {
    pub generation: u64,
    pub query: String,
    pub outcome: SearchOutcome,
}

/// State of the details panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailsState {
    #[default]
    Closed,
    Loading { imdb_id: String },
    Ready(MovieDetails),
    Unavailable { imdb_id: String, reason: String },
}

impl DetailsState {
    /// Identifier of the title the panel is showing or loading.
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            DetailsState::Closed => None,
            DetailsState::Loading { imdb_id } | DetailsState::Unavailable { imdb_id, .. } => Some(imdb_id),
            DetailsState::Ready(details) => Some(&details.imdb_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailsState::Loading { .. })
    }
}

/// Snapshot published by the details controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DetailsView {
    pub generation: u64,
    pub state: DetailsState,
}
