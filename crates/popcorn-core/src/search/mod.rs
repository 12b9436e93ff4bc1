//! Query-driven movie search with latest-query-wins semantics.
//!
//! Every call to [`SearchController::set_query`] starts a new generation.
//! The lookup for the previous generation is cancelled, and a result that
//! still arrives for it is dropped: only the generation that is current when
//! a result lands may write an outcome.

use popcorn_catalog::{CatalogError, MovieCatalog};
use popcorn_models::{SearchFailure, SearchOutcome, SearchResult, SearchState};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::lookup::InFlight;

/// Queries shorter than this (after trimming) do not hit the network.
pub const MIN_QUERY_LEN: usize = 3;

/// Number of characters that count towards [`MIN_QUERY_LEN`].
pub fn effective_len(query: &str) -> usize {
    query.trim().chars().count()
}

pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    state: Arc<watch::Sender<SearchState>>,
    in_flight: Option<InFlight>,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            state: Arc::new(state),
            in_flight: None,
        }
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.state.borrow().outcome.clone()
    }

    /// Whether a spawned lookup has not finished yet.
    pub fn is_lookup_pending(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|lookup| !lookup.is_finished())
    }

    /// Replace the query. Must be called from within a Tokio runtime.
    ///
    /// Returns the generation assigned to this query.
    pub fn set_query(&mut self, query: &str) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let needs_lookup = effective_len(query) >= MIN_QUERY_LEN;
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.query = query.to_string();
            state.outcome = if needs_lookup {
                SearchOutcome::Loading
            } else {
                SearchOutcome::Success(Vec::new())
            };
        });

        if !needs_lookup {
            debug!(generation, "Query {:?} too short, skipping lookup", query);
            return generation;
        }

        let catalog = self.catalog.clone();
        let term = query.trim().to_string();
        debug!(generation, "Searching {} for {:?}", catalog.catalog_name(), term);

        let state = self.state.clone();
        self.in_flight = Some(InFlight::spawn(
            async move { catalog.search(&term).await },
            move |result| publish_result(&state, generation, result),
        ));

        generation
    }

    /// Wait until the current generation reaches Success or Failure.
    ///
    /// Returns None if the controller was dropped first.
    pub async fn settled(receiver: &mut watch::Receiver<SearchState>) -> Option<SearchState> {
        receiver
            .wait_for(|state| state.outcome.is_terminal())
            .await
            .ok()
            .map(|state| SearchState::clone(&state))
    }
}

fn classify(result: Result<Vec<SearchResult>, CatalogError>) -> SearchOutcome {
    match result {
        Ok(results) => SearchOutcome::Success(results),
        Err(e) if e.is_not_found() => SearchOutcome::Failure(SearchFailure::NotFound),
        Err(e) => SearchOutcome::Failure(SearchFailure::Transport(e.to_string())),
    }
}

fn publish_result(
    state: &watch::Sender<SearchState>,
    generation: u64,
    result: Result<Vec<SearchResult>, CatalogError>,
) {
    let outcome = classify(result);
    let failure = match &outcome {
        SearchOutcome::Failure(failure) => Some(failure.clone()),
        _ => None,
    };

    if !publish_if_current(state, generation, outcome) {
        debug!(generation, "Discarding result for superseded query");
        return;
    }

    match failure {
        Some(SearchFailure::Transport(detail)) => warn!(generation, "Movie search failed: {}", detail),
        Some(SearchFailure::NotFound) => debug!(generation, "Movie search found no match"),
        None => {}
    }
}

/// Store `outcome` only if `generation` is still the published one.
fn publish_if_current(state: &watch::Sender<SearchState>, generation: u64, outcome: SearchOutcome) -> bool {
    state.send_if_modified(|current| {
        if current.generation != generation {
            return false;
        }
        current.outcome = outcome;
        true
    })
}

#[cfg(test)]
mod tests;
