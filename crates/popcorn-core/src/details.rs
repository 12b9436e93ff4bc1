use popcorn_catalog::{CatalogError, MovieCatalog};
use popcorn_models::{DetailsState, DetailsView, MovieDetails};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::lookup::InFlight;

/// Loads the full record for the selected title.
///
/// Follows the same generation discipline as the search controller, and a
/// failed lookup ends in `Unavailable` instead of leaving the panel loading.
pub struct DetailsController {
    catalog: Arc<dyn MovieCatalog>,
    state: Arc<watch::Sender<DetailsView>>,
    in_flight: Option<InFlight>,
}

impl DetailsController {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        let (state, _) = watch::channel(DetailsView::default());
        Self {
            catalog,
            state: Arc::new(state),
            in_flight: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailsView> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DetailsState {
        self.state.borrow().state.clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state.borrow().state.selected_id().map(str::to_string)
    }

    /// Toggle selection: selecting the open title closes the panel,
    /// anything else starts loading it.
    pub fn select(&mut self, imdb_id: &str) -> u64 {
        if self.selected_id().as_deref() == Some(imdb_id) {
            return self.close();
        }

        let generation = self.replace_state(DetailsState::Loading {
            imdb_id: imdb_id.to_string(),
        });

        let catalog = self.catalog.clone();
        let id = imdb_id.to_string();
        debug!(generation, "Loading details for {}", id);

        let state = self.state.clone();
        self.in_flight = Some(InFlight::spawn(
            async move {
                let result = catalog.details(&id).await;
                (id, result)
            },
            move |(id, result)| publish_details(&state, generation, id, result),
        ));

        generation
    }

    /// Dismiss the panel and abandon any pending lookup.
    pub fn close(&mut self) -> u64 {
        self.replace_state(DetailsState::Closed)
    }

    fn replace_state(&mut self, next: DetailsState) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let mut generation = 0;
        self.state.send_modify(|view| {
            view.generation += 1;
            generation = view.generation;
            view.state = next;
        });
        generation
    }

    /// Wait until the current selection is no longer loading.
    pub async fn settled(receiver: &mut watch::Receiver<DetailsView>) -> Option<DetailsState> {
        receiver
            .wait_for(|view| !view.state.is_loading())
            .await
            .ok()
            .map(|view| view.state.clone())
    }
}

fn publish_details(
    state: &watch::Sender<DetailsView>,
    generation: u64,
    imdb_id: String,
    result: Result<MovieDetails, CatalogError>,
) {
    let reason = result.as_ref().err().map(ToString::to_string);
    let next = match result {
        Ok(details) => DetailsState::Ready(details),
        Err(e) => DetailsState::Unavailable {
            imdb_id: imdb_id.clone(),
            reason: e.to_string(),
        },
    };

    let applied = state.send_if_modified(|view| {
        if view.generation != generation {
            return false;
        }
        view.state = next;
        true
    });

    if !applied {
        debug!(generation, "Discarding details for {} (selection changed)", imdb_id);
    } else if let Some(reason) = reason {
        warn!(generation, "Details unavailable for {}: {}", imdb_id, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use popcorn_models::SearchResult;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct GatedDetails {
        gates: Mutex<HashMap<String, oneshot::Receiver<Result<MovieDetails, CatalogError>>>>,
    }

    impl GatedDetails {
        fn gate(&self, imdb_id: &str) -> oneshot::Sender<Result<MovieDetails, CatalogError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(imdb_id.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl MovieCatalog for GatedDetails {
        fn catalog_name(&self) -> &str {
            "gated"
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, CatalogError> {
            Ok(Vec::new())
        }

        async fn details(&self, imdb_id: &str) -> Result<MovieDetails, CatalogError> {
            let gate = self.gates.lock().unwrap().remove(imdb_id);
            match gate {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(CatalogError::MissingApiKey)),
                None => Ok(details(imdb_id, "Ungated")),
            }
        }
    }

    fn details(imdb_id: &str, title: &str) -> MovieDetails {
        MovieDetails {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            poster: "N/A".to_string(),
            runtime: "136 min".to_string(),
            imdb_rating: "8.7".to_string(),
            plot: String::new(),
            released: String::new(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        }
    }

    async fn settle(controller: &DetailsController) -> DetailsState {
        let mut rx = controller.subscribe();
        tokio::time::timeout(Duration::from_secs(2), DetailsController::settled(&mut rx))
            .await
            .expect("details did not settle")
            .expect("controller dropped")
    }

    #[tokio::test]
    async fn test_select_loads_details() {
        let catalog = Arc::new(GatedDetails::default());
        let release = catalog.gate("tt0133093");
        let mut controller = DetailsController::new(catalog);

        controller.select("tt0133093");
        assert_eq!(
            controller.state(),
            DetailsState::Loading {
                imdb_id: "tt0133093".to_string()
            }
        );

        release.send(Ok(details("tt0133093", "The Matrix"))).unwrap();
        assert_eq!(settle(&controller).await, DetailsState::Ready(details("tt0133093", "The Matrix")));
    }

    #[tokio::test]
    async fn test_failed_lookup_is_unavailable() {
        let catalog = Arc::new(GatedDetails::default());
        let release = catalog.gate("tt404");
        let mut controller = DetailsController::new(catalog);

        controller.select("tt404");
        release
            .send(Err(CatalogError::NotFound("Incorrect IMDb ID.".to_string())))
            .unwrap();

        match settle(&controller).await {
            DetailsState::Unavailable { imdb_id, reason } => {
                assert_eq!(imdb_id, "tt404");
                assert_eq!(reason, "Incorrect IMDb ID.");
            }
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_selecting_open_title_closes() {
        let catalog = Arc::new(GatedDetails::default());
        let mut controller = DetailsController::new(catalog);

        controller.select("tt1");
        settle(&controller).await;
        controller.select("tt1");

        assert_eq!(controller.state(), DetailsState::Closed);
        assert_eq!(controller.selected_id(), None);
    }

    #[tokio::test]
    async fn test_switching_selection_discards_previous_lookup() {
        let catalog = Arc::new(GatedDetails::default());
        let first = catalog.gate("tt1");
        let second = catalog.gate("tt2");
        let mut controller = DetailsController::new(catalog);

        controller.select("tt1");
        controller.select("tt2");

        let _ = first.send(Ok(details("tt1", "First")));
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.selected_id().as_deref(), Some("tt2"));
        assert!(controller.state().is_loading());

        second.send(Ok(details("tt2", "Second"))).unwrap();
        assert_eq!(settle(&controller).await, DetailsState::Ready(details("tt2", "Second")));
    }

    #[tokio::test]
    async fn test_close_while_loading() {
        let catalog = Arc::new(GatedDetails::default());
        let release = catalog.gate("tt1");
        let mut controller = DetailsController::new(catalog);

        controller.select("tt1");
        controller.close();
        let _ = release.send(Ok(details("tt1", "Late")));

        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.state(), DetailsState::Closed);
    }
}
