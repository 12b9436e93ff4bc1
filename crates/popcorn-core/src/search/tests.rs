use super::*;
use async_trait::async_trait;
use popcorn_models::MovieDetails;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

type Reply = Result<Vec<SearchResult>, CatalogError>;

/// Catalog whose search answers are released by the test.
///
/// Queries registered with `gate` block until the returned sender fires;
/// any other query answers immediately with one result titled after it.
#[derive(Default)]
struct ScriptedCatalog {
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
}

impl ScriptedCatalog {
    fn gate(&self, query: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieCatalog for ScriptedCatalog {
    fn catalog_name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        self.calls.lock().unwrap().push(query.to_string());
        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(CatalogError::Status {
                    status: 599,
                    body: "gate dropped".to_string(),
                })
            }),
            None => Ok(vec![result(query)]),
        }
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, CatalogError> {
        Err(CatalogError::NotFound(format!("no details for {}", imdb_id)))
    }
}

fn result(title: &str) -> SearchResult {
    SearchResult {
        imdb_id: format!("tt-{}", title),
        title: title.to_string(),
        year: "2010".to_string(),
        poster: "N/A".to_string(),
    }
}

fn controller() -> (SearchController, Arc<ScriptedCatalog>) {
    let catalog = Arc::new(ScriptedCatalog::default());
    (SearchController::new(catalog.clone()), catalog)
}

async fn settle(controller: &SearchController) -> SearchState {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(2), SearchController::settled(&mut rx))
        .await
        .expect("search did not settle")
        .expect("controller dropped")
}

/// Let spawned lookup tasks run to completion.
async fn drain(controller: &SearchController) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while controller.is_lookup_pending() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("lookup task did not finish");
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[test]
fn test_effective_len() {
    assert_eq!(effective_len("in"), 2);
    assert_eq!(effective_len("  in  "), 2);
    assert_eq!(effective_len("inc"), 3);
    assert_eq!(effective_len("日本語"), 3);
    assert_eq!(effective_len(""), 0);
}

#[tokio::test]
async fn test_initial_state_is_idle() {
    let (controller, _) = controller();
    assert_eq!(controller.state(), SearchState::default());
    assert_eq!(controller.outcome(), SearchOutcome::Idle);
}

#[tokio::test]
async fn test_short_queries_skip_network() {
    let (mut controller, catalog) = controller();

    for query in ["", "i", "in", "  in  ", "é"] {
        controller.set_query(query);
        assert_eq!(controller.outcome(), SearchOutcome::Success(Vec::new()));
        assert!(!controller.is_lookup_pending());
    }

    drain(&controller).await;
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_query_transitions_loading_then_success() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("inception");

    let generation = controller.set_query("inception");
    assert_eq!(controller.outcome(), SearchOutcome::Loading);
    assert_eq!(controller.state().query, "inception");

    release.send(Ok(vec![result("Inception")])).unwrap();
    let state = settle(&controller).await;

    assert_eq!(state.generation, generation);
    assert_eq!(state.outcome, SearchOutcome::Success(vec![result("Inception")]));
    assert_eq!(catalog.calls(), vec!["inception".to_string()]);
}

#[tokio::test]
async fn test_query_is_trimmed_before_lookup() {
    let (mut controller, catalog) = controller();
    controller.set_query("  matrix ");
    settle(&controller).await;
    assert_eq!(catalog.calls(), vec!["matrix".to_string()]);
}

#[tokio::test]
async fn test_no_match_maps_to_not_found() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("zzzzzz");

    controller.set_query("zzzzzz");
    release
        .send(Err(CatalogError::NotFound("Movie not found!".to_string())))
        .unwrap();

    let state = settle(&controller).await;
    assert_eq!(state.outcome, SearchOutcome::Failure(SearchFailure::NotFound));
    assert_eq!(state.outcome.error_message(), Some("Movie not found"));
}

#[tokio::test]
async fn test_http_failure_maps_to_transport() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("inception");

    controller.set_query("inception");
    release
        .send(Err(CatalogError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }))
        .unwrap();

    let state = settle(&controller).await;
    match state.outcome {
        SearchOutcome::Failure(SearchFailure::Transport(detail)) => assert!(detail.contains("503")),
        other => panic!("expected transport failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_superseded_result_is_never_applied() {
    let (mut controller, catalog) = controller();
    let slow = catalog.gate("incep");
    let fast = catalog.gate("inception");

    let first = controller.set_query("incep");
    let second = controller.set_query("inception");
    assert!(second > first);

    fast.send(Ok(vec![result("Inception")])).unwrap();
    let state = settle(&controller).await;
    assert_eq!(state.outcome, SearchOutcome::Success(vec![result("Inception")]));

    // The older lookup answers late; nothing may change
    let _ = slow.send(Ok(vec![result("Incep")]));
    drain(&controller).await;

    let state = controller.state();
    assert_eq!(state.generation, second);
    assert_eq!(state.query, "inception");
    assert_eq!(state.outcome, SearchOutcome::Success(vec![result("Inception")]));
}

#[tokio::test]
async fn test_stale_failure_does_not_end_loading() {
    let (mut controller, catalog) = controller();
    let old = catalog.gate("avatar");
    let new = catalog.gate("avatar 2");

    controller.set_query("avatar");
    controller.set_query("avatar 2");

    let _ = old.send(Err(CatalogError::Status {
        status: 500,
        body: String::new(),
    }));
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(controller.outcome(), SearchOutcome::Loading);

    new.send(Ok(vec![result("Avatar: The Way of Water")])).unwrap();
    let state = settle(&controller).await;
    assert_eq!(state.query, "avatar 2");
    assert_eq!(state.outcome, SearchOutcome::Success(vec![result("Avatar: The Way of Water")]));
}

#[tokio::test]
async fn test_rapid_typing_only_last_query_settles() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("inc");

    controller.set_query("i");
    controller.set_query("in");
    let last = controller.set_query("inc");
    assert_eq!(controller.outcome(), SearchOutcome::Loading);

    release.send(Ok(vec![result("Inception")])).unwrap();
    let state = settle(&controller).await;

    assert_eq!(state.generation, last);
    assert_eq!(state.query, "inc");
    assert_eq!(catalog.calls(), vec!["inc".to_string()]);
}

#[tokio::test]
async fn test_shortening_query_discards_pending_lookup() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("inception");

    controller.set_query("inception");
    controller.set_query("in");
    assert_eq!(controller.outcome(), SearchOutcome::Success(Vec::new()));

    let _ = release.send(Ok(vec![result("Inception")]));
    drain(&controller).await;
    assert_eq!(controller.outcome(), SearchOutcome::Success(Vec::new()));
}

#[tokio::test]
async fn test_each_query_refetches() {
    let (mut controller, catalog) = controller();

    controller.set_query("matrix");
    settle(&controller).await;
    controller.set_query("matrix");
    settle(&controller).await;

    assert_eq!(catalog.calls(), vec!["matrix".to_string(), "matrix".to_string()]);
}

#[tokio::test]
async fn test_subscriber_sees_loading_before_result() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("inception");
    let mut rx = controller.subscribe();

    controller.set_query("inception");
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().outcome.is_loading());

    release.send(Ok(Vec::new())).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().outcome, SearchOutcome::Success(Vec::new()));
}

#[test]
fn test_publish_if_current_rejects_old_generation() {
    let (tx, _rx) = watch::channel(SearchState {
        generation: 5,
        query: "inception".to_string(),
        outcome: SearchOutcome::Loading,
    });

    assert!(!publish_if_current(&tx, 4, SearchOutcome::Success(vec![result("Old")])));
    assert_eq!(tx.borrow().outcome, SearchOutcome::Loading);

    assert!(publish_if_current(&tx, 5, SearchOutcome::Success(Vec::new())));
    assert_eq!(tx.borrow().outcome, SearchOutcome::Success(Vec::new()));
}

#[tokio::test]
async fn test_dropping_controller_cancels_lookup() {
    let (mut controller, catalog) = controller();
    let release = catalog.gate("inception");
    let mut rx = controller.subscribe();

    controller.set_query("inception");
    drop(controller);

    let _ = release.send(Ok(vec![result("Inception")]));
    assert_eq!(SearchController::settled(&mut rx).await, None);
}
