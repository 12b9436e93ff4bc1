use super::lookup_ui::LookupSpinner;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use popcorn_catalog::MovieCatalog;
use popcorn_core::SearchController;
use popcorn_models::{SearchFailure, SearchOutcome, SearchState};
use std::sync::Arc;

pub async fn run_search(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let spinner = LookupSpinner::start(output, format!("Searching for \"{}\"...", query.trim()));
    let state = search_once(ctx.catalog()?, query).await;
    spinner.finish();
    let state = state?;

    if let SearchOutcome::Failure(failure @ SearchFailure::Transport(detail)) = &state.outcome {
        return Err(color_eyre::eyre::eyre!("{}: {}", failure.message(), detail));
    }

    output.search_outcome(&state.query, &state.outcome);
    Ok(())
}

/// Run one query through a fresh controller and wait for its outcome.
async fn search_once(catalog: Arc<dyn MovieCatalog>, query: &str) -> Result<SearchState> {
    let mut controller = SearchController::new(catalog);
    let mut updates = controller.subscribe();
    controller.set_query(query);

    SearchController::settled(&mut updates)
        .await
        .ok_or_else(|| color_eyre::eyre::eyre!("Search was abandoned before it finished"))
}
