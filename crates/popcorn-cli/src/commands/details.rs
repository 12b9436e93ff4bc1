use super::lookup_ui::LookupSpinner;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use popcorn_core::DetailsController;
use popcorn_models::DetailsState;

pub async fn run_details(ctx: &AppContext, imdb_id: &str, output: &Output) -> Result<()> {
    let imdb_id = imdb_id.trim();
    if imdb_id.is_empty() {
        return Err(color_eyre::eyre::eyre!("IMDb ID cannot be empty"));
    }

    let watched = ctx.watched()?;
    let mut controller = DetailsController::new(ctx.catalog()?);
    let mut updates = controller.subscribe();
    controller.select(imdb_id);

    let spinner = LookupSpinner::start(output, format!("Loading {}...", imdb_id));
    let state = DetailsController::settled(&mut updates)
        .await
        .ok_or_else(|| color_eyre::eyre::eyre!("Lookup was abandoned before it finished"))?;
    spinner.finish();

    match state {
        DetailsState::Ready(details) => {
            output.movie_details(&details, watched.user_rating_for(&details.imdb_id));
            Ok(())
        }
        DetailsState::Unavailable { imdb_id, reason } => {
            Err(color_eyre::eyre::eyre!("Details unavailable for {}: {}", imdb_id, reason))
        }
        DetailsState::Closed | DetailsState::Loading { .. } => Ok(()),
    }
}
