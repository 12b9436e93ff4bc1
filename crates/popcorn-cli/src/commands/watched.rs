use super::lookup_ui::LookupSpinner;
use super::AppContext;
use crate::output::Output;
use crate::WatchedCommands;
use color_eyre::Result;
use popcorn_models::UserRating;

pub async fn run_watched(ctx: &AppContext, cmd: WatchedCommands, output: &Output) -> Result<()> {
    match cmd {
        WatchedCommands::List => {
            let watched = ctx.watched()?;
            output.watched_entries(watched.entries());
            Ok(())
        }
        WatchedCommands::Add { imdb_id, rating } => add_watched(ctx, imdb_id.trim(), rating, output).await,
        WatchedCommands::Remove { imdb_id } => {
            let mut watched = ctx.watched()?;
            if watched.remove(imdb_id.trim()) {
                output.success(format!("Removed {} from your watched list", imdb_id.trim()));
            } else {
                output.warn(format!("{} is not in your watched list", imdb_id.trim()));
            }
            Ok(())
        }
        WatchedCommands::Summary => {
            let watched = ctx.watched()?;
            output.watched_summary(&watched.summary());
            Ok(())
        }
    }
}

async fn add_watched(ctx: &AppContext, imdb_id: &str, rating: UserRating, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut watched = ctx.watched()?;

    let spinner = LookupSpinner::start(output, format!("Loading {}...", imdb_id));
    let details = catalog.details(imdb_id).await;
    spinner.finish();
    let details = details.map_err(|e| color_eyre::eyre::eyre!("Could not load {}: {}", imdb_id, e))?;

    let previous = watched.user_rating_for(&details.imdb_id);
    // One rating given on the command line is one rating decision
    watched.add(details.to_watched_entry(rating, 1));

    match previous {
        Some(old) if old != rating => output.success(format!(
            "Updated {} ({}) from {} to {}",
            details.title, details.year, old, rating
        )),
        Some(_) => output.info(format!("{} ({}) is already rated {}", details.title, details.year, rating)),
        None => output.success(format!("Added {} ({}) rated {}", details.title, details.year, rating)),
    }
    Ok(())
}
