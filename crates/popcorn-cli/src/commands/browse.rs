//! Interactive search session.
//!
//! Each plain line replaces the query, so typing a longer or shorter query
//! while a lookup is pending supersedes it. Lines that start with `:` act on
//! the results, the details panel and the watched list.

use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_core::{effective_len, DetailsController, SearchController, WatchedList, MIN_QUERY_LEN};
use popcorn_models::{DetailsState, SearchOutcome, SearchState, UserRating};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Type a title to search. Commands:
  :open N | :open ID   show details for result N or an IMDb ID (again to close)
  :close               close the details panel (also :esc)
  :rate N              rate the open movie 1-10
  :add                 add the open movie with your rating to the watched list
  :watched             list watched movies
  :summary             show watched counts and averages
  :remove ID           remove a movie from the watched list
  :help                show this help
  :quit                leave (also Ctrl-D)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 1-based position in the current results
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Query(String),
    Open(Selection),
    Close,
    Rate(UserRating),
    Add,
    Watched,
    Summary,
    Remove(String),
    Help,
    Quit,
    /// A recognised command with a bad argument
    Invalid(String),
    Unknown(String),
}

/// Interpret one input line.
pub fn parse_input(line: &str) -> BrowseCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return BrowseCommand::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    match (name.as_str(), arg) {
        ("open" | "o", Some(arg)) => match arg.parse::<usize>() {
            Ok(0) => BrowseCommand::Invalid("Results are numbered from 1".to_string()),
            Ok(index) => BrowseCommand::Open(Selection::Index(index)),
            Err(_) => BrowseCommand::Open(Selection::Id(arg.to_string())),
        },
        ("open" | "o", None) => BrowseCommand::Invalid("Usage: :open N | :open ID".to_string()),
        ("close" | "esc" | "c", _) => BrowseCommand::Close,
        ("rate" | "r", Some(arg)) => match arg.parse::<UserRating>() {
            Ok(rating) => BrowseCommand::Rate(rating),
            Err(e) => BrowseCommand::Invalid(e.to_string()),
        },
        ("rate" | "r", None) => BrowseCommand::Invalid("Usage: :rate 1-10".to_string()),
        ("add" | "a", _) => BrowseCommand::Add,
        ("watched" | "w", _) => BrowseCommand::Watched,
        ("summary" | "s", _) => BrowseCommand::Summary,
        ("remove" | "rm", Some(arg)) => BrowseCommand::Remove(arg.to_string()),
        ("remove" | "rm", None) => BrowseCommand::Invalid("Usage: :remove ID".to_string()),
        ("help" | "h" | "?", _) => BrowseCommand::Help,
        ("quit" | "q" | "exit", _) => BrowseCommand::Quit,
        _ => BrowseCommand::Unknown(name),
    }
}

/// Rating chosen for the open movie but not yet committed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PendingRating {
    rating: Option<UserRating>,
    /// Number of distinct ratings picked while the panel was open
    decisions: u32,
}

impl PendingRating {
    fn choose(&mut self, rating: UserRating) {
        if self.rating != Some(rating) {
            self.rating = Some(rating);
            self.decisions += 1;
        }
    }
}

struct Session {
    search: SearchController,
    details: DetailsController,
    watched: WatchedList,
    pending: PendingRating,
    output: Output,
}

enum Flow {
    Continue,
    Quit,
}

pub async fn run_browse(ctx: &AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut session = Session {
        search: SearchController::new(catalog.clone()),
        details: DetailsController::new(catalog),
        watched: ctx.watched()?,
        pending: PendingRating::default(),
        output: *output,
    };

    let mut search_updates = session.search.subscribe();
    let mut details_updates = session.details.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    output.info(format!("{} Type a title to search, :help for commands", "popcorn".bold()));
    output.prompt("> ")?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = session.handle(parse_input(&line)) {
                    break;
                }
                output.prompt("> ")?;
            }
            Ok(()) = search_updates.changed() => {
                let state = search_updates.borrow_and_update().clone();
                session.render_search(&state);
            }
            Ok(()) = details_updates.changed() => {
                let state = details_updates.borrow_and_update().state.clone();
                session.render_details(&state);
            }
        }
    }

    debug!("Browse session ended");
    Ok(())
}

impl Session {
    fn handle(&mut self, command: BrowseCommand) -> Flow {
        match command {
            BrowseCommand::Query(query) => {
                self.search.set_query(&query);
            }
            BrowseCommand::Open(selection) => self.open(selection),
            BrowseCommand::Close => {
                if self.details.selected_id().is_some() {
                    self.details.close();
                }
            }
            BrowseCommand::Rate(rating) => self.rate(rating),
            BrowseCommand::Add => self.add(),
            BrowseCommand::Watched => self.output.watched_entries(self.watched.entries()),
            BrowseCommand::Summary => self.output.watched_summary(&self.watched.summary()),
            BrowseCommand::Remove(imdb_id) => {
                if self.watched.remove(&imdb_id) {
                    self.output.success(format!("Removed {}", imdb_id));
                } else {
                    self.output.warn(format!("{} is not in your watched list", imdb_id));
                }
            }
            BrowseCommand::Help => self.output.info(HELP),
            BrowseCommand::Quit => return Flow::Quit,
            BrowseCommand::Invalid(msg) => self.output.warn(msg),
            BrowseCommand::Unknown(name) => self.output.warn(format!("Unknown command ':{}', try :help", name)),
        }
        Flow::Continue
    }

    fn open(&mut self, selection: Selection) {
        let imdb_id = match selection {
            Selection::Id(imdb_id) => imdb_id,
            Selection::Index(index) => {
                let outcome = self.search.outcome();
                match outcome.results().get(index - 1) {
                    Some(result) => result.imdb_id.clone(),
                    None => {
                        self.output.warn(format!("No result number {}", index));
                        return;
                    }
                }
            }
        };

        // Every newly opened panel starts without a rating
        self.pending = PendingRating::default();
        self.details.select(&imdb_id);
    }

    fn rate(&mut self, rating: UserRating) {
        let DetailsState::Ready(details) = self.details.state() else {
            self.output.warn("Open a movie before rating it");
            return;
        };
        if let Some(existing) = self.watched.user_rating_for(&details.imdb_id) {
            self.output.info(format!("You rated this movie {} ⭐", existing));
            return;
        }
        self.pending.choose(rating);
        self.output.info(format!("Rating {} set, :add to save it", rating));
    }

    fn add(&mut self) {
        let DetailsState::Ready(details) = self.details.state() else {
            self.output.warn("Open a movie before adding it");
            return;
        };
        if self.watched.is_watched(&details.imdb_id) {
            self.output.info(format!("{} is already in your watched list", details.title));
            return;
        }
        let Some(rating) = self.pending.rating else {
            self.output.warn("Rate the movie first with :rate N");
            return;
        };

        self.watched.add(details.to_watched_entry(rating, self.pending.decisions));
        self.pending = PendingRating::default();
        self.output.success(format!("Added {} rated {}", details.title, rating));
        self.details.close();
    }

    fn render_search(&self, state: &SearchState) {
        if state.query.trim().is_empty() {
            return;
        }
        if effective_len(&state.query) < MIN_QUERY_LEN && matches!(state.outcome, SearchOutcome::Success(_)) {
            self.output.info(format!("Type at least {} characters to search", MIN_QUERY_LEN).dimmed().to_string());
            return;
        }
        self.output.search_outcome(&state.query, &state.outcome);
    }

    fn render_details(&self, state: &DetailsState) {
        match state {
            DetailsState::Closed => {}
            DetailsState::Loading { imdb_id } => self.output.info(format!("Loading {}...", imdb_id).dimmed().to_string()),
            DetailsState::Ready(details) => {
                let rating = self.watched.user_rating_for(&details.imdb_id);
                self.output.movie_details(details, rating);
                if rating.is_none() {
                    self.output.info("Rate it with :rate 1-10, then :add".dimmed().to_string());
                }
            }
            DetailsState::Unavailable { reason, .. } => self.output.error(format!("⛔ {}", reason)),
        }
    }
}
