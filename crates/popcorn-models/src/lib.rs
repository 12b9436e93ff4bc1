pub mod details;
pub mod outcome;
pub mod rating;
pub mod search_result;
pub mod summary;
pub mod watched;

pub use details::MovieDetails;
pub use outcome::{DetailsState, DetailsView, SearchFailure, SearchOutcome, SearchState};
pub use rating::{InvalidRating, UserRating};
pub use search_result::SearchResult;
pub use summary::WatchedSummary;
pub use watched::WatchedEntry;

/// Placeholder OMDb uses for missing fields ("N/A").
pub const NOT_AVAILABLE: &str = "N/A";
