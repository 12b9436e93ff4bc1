use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::UserRating;

/// A movie the user has watched and rated. `imdb_id` is the uniqueness key
/// within the watched collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub imdb_rating: Option<f32>,
    pub user_rating: UserRating,
    /// Number of times the rating was changed before the entry was committed
    #[serde(default, rename = "countRatingDecisions")]
    pub rating_decisions: u32,
    /// Absent on records written before the date was tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}
