use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::rating::UserRating;
use crate::watched::WatchedEntry;

/// Full record returned by the catalog's detail lookup.
///
/// Numeric fields are kept as the raw strings the API sends ("148 min",
/// "8.8", "N/A"); use the accessor methods for parsed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
}

impl MovieDetails {
    /// Leading numeric token of the runtime string, in minutes.
    pub fn runtime_minutes(&self) -> Option<u32> {
        parse_leading_number(&self.runtime)
    }

    pub fn imdb_rating_value(&self) -> Option<f32> {
        self.imdb_rating.trim().parse::<f32>().ok().filter(|v| v.is_finite())
    }

    /// Rated above 8 on IMDb.
    pub fn is_top_rated(&self) -> bool {
        self.imdb_rating_value().is_some_and(|rating| rating > 8.0)
    }

    /// Build the watch-list record for this title with the user's rating.
    pub fn to_watched_entry(&self, user_rating: UserRating, rating_decisions: u32) -> WatchedEntry {
        WatchedEntry {
            imdb_id: self.imdb_id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster: self.poster.clone(),
            runtime: self.runtime_minutes(),
            imdb_rating: self.imdb_rating_value(),
            user_rating,
            rating_decisions,
            date_added: Some(Utc::now()),
        }
    }
}

fn parse_leading_number(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> MovieDetails {
        MovieDetails {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster: "https://example.com/inception.jpg".to_string(),
            runtime: "148 min".to_string(),
            imdb_rating: "8.8".to_string(),
            plot: "A thief who steals corporate secrets...".to_string(),
            released: "16 Jul 2010".to_string(),
            actors: "Leonardo DiCaprio, Joseph Gordon-Levitt".to_string(),
            director: "Christopher Nolan".to_string(),
            genre: "Action, Adventure, Sci-Fi".to_string(),
        }
    }

    #[test]
    fn test_runtime_minutes() {
        let mut details = inception();
        assert_eq!(details.runtime_minutes(), Some(148));

        details.runtime = "N/A".to_string();
        assert_eq!(details.runtime_minutes(), None);

        details.runtime = String::new();
        assert_eq!(details.runtime_minutes(), None);
    }

    #[test]
    fn test_imdb_rating_and_top_rated() {
        let mut details = inception();
        assert_eq!(details.imdb_rating_value(), Some(8.8));
        assert!(details.is_top_rated());

        details.imdb_rating = "8.0".to_string();
        assert!(!details.is_top_rated());

        details.imdb_rating = "N/A".to_string();
        assert_eq!(details.imdb_rating_value(), None);
        assert!(!details.is_top_rated());
    }

    #[test]
    fn test_to_watched_entry() {
        let entry = inception().to_watched_entry(UserRating::new(9).unwrap(), 2);
        assert_eq!(entry.imdb_id, "tt1375666");
        assert_eq!(entry.runtime, Some(148));
        assert_eq!(entry.imdb_rating, Some(8.8));
        assert_eq!(entry.user_rating.value(), 9);
        assert_eq!(entry.rating_decisions, 2);
    }

    #[test]
    fn test_deserialize_full_plot_response() {
        let json = r#"{
            "Title": "Inception", "Year": "2010", "Rated": "PG-13",
            "Released": "16 Jul 2010", "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi", "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio", "Plot": "Dreams.",
            "Poster": "https://example.com/p.jpg", "imdbRating": "8.8",
            "imdbID": "tt1375666", "Type": "movie", "Response": "True"
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.director, "Christopher Nolan");
        assert_eq!(details.runtime_minutes(), Some(148));
    }
}
