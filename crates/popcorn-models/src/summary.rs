use serde::Serialize;

use crate::watched::WatchedEntry;

/// Aggregate figures for the watched list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    /// Minutes
    pub avg_runtime: f64,
}

impl WatchedSummary {
    /// Averages skip entries that lack the value; an empty list yields zeros.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating.map(f64::from))),
            avg_user_rating: average(entries.iter().map(|e| f64::from(e.user_rating.value()))),
            avg_runtime: average(entries.iter().filter_map(|e| e.runtime.map(f64::from))),
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
