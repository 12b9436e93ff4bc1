use serde::{Deserialize, Serialize};

/// One entry of a catalog search, passed through as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl SearchResult {
    /// Poster URL, or None when the catalog has no artwork for this title.
    pub fn poster_url(&self) -> Option<&str> {
        match self.poster.as_str() {
            "" | crate::NOT_AVAILABLE => None,
            url => Some(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_omdb_search_item() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "imdbID": "tt1375666",
            "Type": "movie",
            "Poster": "https://m.media-amazon.com/images/M/inception.jpg"
        }"#;

        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.imdb_id, "tt1375666");
        assert_eq!(result.title, "Inception");
        assert_eq!(result.year, "2010");
        assert_eq!(result.poster_url(), Some("https://m.media-amazon.com/images/M/inception.jpg"));
    }

    #[test]
    fn test_poster_not_available() {
        let result = SearchResult {
            imdb_id: "tt0000001".to_string(),
            title: "Untitled".to_string(),
            year: "1999".to_string(),
            poster: "N/A".to_string(),
        };
        assert_eq!(result.poster_url(), None);
    }
}
