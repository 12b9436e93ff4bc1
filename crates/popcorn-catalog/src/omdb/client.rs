use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetails, SearchResult};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use crate::error::CatalogError;
use crate::omdb::api;
use crate::traits::MovieCatalog;

const USER_AGENT: &str = concat!("popcorn/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, CatalogError> {
        if api_key.trim().is_empty() {
            return Err(CatalogError::MissingApiKey);
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url,
        })
    }

    pub fn from_config(config: &OmdbConfig) -> Result<Self, CatalogError> {
        Self::new(config.api_key.clone(), config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    fn catalog_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        debug!("OMDb search: {:?}", query);
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, CatalogError> {
        debug!("OMDb details: {}", imdb_id);
        api::get_movie_details(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let result = OmdbClient::new("  ".to_string(), "https://www.omdbapi.com/".to_string());
        assert!(matches!(result, Err(CatalogError::MissingApiKey)));
    }

    #[test]
    fn test_from_config() {
        let config = OmdbConfig {
            api_key: "abc12345".to_string(),
            base_url: "http://localhost:9999/".to_string(),
        };
        let client = OmdbClient::from_config(&config).unwrap();
        assert_eq!(client.catalog_name(), "omdb");
        assert_eq!(client.base_url(), "http://localhost:9999/");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // nothing listens on the discard port
        let client = OmdbClient::new("abc12345".to_string(), "http://127.0.0.1:9/".to_string()).unwrap();
        let err = client.search("inception").await.unwrap_err();
        assert!(!err.is_not_found());
    }
}
