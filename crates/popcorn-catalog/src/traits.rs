use async_trait::async_trait;
use popcorn_models::{MovieDetails, SearchResult};

use crate::error::CatalogError;

/// A remote movie database.
///
/// Implementations must be cancel-safe: dropping a returned future abandons
/// the request without side effects.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn catalog_name(&self) -> &str;

    /// Title search. A no-match answer is `Err(CatalogError::NotFound)`,
    /// never an empty `Ok`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// Full record for one identifier.
    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, CatalogError>;
}
