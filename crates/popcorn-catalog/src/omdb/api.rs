use popcorn_models::{MovieDetails, SearchResult};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::CatalogError;

/// Envelope fields shared by every OMDb answer.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(rename = "Search", default)]
    search: Vec<SearchResult>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

/// `?apikey=..&s=<query>`
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, CatalogError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("s", query)])
        .send()
        .await?;

    let body = success_body(response).await?;
    parse_search_response(&body)
}

/// `?apikey=..&i=<id>&plot=full`
pub async fn get_movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetails, CatalogError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("i", imdb_id), ("plot", "full")])
        .send()
        .await?;

    let body = success_body(response).await?;
    parse_details_response(&body)
}

async fn success_body(response: Response) -> Result<String, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.text().await?)
}

fn check_envelope(body: &str) -> Result<(), CatalogError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.response.eq_ignore_ascii_case("false") {
        let message = envelope.error.unwrap_or_else(|| "Movie not found!".to_string());
        return Err(CatalogError::NotFound(message));
    }
    Ok(())
}

pub fn parse_search_response(body: &str) -> Result<Vec<SearchResult>, CatalogError> {
    check_envelope(body)?;
    let page: SearchPage = serde_json::from_str(body)?;
    debug!(
        "OMDb search returned {} results (total {})",
        page.search.len(),
        page.total_results.as_deref().unwrap_or("?")
    );
    Ok(page.search)
}

pub fn parse_details_response(body: &str) -> Result<MovieDetails, CatalogError> {
    check_envelope(body)?;
    Ok(serde_json::from_str(body)?)
}
