use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Well-formed response reporting no match (`"Response": "False"`)
    #[error("{0}")]
    NotFound(String),

    #[error("OMDb API key is not configured")]
    MissingApiKey,
}

impl CatalogError {
    /// True for the catalog's explicit no-match answer, false for transport
    /// and decoding failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}
