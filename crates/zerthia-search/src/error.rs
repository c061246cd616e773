#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("web search is not configured")]
    NotConfigured,
}
