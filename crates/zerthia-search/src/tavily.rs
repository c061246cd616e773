use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::provider::{BoxFuture, SearchDepth, SearchHit, WebSearchProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

#[derive(Clone)]
pub struct TavilyProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for TavilyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TavilyProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TavilyProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .user_agent(concat!("zerthia/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl WebSearchProvider for TavilyProvider {
    fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> BoxFuture<'_, Result<Vec<SearchHit>, SearchError>> {
        let query = query.to_owned();
        Box::pin(async move {
            let body = SearchRequest {
                query: &query,
                search_depth: depth,
                max_results,
            };
            let response = self
                .client
                .post(format!("{}/search", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            if !status.is_success() {
                tracing::error!("Tavily API error {status}: {text}");
                return Err(SearchError::Status {
                    provider: "tavily",
                    status: status.as_u16(),
                });
            }

            let parsed: SearchResponse = serde_json::from_str(&text)?;
            tracing::debug!(results = parsed.results.len(), "tavily search completed");
            Ok(parsed.results)
        })
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "tavily"
    }
}
