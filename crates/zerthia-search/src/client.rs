use std::fmt::Write as _;

use crate::error::SearchError;
use crate::provider::{SearchDepth, SearchHit, WebSearchProvider};

/// Result of a web search. Only `Found` carries evidence; failures are never
/// rendered as evidence text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(String),
    Empty,
    Failed(String),
}

pub struct WebSearchClient {
    provider: Option<Box<dyn WebSearchProvider>>,
    depth: SearchDepth,
    max_results: usize,
}

impl WebSearchClient {
    #[must_use]
    pub fn new(provider: Box<dyn WebSearchProvider>) -> Self {
        Self {
            provider: Some(provider),
            depth: SearchDepth::Advanced,
            max_results: 5,
        }
    }

    /// A client with no backend; every search reports `Failed`.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: None,
            depth: SearchDepth::Advanced,
            max_results: 5,
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: SearchDepth) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn search(&self, query: &str) -> SearchOutcome {
        let Some(provider) = &self.provider else {
            return SearchOutcome::Failed(SearchError::NotConfigured.to_string());
        };

        match provider.search(query, self.depth, self.max_results).await {
            Ok(hits) if hits.is_empty() => SearchOutcome::Empty,
            Ok(hits) => {
                tracing::debug!(provider = provider.name(), hits = hits.len(), "web search hits");
                SearchOutcome::Found(format_hits(&hits))
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), "web search failed: {e}");
                SearchOutcome::Failed(e.to_string())
            }
        }
    }
}

fn format_hits(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    for (i, hit) in hits.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let _ = write!(
            out,
            "Source {}: {}\nURL: {}\nContent: {}",
            i + 1,
            hit.title.as_deref().unwrap_or("No title"),
            hit.url.as_deref().unwrap_or("#"),
            hit.snippet.as_deref().unwrap_or("No description available."),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::BoxFuture;

    struct FixedProvider(fn() -> Result<Vec<SearchHit>, SearchError>);

    impl WebSearchProvider for FixedProvider {
        fn search(
            &self,
            _query: &str,
            _depth: SearchDepth,
            _max_results: usize,
        ) -> BoxFuture<'_, Result<Vec<SearchHit>, SearchError>> {
            let result = (self.0)();
            Box::pin(async move { result })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn hit(title: &str, url: &str, snippet: &str) -> SearchHit {
        SearchHit {
            title: Some(title.into()),
            url: Some(url.into()),
            snippet: Some(snippet.into()),
        }
    }

    #[tokio::test]
    async fn hits_numbered_from_one() {
        let client = WebSearchClient::new(Box::new(FixedProvider(|| {
            Ok(vec![
                hit("A", "https://a.example", "alpha"),
                hit("B", "https://b.example", "beta"),
            ])
        })));
        assert_eq!(
            client.search("q").await,
            SearchOutcome::Found(
                "Source 1: A\nURL: https://a.example\nContent: alpha\n\n\
                 Source 2: B\nURL: https://b.example\nContent: beta"
                    .into()
            )
        );
    }

    #[tokio::test]
    async fn missing_fields_use_placeholders() {
        let client =
            WebSearchClient::new(Box::new(FixedProvider(|| Ok(vec![SearchHit::default()]))));
        assert_eq!(
            client.search("q").await,
            SearchOutcome::Found(
                "Source 1: No title\nURL: #\nContent: No description available.".into()
            )
        );
    }

    #[tokio::test]
    async fn zero_hits_is_empty() {
        let client = WebSearchClient::new(Box::new(FixedProvider(|| Ok(Vec::new()))));
        assert_eq!(client.search("q").await, SearchOutcome::Empty);
    }

    #[tokio::test]
    async fn provider_error_is_failed_not_evidence() {
        let client = WebSearchClient::new(Box::new(FixedProvider(|| Err(SearchError::Status {
            provider: "fixed",
            status: 503,
        }))));
        let SearchOutcome::Failed(reason) = client.search("q").await else {
            panic!("expected failure");
        };
        assert!(reason.contains("503"));
    }

    #[tokio::test]
    async fn disabled_client_fails() {
        let client = WebSearchClient::disabled();
        assert!(!client.is_enabled());
        assert_eq!(
            client.search("q").await,
            SearchOutcome::Failed("web search is not configured".into())
        );
    }
}
