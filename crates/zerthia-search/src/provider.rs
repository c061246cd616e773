use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// A raw provider hit. Fields the provider omitted stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "content")]
    pub snippet: Option<String>,
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait WebSearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> BoxFuture<'_, Result<Vec<SearchHit>, SearchError>>;

    fn name(&self) -> &str;
}
