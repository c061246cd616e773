//! Web search providers and evidence formatting.

pub mod client;
pub mod error;
pub mod provider;
pub mod tavily;

pub use client::{SearchOutcome, WebSearchClient};
pub use error::SearchError;
pub use provider::{SearchDepth, SearchHit, WebSearchProvider};
pub use tavily::TavilyProvider;
