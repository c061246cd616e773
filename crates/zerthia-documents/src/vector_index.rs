use std::future::Future;
use std::pin::Pin;

use crate::types::Chunk;

#[derive(Debug, thiserror::Error)]
pub enum VectorIndexError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] zerthia_llm::LlmError),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
    #[error("index lock poisoned: {0}")]
    Lock(String),
}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub score: f32,
    pub chunk: Chunk,
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbor index over document chunks. Entries are append-only for the
/// lifetime of the index.
pub trait VectorIndex: Send + Sync {
    /// Embed and insert `chunks`. Either every chunk is inserted or none is.
    /// Returns the number of inserted chunks.
    fn add(&self, chunks: Vec<Chunk>) -> BoxFuture<'_, Result<usize, VectorIndexError>>;

    /// Up to `k` chunks ordered by descending similarity to `query`.
    fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> BoxFuture<'_, Result<Vec<ScoredChunk>, VectorIndexError>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
