use std::sync::RwLock;

use zerthia_llm::provider::EmbedFn;

use crate::types::Chunk;
use crate::vector_index::{BoxFuture, ScoredChunk, VectorIndex, VectorIndexError};

struct Entry {
    vector: Vec<f32>,
    chunk: Chunk,
}

/// Brute-force cosine index held in process memory.
pub struct InMemoryVectorIndex {
    embed_fn: EmbedFn,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryVectorIndex {
    #[must_use]
    pub fn new(embed_fn: EmbedFn) -> Self {
        Self {
            embed_fn,
            entries: RwLock::new(Vec::new()),
        }
    }

    fn dimension(&self) -> Result<Option<usize>, VectorIndexError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| VectorIndexError::Lock(e.to_string()))?;
        Ok(entries.first().map(|e| e.vector.len()))
    }
}

impl std::fmt::Debug for InMemoryVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorIndex")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorIndex for InMemoryVectorIndex {
    fn add(&self, chunks: Vec<Chunk>) -> BoxFuture<'_, Result<usize, VectorIndexError>> {
        Box::pin(async move {
            let mut expected = self.dimension()?;
            let mut embedded = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                let vector = (self.embed_fn)(&chunk.content).await?;
                match expected {
                    Some(dim) if dim != vector.len() => {
                        return Err(VectorIndexError::Dimension {
                            expected: dim,
                            actual: vector.len(),
                        });
                    }
                    None => expected = Some(vector.len()),
                    Some(_) => {}
                }
                embedded.push(Entry { vector, chunk });
            }

            let count = embedded.len();
            let mut entries = self
                .entries
                .write()
                .map_err(|e| VectorIndexError::Lock(e.to_string()))?;
            entries.extend(embedded);
            tracing::debug!(added = count, total = entries.len(), "chunks indexed");
            Ok(count)
        })
    }

    fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> BoxFuture<'_, Result<Vec<ScoredChunk>, VectorIndexError>> {
        let query = query.to_owned();
        Box::pin(async move {
            if k == 0 || self.is_empty() {
                return Ok(Vec::new());
            }
            let query_vector = (self.embed_fn)(&query).await?;

            let entries = self
                .entries
                .read()
                .map_err(|e| VectorIndexError::Lock(e.to_string()))?;
            if let Some(first) = entries.first()
                && first.vector.len() != query_vector.len()
            {
                return Err(VectorIndexError::Dimension {
                    expected: first.vector.len(),
                    actual: query_vector.len(),
                });
            }

            let mut scored: Vec<(f32, &Entry)> = entries
                .iter()
                .map(|e| (cosine_similarity(&query_vector, &e.vector), e))
                .collect();
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(k);

            Ok(scored
                .into_iter()
                .map(|(score, e)| ScoredChunk {
                    score,
                    chunk: e.chunk.clone(),
                })
                .collect())
        })
    }

    fn len(&self) -> usize {
        self.entries.read().map_or(0, |e| e.len())
    }
}
