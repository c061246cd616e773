//! Evidence lookup over the uploaded corpus with degraded fallbacks.

use std::fmt;

use crate::store::DocumentStore;
use crate::vector_index::{ScoredChunk, VectorIndex};

pub const NO_DOCUMENTS: &str =
    "No documents have been uploaded yet. Please upload a document first to enable document queries.";

pub const NO_RELEVANT_INFORMATION: &str =
    "No relevant information found in the uploaded documents based on direct search.";

/// Outcome of a document query. Only `Found` carries usable evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvidence {
    Found(String),
    NoDocuments,
    NoRelevantInformation,
}

impl DocumentEvidence {
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Found(text) => text,
            Self::NoDocuments => NO_DOCUMENTS,
            Self::NoRelevantInformation => NO_RELEVANT_INFORMATION,
        }
    }
}

impl fmt::Display for DocumentEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

#[derive(Debug, Clone)]
pub struct DocumentRetriever {
    top_k: usize,
    preview_chars: usize,
}

impl Default for DocumentRetriever {
    fn default() -> Self {
        Self {
            top_k: 4,
            preview_chars: 1000,
        }
    }
}

impl DocumentRetriever {
    #[must_use]
    pub fn new(top_k: usize, preview_chars: usize) -> Self {
        Self {
            top_k,
            preview_chars,
        }
    }

    /// Find evidence for `query`: nearest chunks first, raw document previews
    /// when the index fails, a keyword scan when it finds nothing.
    pub async fn query(
        &self,
        index: &dyn VectorIndex,
        store: &DocumentStore,
        query: &str,
    ) -> DocumentEvidence {
        if index.is_empty() {
            return DocumentEvidence::NoDocuments;
        }

        match index.similarity_search(query, self.top_k).await {
            Ok(hits) if !hits.is_empty() => {
                tracing::debug!(hits = hits.len(), top_score = hits[0].score, "vector hits");
                DocumentEvidence::Found(format_hits(&hits))
            }
            Ok(_) => {
                tracing::debug!("no vector hits, falling back to keyword scan");
                let previews: Vec<String> = store
                    .keyword_matches(query)
                    .map(|(name, text)| self.preview(name, text))
                    .collect();
                if previews.is_empty() {
                    DocumentEvidence::NoRelevantInformation
                } else {
                    DocumentEvidence::Found(previews.join("\n\n"))
                }
            }
            Err(e) => {
                tracing::warn!("vector search failed, using raw document previews: {e}");
                if store.is_empty() {
                    return DocumentEvidence::NoDocuments;
                }
                let previews: Vec<String> = store
                    .iter()
                    .map(|(name, text)| self.preview(name, text))
                    .collect();
                DocumentEvidence::Found(previews.join("\n\n"))
            }
        }
    }

    fn preview(&self, name: &str, text: &str) -> String {
        let mut chars = text.char_indices();
        match chars.nth(self.preview_chars) {
            Some((cut, _)) => format!("Document: {name}\nContent: {}...", &text[..cut]),
            None => format!("Document: {name}\nContent: {text}"),
        }
    }
}

fn format_hits(hits: &[ScoredChunk]) -> String {
    hits.iter()
        .map(|hit| {
            let meta = &hit.chunk.metadata;
            match meta.headers.as_deref() {
                Some(headers) if !headers.is_empty() => format!(
                    "Document: {}\nCSV Headers: {}\nContent: {}",
                    meta.source,
                    headers.join(", "),
                    hit.chunk.content
                ),
                _ => format!("Document: {}\nContent: {}", meta.source, hit.chunk.content),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, DocumentMetadata};
    use crate::vector_index::{BoxFuture, VectorIndexError};

    /// Index stub returning a fixed search result.
    struct StubIndex {
        len: usize,
        result: fn() -> Result<Vec<ScoredChunk>, VectorIndexError>,
    }

    impl VectorIndex for StubIndex {
        fn add(&self, chunks: Vec<Chunk>) -> BoxFuture<'_, Result<usize, VectorIndexError>> {
            Box::pin(async move { Ok(chunks.len()) })
        }

        fn similarity_search(
            &self,
            _query: &str,
            _k: usize,
        ) -> BoxFuture<'_, Result<Vec<ScoredChunk>, VectorIndexError>> {
            let result = (self.result)();
            Box::pin(async move { result })
        }

        fn len(&self) -> usize {
            self.len
        }
    }

    fn scored(source: &str, content: &str, headers: Option<Vec<String>>) -> ScoredChunk {
        let mut metadata = DocumentMetadata::new(source);
        metadata.headers = headers;
        ScoredChunk {
            score: 0.9,
            chunk: Chunk {
                content: content.to_owned(),
                metadata,
                start_index: 0,
                chunk_index: 0,
            },
        }
    }

    fn store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.insert("notes.txt", "The capital of Florin is Guilder City.");
        store
    }

    fn lock_error() -> Result<Vec<ScoredChunk>, VectorIndexError> {
        Err(VectorIndexError::Lock("poisoned".into()))
    }

    fn no_hits() -> Result<Vec<ScoredChunk>, VectorIndexError> {
        Ok(Vec::new())
    }

    #[tokio::test]
    async fn empty_index_yields_no_documents_sentinel() {
        let index = StubIndex {
            len: 0,
            result: no_hits,
        };
        let evidence = DocumentRetriever::default()
            .query(&index, &DocumentStore::new(), "anything")
            .await;
        assert_eq!(evidence, DocumentEvidence::NoDocuments);
        assert_eq!(evidence.to_string(), NO_DOCUMENTS);
    }

    #[tokio::test]
    async fn hits_are_formatted_with_source_and_headers() {
        let index = StubIndex {
            len: 2,
            result: || {
                Ok(vec![
                    scored("notes.txt", "Florin text", None),
                    scored(
                        "cities.csv",
                        "city: Guilder City",
                        Some(vec!["city".into(), "country".into()]),
                    ),
                ])
            },
        };
        let evidence = DocumentRetriever::default()
            .query(&index, &store(), "florin")
            .await;
        assert_eq!(
            evidence.as_text(),
            "Document: notes.txt\nContent: Florin text\n\n\
             Document: cities.csv\nCSV Headers: city, country\nContent: city: Guilder City"
        );
    }

    #[tokio::test]
    async fn search_error_falls_back_to_previews() {
        let index = StubIndex {
            len: 1,
            result: lock_error,
        };
        let evidence = DocumentRetriever::default()
            .query(&index, &store(), "florin")
            .await;
        assert_eq!(
            evidence,
            DocumentEvidence::Found(
                "Document: notes.txt\nContent: The capital of Florin is Guilder City.".into()
            )
        );
    }

    #[tokio::test]
    async fn search_error_with_empty_store_yields_no_documents() {
        let index = StubIndex {
            len: 1,
            result: lock_error,
        };
        let evidence = DocumentRetriever::default()
            .query(&index, &DocumentStore::new(), "florin")
            .await;
        assert_eq!(evidence, DocumentEvidence::NoDocuments);
    }

    #[tokio::test]
    async fn previews_are_truncated_by_chars() {
        let index = StubIndex {
            len: 1,
            result: lock_error,
        };
        let mut store = DocumentStore::new();
        store.insert("long.txt", "äbcdefghij");
        let evidence = DocumentRetriever::new(4, 3).query(&index, &store, "x").await;
        assert_eq!(evidence.as_text(), "Document: long.txt\nContent: äbc...");
    }

    #[tokio::test]
    async fn no_hits_uses_keyword_scan() {
        let index = StubIndex {
            len: 1,
            result: no_hits,
        };
        let evidence = DocumentRetriever::default()
            .query(&index, &store(), "guilder?")
            .await;
        assert!(matches!(evidence, DocumentEvidence::Found(_)));
        assert!(evidence.as_text().contains("Guilder City"));
    }

    #[tokio::test]
    async fn no_hits_and_no_keyword_match_is_sentinel() {
        let index = StubIndex {
            len: 1,
            result: no_hits,
        };
        let evidence = DocumentRetriever::default()
            .query(&index, &store(), "sourdough starter")
            .await;
        assert_eq!(evidence, DocumentEvidence::NoRelevantInformation);
        assert_eq!(evidence.as_text(), NO_RELEVANT_INFORMATION);
    }
}
