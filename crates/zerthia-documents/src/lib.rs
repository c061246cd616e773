//! Document ingestion, vector indexing, and retrieval.

pub mod error;
pub mod in_memory_index;
pub mod loader;
pub mod pipeline;
pub mod retriever;
pub mod splitter;
pub mod store;
pub mod types;
pub mod vector_index;

pub use error::DocumentError;
pub use in_memory_index::InMemoryVectorIndex;
pub use loader::DocumentLoader;
pub use pipeline::IngestionPipeline;
pub use retriever::{DocumentEvidence, DocumentRetriever};
pub use splitter::{SplitterConfig, TextSplitter};
pub use store::DocumentStore;
pub use types::{Chunk, Document, DocumentFormat, DocumentMetadata};
pub use vector_index::{BoxFuture, ScoredChunk, VectorIndex, VectorIndexError};

/// Default maximum upload size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
