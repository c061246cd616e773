use crate::vector_index::VectorIndexError;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("{format} parse failed: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },

    #[error("parser task failed: {0}")]
    Task(String),

    #[error("indexing failed: {0}")]
    Index(#[from] VectorIndexError),
}

impl DocumentError {
    pub(crate) fn parse(format: &'static str, reason: impl ToString) -> Self {
        Self::Parse {
            format,
            reason: reason.to_string(),
        }
    }
}
