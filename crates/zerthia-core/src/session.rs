//! Per-user conversation state.

use zerthia_documents::{
    DocumentError, DocumentFormat, DocumentStore, IngestionPipeline, VectorIndex,
};
use zerthia_llm::{Message, Role};

/// Uploaded file names in upload order, plus the last one for duplicate
/// suppression.
#[derive(Debug, Default)]
struct UploadRegistry {
    files: Vec<String>,
    last_uploaded: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Ingested {
        format: DocumentFormat,
        chunks: usize,
        /// Confirmation appended to the transcript.
        message: String,
    },
    /// Same file name as the previous upload; nothing was done.
    Duplicate,
}

/// One conversation: its own vector index, document store, upload registry,
/// and transcript. Sessions share nothing.
pub struct Session {
    index: Box<dyn VectorIndex>,
    store: DocumentStore,
    uploads: UploadRegistry,
    transcript: Vec<Message>,
    processing: bool,
}

impl Session {
    #[must_use]
    pub fn new(index: Box<dyn VectorIndex>, greeting: impl Into<String>) -> Self {
        Self {
            index,
            store: DocumentStore::new(),
            uploads: UploadRegistry::default(),
            transcript: vec![Message::assistant(greeting)],
            processing: false,
        }
    }

    /// True once at least one upload has been ingested.
    #[must_use]
    pub fn has_documents(&self) -> bool {
        !self.store.is_empty()
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.uploads.files.len()
    }

    #[must_use]
    pub fn uploaded_files(&self) -> &[String] {
        &self.uploads.files
    }

    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    #[must_use]
    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Append a user query and mark the session busy. Blank input is ignored
    /// and returns `false`.
    pub fn submit(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        self.transcript.push(Message::user(query));
        self.processing = true;
        true
    }

    /// The pending query: the last transcript entry when it is from the user.
    #[must_use]
    pub fn active_query(&self) -> Option<&str> {
        self.transcript
            .last()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    pub(crate) fn record_response(&mut self, response: String) {
        self.transcript.push(Message::assistant(response));
    }

    pub(crate) fn finish_processing(&mut self) {
        self.processing = false;
    }

    /// Ingest an uploaded file into this session.
    ///
    /// Uploading the same file name twice in a row is a no-op. A failed upload
    /// leaves the index, store, registry, and transcript untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`DocumentError`] from parsing or indexing.
    pub async fn upload(
        &mut self,
        pipeline: &IngestionPipeline,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, DocumentError> {
        if self.uploads.last_uploaded.as_deref() == Some(filename) {
            tracing::debug!(source = filename, "skipping repeated upload");
            return Ok(UploadOutcome::Duplicate);
        }

        let format = DocumentFormat::from_filename(filename)?;
        let chunks = pipeline
            .ingest(self.index.as_ref(), &mut self.store, filename, bytes)
            .await?;

        if !self.uploads.files.iter().any(|f| f == filename) {
            self.uploads.files.push(filename.to_owned());
        }
        self.uploads.last_uploaded = Some(filename.to_owned());

        let message = format!(
            "📄 {} document '{filename}' successfully uploaded and processed ({chunks} chunks). \
You can now ask questions about this document.",
            format.label()
        );
        self.transcript.push(Message::assistant(message.clone()));

        Ok(UploadOutcome::Ingested {
            format,
            chunks,
            message,
        })
    }
}
