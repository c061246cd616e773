use std::fmt;

use crate::DocumentError;

/// Upload formats accepted by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Pptx,
    /// Legacy binary `.ppt` (OLE2 compound file).
    Ppt,
    Csv,
}

impl DocumentFormat {
    /// Resolve the format from the text after the last `.` of `filename`,
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for any extension outside the allow-list.
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            "pptx" => Ok(Self::Pptx),
            "ppt" => Ok(Self::Ppt),
            "csv" => Ok(Self::Csv),
            _ => Err(DocumentError::UnsupportedFormat(if ext.is_empty() {
                filename.to_owned()
            } else {
                ext
            })),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
            Self::Pptx => "PPTX",
            Self::Ppt => "PPT",
            Self::Csv => "CSV",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Original upload filename.
    pub source: String,
    /// Column headers, set for tabular sources only.
    pub headers: Option<Vec<String>>,
}

impl DocumentMetadata {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            headers: None,
        }
    }
}

/// One parsed passage: a page, slide, paragraph group, or table row.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Character offset of the chunk within the full document text.
    pub start_index: usize,
    pub chunk_index: usize,
}
