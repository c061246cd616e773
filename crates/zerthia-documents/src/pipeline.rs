use crate::splitter::TextSplitter;
use crate::store::DocumentStore;
use crate::types::{Chunk, Document, DocumentFormat, DocumentMetadata};
use crate::vector_index::VectorIndex;
use crate::{DEFAULT_MAX_FILE_SIZE, DocumentError};

/// Passage separator used when joining a file's passages into its full text.
const PASSAGE_SEPARATOR: &str = "\n\n";

/// A parsed upload that has not touched any session state yet.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub format: DocumentFormat,
    pub text: String,
    pub chunks: Vec<Chunk>,
}

pub struct IngestionPipeline {
    splitter: TextSplitter,
    max_file_size: u64,
}

impl IngestionPipeline {
    #[must_use]
    pub fn new(splitter: TextSplitter) -> Self {
        Self {
            splitter,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Validate, parse, and chunk an upload entirely in memory.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for extensions outside the allow-list,
    /// [`DocumentError::FileTooLarge`] above the size limit, and [`DocumentError::Parse`]
    /// when the file is malformed or contains no extractable text.
    pub async fn parse(&self, filename: &str, bytes: Vec<u8>) -> Result<ParsedDocument, DocumentError> {
        let format = DocumentFormat::from_filename(filename)?;

        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(DocumentError::FileTooLarge(size));
        }

        let source = filename.to_owned();
        let passages = tokio::task::spawn_blocking(move || format.loader().load(&source, &bytes))
            .await
            .map_err(|e| DocumentError::Task(e.to_string()))??;

        let text = passages
            .iter()
            .map(|p| p.content.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR);
        if text.is_empty() {
            return Err(DocumentError::parse(format.label(), "no extractable text"));
        }

        let metadata = passages
            .into_iter()
            .next()
            .map_or_else(|| DocumentMetadata::new(filename), |p| p.metadata);
        let document = Document {
            content: text,
            metadata,
        };
        let chunks = self.splitter.split(&document);
        if chunks.is_empty() {
            return Err(DocumentError::parse(format.label(), "no extractable text"));
        }

        Ok(ParsedDocument {
            format,
            text: document.content,
            chunks,
        })
    }

    /// Parse an upload, add its chunks to `index`, then record its full text in
    /// `store`. Nothing is written to either when any step fails. Returns the
    /// chunk count.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or indexing fails.
    pub async fn ingest(
        &self,
        index: &dyn VectorIndex,
        store: &mut DocumentStore,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<usize, DocumentError> {
        let parsed = self.parse(filename, bytes).await?;
        let count = index.add(parsed.chunks).await?;
        store.insert(filename, parsed.text);

        tracing::info!(
            source = filename,
            format = parsed.format.label(),
            chunks = count,
            "document ingested"
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory_index::InMemoryVectorIndex;
    use crate::splitter::SplitterConfig;
    use crate::loader::zip_fixture;
    use zerthia_llm::any::embed_fn;
    use zerthia_llm::mock::MockProvider;

    fn pipeline() -> IngestionPipeline {
        IngestionPipeline::new(TextSplitter::new(SplitterConfig::default()))
    }

    /// Single-page PDF drawing `text` in Helvetica, with exact xref offsets.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_owned(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_owned(),
        ];

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    fn index() -> InMemoryVectorIndex {
        InMemoryVectorIndex::new(embed_fn(
            MockProvider::default().with_keyword_embeddings(&["florin"]),
        ))
    }

    #[tokio::test]
    async fn ingest_text_file() {
        let index = index();
        let mut store = DocumentStore::new();
        let count = pipeline()
            .ingest(&index, &mut store, "notes.txt", b"Florin is a country.".to_vec())
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(index.len(), 1);
        assert_eq!(store.get("notes.txt"), Some("Florin is a country."));
    }

    #[tokio::test]
    async fn unsupported_format_touches_nothing() {
        let index = index();
        let mut store = DocumentStore::new();
        let err = pipeline()
            .ingest(&index, &mut store, "photo.jpg", vec![0xff, 0xd8])
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(ref e) if e == "jpg"));
        assert!(index.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn oversize_upload_rejected() {
        let index = index();
        let mut store = DocumentStore::new();
        let err = IngestionPipeline::new(TextSplitter::new(SplitterConfig::default()))
            .with_max_file_size(4)
            .ingest(&index, &mut store, "big.txt", b"12345".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::FileTooLarge(5)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn whitespace_only_file_is_parse_failure() {
        let index = index();
        let mut store = DocumentStore::new();
        let err = pipeline()
            .ingest(&index, &mut store, "blank.txt", b"  \n\n  ".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
        assert!(index.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_leaves_store_empty() {
        let index = InMemoryVectorIndex::new(embed_fn(
            MockProvider::default().with_failing_embeddings(),
        ));
        let mut store = DocumentStore::new();
        let err = pipeline()
            .ingest(&index, &mut store, "notes.txt", b"text".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Index(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn reingest_appends_chunks_and_replaces_text() {
        let index = index();
        let mut store = DocumentStore::new();
        let p = pipeline();
        p.ingest(&index, &mut store, "notes.txt", b"first".to_vec())
            .await
            .unwrap();
        p.ingest(&index, &mut store, "notes.txt", b"second".to_vec())
            .await
            .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("notes.txt"), Some("second"));
    }

    #[tokio::test]
    async fn csv_chunks_carry_headers() {
        let parsed = pipeline()
            .parse("cities.csv", b"city,country\nGuilder City,Florin\n".to_vec())
            .await
            .unwrap();
        assert_eq!(parsed.format, DocumentFormat::Csv);
        assert_eq!(
            parsed.chunks[0].metadata.headers,
            Some(vec!["city".to_owned(), "country".to_owned()])
        );
        assert_eq!(parsed.chunks[0].metadata.source, "cities.csv");
    }

    #[tokio::test]
    async fn pdf_upload_is_extracted_and_chunked() {
        let parsed = pipeline()
            .parse("report.pdf", minimal_pdf("Florin exports wool"))
            .await
            .unwrap();
        assert_eq!(parsed.format, DocumentFormat::Pdf);
        assert!(!parsed.chunks.is_empty());
        assert!(parsed.text.contains("Florin"), "{:?}", parsed.text);
        assert_eq!(parsed.chunks[0].metadata.source, "report.pdf");
    }

    #[tokio::test]
    async fn pptx_slides_joined_with_blank_line() {
        let slide = |t: &str| {
            format!(r#"<p:sld xmlns:a="a" xmlns:p="p"><a:p><a:r><a:t>{t}</a:t></a:r></a:p></p:sld>"#)
        };
        let (one, two) = (slide("Intro."), slide("Details."));
        let bytes = zip_fixture(&[
            ("ppt/slides/slide1.xml", one.as_str()),
            ("ppt/slides/slide2.xml", two.as_str()),
        ]);
        let parsed = pipeline().parse("Deck.PPTX", bytes).await.unwrap();
        assert_eq!(parsed.text, "Intro.\n\nDetails.");
        assert_eq!(parsed.chunks.len(), 1);
    }

    #[tokio::test]
    async fn long_text_produces_overlapping_chunks() {
        let sentence = "Florin has rolling hills and quiet rivers. ";
        let text = sentence.repeat(60);
        let parsed = pipeline().parse("long.txt", text.into_bytes()).await.unwrap();
        assert!(parsed.chunks.len() >= 3);
        assert!(parsed.chunks.windows(2).all(|w| w[1].start_index < w[0].start_index + w[0].content.chars().count()));
    }
}
