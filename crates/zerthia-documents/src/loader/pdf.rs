use crate::{Document, DocumentError, DocumentLoader, DocumentMetadata};

pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError> {
        let content =
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::parse("PDF", e))?;

        Ok(vec![Document {
            content,
            metadata: DocumentMetadata::new(source),
        }])
    }
}
