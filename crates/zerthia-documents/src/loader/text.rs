use crate::{Document, DocumentError, DocumentLoader, DocumentMetadata};

pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError> {
        let content = std::str::from_utf8(bytes).map_err(|e| DocumentError::parse("TXT", e))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        Ok(vec![Document {
            content: content.to_owned(),
            metadata: DocumentMetadata::new(source),
        }])
    }
}
