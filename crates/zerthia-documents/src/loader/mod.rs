mod csv;
mod ooxml;
mod pdf;
mod ppt;
mod text;

pub use self::csv::CsvLoader;
pub use self::ooxml::{DocxLoader, PptxLoader};
pub use self::pdf::PdfLoader;
pub use self::ppt::PptLoader;
pub use self::text::TextLoader;

use crate::{Document, DocumentError, DocumentFormat};

/// Format-specific parser. Runs synchronously on in-memory bytes; callers move
/// it onto a blocking thread.
pub trait DocumentLoader: Send + Sync {
    /// Parse `bytes` into passages tagged with `source`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] when the bytes are not a valid file of this format.
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError>;
}

static TEXT: TextLoader = TextLoader;
static PDF: PdfLoader = PdfLoader;
static DOCX: DocxLoader = DocxLoader;
static PPTX: PptxLoader = PptxLoader;
static PPT: PptLoader = PptLoader;
static CSV: CsvLoader = CsvLoader;

impl DocumentFormat {
    #[must_use]
    pub fn loader(self) -> &'static dyn DocumentLoader {
        match self {
            Self::Txt => &TEXT,
            Self::Pdf => &PDF,
            Self::Docx => &DOCX,
            Self::Pptx => &PPTX,
            Self::Ppt => &PPT,
            Self::Csv => &CSV,
        }
    }
}

#[cfg(test)]
pub(crate) fn zip_fixture(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
