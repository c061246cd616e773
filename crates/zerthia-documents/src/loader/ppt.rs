//! Legacy binary `.ppt` decks: text atoms from the `PowerPoint Document` stream
//! of the OLE2 compound file.

use std::io::{Cursor, Read};

use super::PptxLoader;
use crate::{Document, DocumentError, DocumentLoader, DocumentMetadata};

const STREAM: &str = "/PowerPoint Document";

/// Maximum bytes read from the document stream.
const MAX_STREAM_BYTES: u64 = 50 * 1024 * 1024;

const HEADER_LEN: usize = 8;
const MAIN_MASTER: u16 = 0x03F8;
const TEXT_CHARS_ATOM: u16 = 0x0FA0;
const TEXT_BYTES_ATOM: u16 = 0x0FA8;

pub struct PptLoader;

impl DocumentLoader for PptLoader {
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError> {
        // Renamed .pptx files are common enough to accept.
        if bytes.starts_with(b"PK") {
            return PptxLoader.load(source, bytes);
        }

        let stream = read_document_stream(bytes)?;
        let mut blocks = Vec::new();
        collect_text(&stream, &mut blocks);
        if blocks.is_empty() {
            return Err(DocumentError::parse("PPT", "no text found"));
        }

        Ok(vec![Document {
            content: blocks.join("\n"),
            metadata: DocumentMetadata::new(source),
        }])
    }
}

fn read_document_stream(bytes: &[u8]) -> Result<Vec<u8>, DocumentError> {
    let mut file =
        cfb::CompoundFile::open(Cursor::new(bytes)).map_err(|e| DocumentError::parse("PPT", e))?;
    let stream = file
        .open_stream(STREAM)
        .map_err(|e| DocumentError::parse("PPT", format!("{STREAM}: {e}")))?;
    let mut out = Vec::new();
    stream
        .take(MAX_STREAM_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| DocumentError::parse("PPT", e))?;
    if out.len() as u64 >= MAX_STREAM_BYTES {
        return Err(DocumentError::parse(
            "PPT",
            format!("document stream exceeds size limit ({MAX_STREAM_BYTES} bytes)"),
        ));
    }
    Ok(out)
}

/// Walk the record tree, descending into containers and skipping master slides.
/// A record whose length overruns its parent is truncated to the parent's end.
fn collect_text(mut data: &[u8], out: &mut Vec<String>) {
    while data.len() >= HEADER_LEN {
        let ver_instance = u16::from_le_bytes([data[0], data[1]]);
        let rec_type = u16::from_le_bytes([data[2], data[3]]);
        let len = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let end = usize::try_from(len)
            .map_or(data.len(), |len| HEADER_LEN.saturating_add(len))
            .min(data.len());
        let body = &data[HEADER_LEN..end];

        match rec_type {
            MAIN_MASTER => {}
            TEXT_CHARS_ATOM => push_block(out, &utf16_text(body)),
            TEXT_BYTES_ATOM => push_block(out, &latin1_text(body)),
            _ if ver_instance & 0x000F == 0x000F => collect_text(body, out),
            _ => {}
        }
        data = &data[end..];
    }
}

fn utf16_text(body: &[u8]) -> String {
    let units = body
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn latin1_text(body: &[u8]) -> String {
    body.iter().map(|&b| char::from(b)).collect()
}

/// Paragraph (`\r`) and vertical-tab line breaks become newlines.
fn push_block(out: &mut Vec<String>, text: &str) {
    let text = text.replace(['\r', '\u{000B}'], "\n");
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_owned());
    }
}
