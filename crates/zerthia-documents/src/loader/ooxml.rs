//! DOCX and PPTX extraction straight from the ZIP container.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::{Document, DocumentError, DocumentLoader, DocumentMetadata};

/// Maximum decompressed bytes read from a single ZIP entry (zip-bomb guard).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

const SLIDE_PREFIX: &str = "ppt/slides/slide";

pub struct DocxLoader;

pub struct PptxLoader;

impl DocumentLoader for DocxLoader {
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError> {
        let mut archive = open_archive(bytes, "DOCX")?;
        let xml = read_entry_bounded(&mut archive, "word/document.xml", "DOCX")?;
        let paragraphs = paragraphs(&xml, "DOCX")?;

        Ok(vec![Document {
            content: paragraphs.join("\n\n"),
            metadata: DocumentMetadata::new(source),
        }])
    }
}

impl DocumentLoader for PptxLoader {
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError> {
        let mut archive = open_archive(bytes, "PPTX")?;
        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|n| n.starts_with(SLIDE_PREFIX) && n.ends_with(".xml"))
            .map(str::to_owned)
            .collect();
        if slide_names.is_empty() {
            return Err(DocumentError::parse("PPTX", "no slides found"));
        }
        slide_names.sort_by_key(|name| slide_number(name));

        let mut slides = Vec::with_capacity(slide_names.len());
        for name in slide_names {
            let xml = read_entry_bounded(&mut archive, &name, "PPTX")?;
            let text = paragraphs(&xml, "PPTX")?.join("\n");
            if !text.is_empty() {
                slides.push(Document {
                    content: text,
                    metadata: DocumentMetadata::new(source),
                });
            }
        }
        Ok(slides)
    }
}

fn slide_number(name: &str) -> u32 {
    name.trim_start_matches(SLIDE_PREFIX)
        .trim_end_matches(".xml")
        .parse::<u32>()
        .unwrap_or(u32::MAX)
}

fn open_archive<'a>(
    bytes: &'a [u8],
    format: &'static str,
) -> Result<zip::ZipArchive<Cursor<&'a [u8]>>, DocumentError> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocumentError::parse(format, e))
}

fn read_entry_bounded(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
    name: &str,
    format: &'static str,
) -> Result<Vec<u8>, DocumentError> {
    let entry = archive
        .by_name(name)
        .map_err(|e| DocumentError::parse(format, format!("{name}: {e}")))?;
    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| DocumentError::parse(format, e))?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(DocumentError::parse(
            format,
            format!("ZIP entry {name} exceeds size limit ({MAX_XML_ENTRY_BYTES} bytes)"),
        ));
    }
    Ok(out)
}

/// Collect the text runs (`w:t` / `a:t`) of every paragraph (`w:p` / `a:p`),
/// dropping empty paragraphs.
fn paragraphs(xml: &[u8], format: &'static str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"p" => flush_paragraph(&mut current, &mut out),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run => {
                let text = t.unescape().map_err(|e| DocumentError::parse(format, e))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::parse(format, e)),
            _ => {}
        }
        buf.clear();
    }
    flush_paragraph(&mut current, &mut out);
    Ok(out)
}

fn flush_paragraph(current: &mut String, out: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_owned());
    }
    current.clear();
}
