use std::fmt::Write as _;

use crate::{Document, DocumentError, DocumentLoader, DocumentMetadata};

/// One passage per record, rendered as `header: value` lines. The header row is
/// attached to every passage.
pub struct CsvLoader;

impl DocumentLoader for CsvLoader {
    fn load(&self, source: &str, bytes: &[u8]) -> Result<Vec<Document>, DocumentError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DocumentError::parse("CSV", e))?
            .iter()
            .map(str::to_owned)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DocumentError::parse("CSV", e))?;
            let mut content = String::new();
            for (i, value) in record.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                if !content.is_empty() {
                    content.push('\n');
                }
                match headers.get(i).filter(|h| !h.is_empty()) {
                    Some(header) => {
                        let _ = write!(content, "{header}: {value}");
                    }
                    None => {
                        let _ = write!(content, "column {}: {value}", i + 1);
                    }
                }
            }
            if content.is_empty() {
                continue;
            }
            let mut metadata = DocumentMetadata::new(source);
            metadata.headers = Some(headers.clone());
            rows.push(Document { content, metadata });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_become_header_value_passages() {
        let data = "city,country,population\nGuilder City,Florin,120000\nSt. Mark,Guilder,\n";
        let docs = CsvLoader.load("cities.csv", data.as_bytes()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs[0].content,
            "city: Guilder City\ncountry: Florin\npopulation: 120000"
        );
        assert_eq!(docs[1].content, "city: St. Mark\ncountry: Guilder");
        assert_eq!(
            docs[0].metadata.headers.as_deref(),
            Some(&["city".to_owned(), "country".to_owned(), "population".to_owned()][..])
        );
    }

    #[test]
    fn extra_fields_get_positional_names() {
        let docs = CsvLoader.load("x.csv", b"a\n1,2\n").unwrap();
        assert_eq!(docs[0].content, "a: 1\ncolumn 2: 2");
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let docs = CsvLoader.load("x.csv", b"a,b\n").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let err = CsvLoader.load("x.csv", &[b'a', b'\n', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { format: "CSV", .. }));
    }
}
