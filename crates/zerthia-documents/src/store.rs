use std::collections::BTreeMap;

/// Full extracted text of every uploaded document, keyed by filename.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    documents: BTreeMap<String, String>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the text stored for `source`.
    pub fn insert(&mut self, source: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(source.into(), text.into());
    }

    #[must_use]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.documents.get(source).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.documents.contains_key(source)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Documents whose text contains any of the query's words (case-insensitive).
    /// Surrounding punctuation is trimmed from each word.
    pub fn keyword_matches<'a>(&'a self, query: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();
        self.iter().filter(move |(_, text)| {
            let lower = text.to_lowercase();
            words.iter().any(|w| lower.contains(w.as_str()))
        })
    }
}
