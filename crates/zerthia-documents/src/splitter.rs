use crate::types::{Chunk, Document};

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters carried over from the previous chunk.
    pub chunk_overlap: usize,
    pub sentence_aware: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            sentence_aware: true,
        }
    }
}

/// A span of the source text with its starting character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Piece {
    start: usize,
    text: String,
    chars: usize,
}

impl Piece {
    fn new(start: usize, text: String) -> Self {
        let chars = text.chars().count();
        Self { start, text, chars }
    }
}

pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Split a document into chunks of at most `chunk_size` characters. Every
    /// chunk records the character offset where it starts in `document.content`.
    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        let text = &document.content;
        if text.trim().is_empty() {
            return Vec::new();
        }
        let chunk_size = self.config.chunk_size.max(1);

        let pieces = if self.config.sentence_aware {
            let sentences = split_sentences(text)
                .into_iter()
                .flat_map(|s| {
                    if s.chars > chunk_size {
                        split_chars(&s.text, chunk_size, 0)
                            .into_iter()
                            .map(|p| Piece::new(s.start + p.start, p.text))
                            .collect()
                    } else {
                        vec![s]
                    }
                })
                .collect::<Vec<_>>();
            merge_sentences(&sentences, chunk_size, self.config.chunk_overlap)
        } else {
            split_chars(text, chunk_size, self.config.chunk_overlap)
        };

        pieces
            .into_iter()
            .filter(|p| !p.text.trim().is_empty())
            .enumerate()
            .map(|(i, piece)| Chunk {
                content: piece.text,
                metadata: document.metadata.clone(),
                start_index: piece.start,
                chunk_index: i,
            })
            .collect()
    }
}

fn split_sentences(text: &str) -> Vec<Piece> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut current_start = 0;

    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if current.is_empty() {
            current_start = i;
        }
        current.push(chars[i]);

        // Split on paragraph breaks
        if chars[i] == '\n' && i + 1 < chars.len() && chars[i + 1] == '\n' {
            current.push(chars[i + 1]);
            i += 1;
            if !current.trim().is_empty() {
                sentences.push(Piece::new(current_start, std::mem::take(&mut current)));
            }
        }
        // Split on sentence endings followed by whitespace
        else if matches!(chars[i], '.' | '?' | '!')
            && i + 1 < chars.len()
            && chars[i + 1].is_whitespace()
            && !current.trim().is_empty()
        {
            sentences.push(Piece::new(current_start, std::mem::take(&mut current)));
        }

        i += 1;
    }

    if !current.trim().is_empty() {
        sentences.push(Piece::new(current_start, current));
    }

    sentences
}

/// Merge sentences into chunks, respecting size and overlap (both in characters).
fn merge_sentences(sentences: &[Piece], chunk_size: usize, chunk_overlap: usize) -> Vec<Piece> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;
    let mut current_start = 0;
    // Sliding window: track only the sentence indices contributing to the current chunk.
    let mut window_start = 0;

    for (idx, sentence) in sentences.iter().enumerate() {
        if !current.is_empty() && current_chars + sentence.chars > chunk_size {
            chunks.push(Piece {
                start: current_start,
                text: std::mem::take(&mut current),
                chars: current_chars,
            });

            // Build overlap from recent sentences, keeping room for the next one
            let budget = chunk_overlap.min(chunk_size.saturating_sub(sentence.chars));
            let mut overlap_len = 0;
            let mut overlap_start = idx;
            for i in (window_start..idx).rev() {
                if overlap_len + sentences[i].chars > budget {
                    break;
                }
                overlap_len += sentences[i].chars;
                overlap_start = i;
            }
            for s in &sentences[overlap_start..idx] {
                current.push_str(&s.text);
            }
            current_chars = overlap_len;
            current_start = sentences.get(overlap_start).map_or(0, |s| s.start);
            window_start = overlap_start;
        }

        if current.is_empty() {
            current_start = sentence.start;
        }
        current.push_str(&sentence.text);
        current_chars += sentence.chars;
    }

    if !current.is_empty() {
        chunks.push(Piece {
            start: current_start,
            text: current,
            chars: current_chars,
        });
    }

    chunks
}

fn split_chars(text: &str, chunk_size: usize, overlap: usize) -> Vec<Piece> {
    let mut chunks = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(Piece {
            start,
            text: chars[start..end].iter().collect(),
            chars: end - start,
        });
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
