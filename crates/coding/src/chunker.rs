//! Paragraph chunking for model-sized submissions.
//!
//! Chunks respect a maximum character budget but never split a paragraph:
//! the span locator relies on every quoted excerpt living inside whole
//! paragraphs, so a paragraph larger than the budget becomes a chunk of
//! its own rather than being cut mid-sentence.

use crate::document::Paragraph;

/// Default chunk budget in characters.
pub const DEFAULT_CHUNK_BUDGET: usize = 3500;

/// A submission-sized group of consecutive paragraphs.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,

    /// Character count including one separator per paragraph
    pub char_count: usize,
}

impl Chunk {
    /// The chunk's paragraph texts joined with blank-line separators, as
    /// submitted to the model.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Group paragraphs into chunks under `max_chars`.
///
/// Greedy: paragraphs are appended to the current chunk while the budget
/// holds. Each paragraph is counted as its length plus one separator
/// character. The chunks partition the input; every paragraph appears in
/// exactly one chunk, in document order. An empty input yields no chunks.
pub fn chunk_paragraphs(paragraphs: &[Paragraph], max_chars: usize) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buffer: Vec<Paragraph> = Vec::new();
    let mut current = 0usize;

    for paragraph in paragraphs {
        let cost = paragraph.text.len() + 1;
        if current + cost > max_chars && !buffer.is_empty() {
            chunks.push(Chunk {
                paragraphs: std::mem::take(&mut buffer),
                char_count: current,
            });
            current = 0;
        }
        buffer.push(paragraph.clone());
        current += cost;
    }

    if !buffer.is_empty() {
        chunks.push(Chunk {
            paragraphs: buffer,
            char_count: current,
        });
    }

    tracing::debug!(
        "Chunked {} paragraphs into {} chunks (budget: {})",
        paragraphs.len(),
        chunks.len(),
        max_chars
    );

    chunks
}
