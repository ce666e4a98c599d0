//! Transcript document model: paragraphs plus layered highlight
//! annotations.
//!
//! The document is represented as immutable paragraph text with a list of
//! `(range, category)` annotations on top, rather than a mutable
//! per-character style. Text content is never inserted, deleted, or
//! reordered by any operation here; stripping all annotations always
//! yields the original transcript byte-for-byte.

use crate::locate::LocatedSpan;
use crate::taxonomy::Category;
use qualcode_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One transcript paragraph. Immutable once extracted; `index` is the
/// paragraph's position in document order and the join key back to the
/// output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Position in document order (0-based, dense)
    pub index: usize,

    /// Paragraph text
    pub text: String,
}

/// Extract the ordered paragraph sequence from raw transcript text.
///
/// A paragraph is a nonblank line, trimmed. Blank lines separate
/// paragraphs and carry no content of their own, so they are not part of
/// the transcript body.
///
/// # Errors
/// Returns `AppError::Document` when the text contains no paragraphs at
/// all; a transcript with nothing to code is a structural error, the
/// only fatal class in the pipeline.
pub fn extract_paragraphs(text: &str) -> AppResult<Vec<Paragraph>> {
    let paragraphs: Vec<Paragraph> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| Paragraph {
            index,
            text: line.to_string(),
        })
        .collect();

    if paragraphs.is_empty() {
        return Err(AppError::Document(
            "No text found in the transcript".to_string(),
        ));
    }

    Ok(paragraphs)
}

/// One highlight annotation: a byte range of one paragraph claimed by a
/// category. `seq` is the application order, used by the precedence rule
/// when a single-color output must pick one category per character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub paragraph_index: usize,
    pub start: usize,
    pub end: usize,
    pub category: Category,
    seq: usize,
}

/// A contiguous formatting run of one paragraph after annotation
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Run text (a substring of the paragraph)
    pub text: String,

    /// Winning color under the last-applied precedence rule, `None` for
    /// unhighlighted text
    pub shading: Option<Category>,

    /// Every category claiming this run, in application order
    pub categories: Vec<Category>,
}

/// The output artifact: the input paragraphs with highlight annotations
/// layered on top.
#[derive(Debug, Clone)]
pub struct HighlightedDocument {
    paragraphs: Vec<Paragraph>,
    highlights: Vec<Highlight>,
}

impl HighlightedDocument {
    /// Wrap an extracted paragraph sequence with no annotations.
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            highlights: Vec::new(),
        }
    }

    /// The paragraph sequence, in document order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// All annotations, in application order.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// True when no annotation has been applied: the document is
    /// textually and structurally identical to the input.
    pub fn is_unmodified(&self) -> bool {
        self.highlights.is_empty()
    }

    /// Append one highlight annotation.
    ///
    /// Returns `true` when the annotation was recorded. Spans that do not
    /// name an existing paragraph or fall outside its text are skipped
    /// silently; the locator should never produce them, but a bad span
    /// must not corrupt the document or abort the run.
    pub fn annotate(&mut self, span: &LocatedSpan) -> bool {
        let Some(paragraph) = self.paragraphs.get(span.paragraph_index) else {
            tracing::warn!(
                "Dropping span for nonexistent paragraph {}",
                span.paragraph_index
            );
            return false;
        };

        let text = &paragraph.text;
        if span.start >= span.end
            || span.end > text.len()
            || !text.is_char_boundary(span.start)
            || !text.is_char_boundary(span.end)
        {
            tracing::warn!(
                "Dropping invalid span {}..{} in paragraph {}",
                span.start,
                span.end,
                span.paragraph_index
            );
            return false;
        }

        let seq = self.highlights.len();
        self.highlights.push(Highlight {
            paragraph_index: span.paragraph_index,
            start: span.start,
            end: span.end,
            category: span.category,
            seq,
        });
        true
    }

    /// Resolve one paragraph's annotations into contiguous formatting
    /// runs.
    ///
    /// Every category claiming a character is listed in the run's
    /// `categories` (layered model). Where an output format can show only
    /// one color per character, `shading` carries the deterministic
    /// winner: the last-applied annotation (highest `seq`; application
    /// order is chunk order, then response order within a chunk).
    ///
    /// Concatenating the returned run texts reproduces the paragraph
    /// text exactly.
    pub fn runs(&self, paragraph_index: usize) -> Vec<Run> {
        let Some(paragraph) = self.paragraphs.get(paragraph_index) else {
            return Vec::new();
        };
        let text = &paragraph.text;
        if text.is_empty() {
            return Vec::new();
        }

        let spans: Vec<&Highlight> = self
            .highlights
            .iter()
            .filter(|h| h.paragraph_index == paragraph_index)
            .collect();

        if spans.is_empty() {
            return vec![Run {
                text: text.clone(),
                shading: None,
                categories: Vec::new(),
            }];
        }

        // Cut the paragraph at every annotation boundary
        let mut boundaries: Vec<usize> = vec![0, text.len()];
        for span in &spans {
            boundaries.push(span.start);
            boundaries.push(span.end);
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut runs: Vec<Run> = Vec::new();
        for window in boundaries.windows(2) {
            let (start, end) = (window[0], window[1]);

            // Covering annotations, in application order
            let covering: Vec<&Highlight> = spans
                .iter()
                .filter(|h| h.start <= start && h.end >= end)
                .copied()
                .collect();

            let mut categories: Vec<Category> = Vec::new();
            for highlight in &covering {
                if !categories.contains(&highlight.category) {
                    categories.push(highlight.category);
                }
            }

            let shading = covering
                .iter()
                .max_by_key(|h| h.seq)
                .map(|h| h.category);

            // Merge with the previous run when the annotation state is
            // identical
            if let Some(last) = runs.last_mut() {
                if last.shading == shading && last.categories == categories {
                    last.text.push_str(&text[start..end]);
                    continue;
                }
            }

            runs.push(Run {
                text: text[start..end].to_string(),
                shading,
                categories,
            });
        }

        runs
    }
}
