//! Highlight application.
//!
//! Applies located spans to the output document as layered annotations.
//! Application is additive and order-preserving: text is never altered,
//! a character can carry several category highlights, and the recorded
//! application order feeds the last-applied precedence rule used when a
//! single color must be chosen per character.

use crate::document::HighlightedDocument;
use crate::locate::LocatedSpan;

/// Apply spans to the document in the given order.
///
/// Returns the number of annotations recorded (invalid spans are skipped
/// by the document and not counted).
pub fn apply_spans(document: &mut HighlightedDocument, spans: &[LocatedSpan]) -> usize {
    let mut applied = 0;
    for span in spans {
        if document.annotate(span) {
            applied += 1;
        }
    }
    applied
}
