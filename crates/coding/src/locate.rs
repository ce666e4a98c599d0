//! Span location: mapping model-quoted excerpts back onto exact character
//! ranges of the original transcript.
//!
//! Model quotes drift from the source in small ways (straightened quotes,
//! collapsed whitespace, a dropped period), so matching happens in a
//! normalized space: both excerpt and candidate text are normalized, the
//! match is found there, and the matched window is mapped back through a
//! per-character position table onto the un-normalized original. The
//! returned offsets always index the original bytes; no punctuation or
//! whitespace is ever invented.
//!
//! Strategy per excerpt, cheapest first:
//! 1. exact substring match of the normalized excerpt in each paragraph,
//! 2. approximate match (substring edit distance with free ends in the
//!    haystack) above a similarity threshold,
//! 3. the same two steps against consecutive paragraph pairs, for the
//!    rare excerpt the model stitched across a boundary.
//!
//! An excerpt that matches nowhere is dropped silently; a quoting error
//! by the model is a recoverable condition, never a run failure.

use crate::chunker::Chunk;
use crate::parser::ClassificationResult;
use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default minimum similarity (`1 - edits / excerpt_chars`) for an
/// approximate match to be accepted.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.85;

/// An excerpt matched to source text: the exact byte range to highlight
/// in one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedSpan {
    pub paragraph_index: usize,
    /// Byte offset into the paragraph's original text (char boundary)
    pub start: usize,
    /// Exclusive end byte offset (char boundary)
    pub end: usize,
    pub category: Category,
}

/// Text normalized for comparison, with a per-character table mapping
/// each normalized char back to its byte range in the original.
struct Normalized {
    chars: Vec<char>,
    /// `spans[i]` is the original byte range that produced `chars[i]`
    spans: Vec<(usize, usize)>,
}

impl Normalized {
    /// Normalize: collapse whitespace runs to one space, straighten curly
    /// quotes, unify dashes, lowercase. Leading and trailing whitespace
    /// is dropped.
    fn new(source: &str) -> Self {
        let mut chars = Vec::new();
        let mut spans = Vec::new();
        let mut pending_ws: Option<(usize, usize)> = None;

        for (byte, c) in source.char_indices() {
            let end = byte + c.len_utf8();
            if c.is_whitespace() {
                pending_ws = match pending_ws {
                    Some((start, _)) => Some((start, end)),
                    None => Some((byte, end)),
                };
                continue;
            }

            // Emit one space per run, but never at the start
            if let Some(ws) = pending_ws.take() {
                if !chars.is_empty() {
                    chars.push(' ');
                    spans.push(ws);
                }
            }

            let folded = fold_char(c);
            for lowered in folded.to_lowercase() {
                chars.push(lowered);
                spans.push((byte, end));
            }
        }

        Self { chars, spans }
    }

    /// Map a normalized char window back to original byte offsets,
    /// trimming whitespace at the window's edges so the returned range
    /// covers matched content only.
    fn byte_range(&self, mut start: usize, mut end: usize) -> Option<Range<usize>> {
        while start < end && self.chars[start] == ' ' {
            start += 1;
        }
        while end > start && self.chars[end - 1] == ' ' {
            end -= 1;
        }
        if start >= end {
            return None;
        }
        Some(self.spans[start].0..self.spans[end - 1].1)
    }
}

/// Fold typographic variants that models routinely rewrite.
fn fold_char(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => '"',
        '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
        _ => c,
    }
}

/// Exact subslice search; returns the start index of the first match.
fn find_subslice(hay: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| &hay[i..i + needle.len()] == needle)
}

/// Approximate substring search: the best window of `hay` whose edit
/// distance to `needle` is minimal, with deletions before and after the
/// window free. Returns `(window_start, window_end, distance)` in char
/// indices.
///
/// Standard sellers-style dynamic programming: the first row is zero
/// (a match may start anywhere), the answer is the minimum of the last
/// row (it may end anywhere), and a parallel table carries each cell's
/// window start so the match can be reported, not just scored.
fn fuzzy_find(needle: &[char], hay: &[char]) -> Option<(usize, usize, usize)> {
    let m = needle.len();
    let n = hay.len();
    if m == 0 || n == 0 {
        return None;
    }

    let mut prev_cost: Vec<usize> = vec![0; n + 1];
    let mut prev_start: Vec<usize> = (0..=n).collect();

    for i in 1..=m {
        let mut cost = vec![0usize; n + 1];
        let mut start = vec![0usize; n + 1];
        cost[0] = i;
        start[0] = 0;

        for j in 1..=n {
            let substitute = prev_cost[j - 1] + usize::from(needle[i - 1] != hay[j - 1]);
            let skip_needle = prev_cost[j] + 1;
            let skip_hay = cost[j - 1] + 1;

            if substitute <= skip_needle && substitute <= skip_hay {
                cost[j] = substitute;
                start[j] = prev_start[j - 1];
            } else if skip_needle <= skip_hay {
                cost[j] = skip_needle;
                start[j] = prev_start[j];
            } else {
                cost[j] = skip_hay;
                start[j] = start[j - 1];
            }
        }

        prev_cost = cost;
        prev_start = start;
    }

    let (best_end, best_cost) = (1..=n)
        .map(|j| (j, prev_cost[j]))
        .min_by_key(|&(j, c)| (c, j))?;

    Some((prev_start[best_end], best_end, best_cost))
}

/// Locate an excerpt in one text by exact normalized substring search.
fn locate_exact(excerpt: &str, text: &str) -> Option<Range<usize>> {
    let needle = Normalized::new(excerpt);
    if needle.chars.is_empty() {
        return None;
    }
    let hay = Normalized::new(text);
    if hay.chars.is_empty() {
        return None;
    }

    let start = find_subslice(&hay.chars, &needle.chars)?;
    hay.byte_range(start, start + needle.chars.len())
}

/// Locate an excerpt in one text by approximate matching only. Returns
/// `None` when the best window falls below `min_similarity`.
fn locate_approx(excerpt: &str, text: &str, min_similarity: f64) -> Option<Range<usize>> {
    let needle = Normalized::new(excerpt);
    if needle.chars.is_empty() {
        return None;
    }
    let hay = Normalized::new(text);
    if hay.chars.is_empty() {
        return None;
    }

    let (start, end, distance) = fuzzy_find(&needle.chars, &hay.chars)?;
    let similarity = 1.0 - distance as f64 / needle.chars.len() as f64;
    if similarity < min_similarity {
        tracing::debug!(
            "Best window similarity {:.3} below threshold {:.2}; excerpt unmatched",
            similarity,
            min_similarity
        );
        return None;
    }

    hay.byte_range(start, end)
}

/// Locate one excerpt inside one paragraph.
///
/// Pure function: returns the byte range of the matched substring in the
/// *original* (un-normalized) paragraph text, or `None` when no window
/// reaches `min_similarity`.
pub fn locate(excerpt: &str, paragraph_text: &str, min_similarity: f64) -> Option<Range<usize>> {
    locate_exact(excerpt, paragraph_text)
        .or_else(|| locate_approx(excerpt, paragraph_text, min_similarity))
}

/// Locate one classification result inside a chunk's paragraphs.
///
/// The match phases are ordered globally across the chunk: first an
/// exact normalized substring pass over every paragraph in order, and
/// only when the excerpt occurs nowhere verbatim does an approximate
/// pass run. A verbatim occurrence in a late paragraph therefore always
/// beats a near-miss in an early one. After both passes, consecutive
/// paragraph pairs are tried (same phase order) for excerpts the model
/// stitched across a boundary; a pair match is split at the boundary
/// into up to two spans. An unmatched excerpt yields an empty vec,
/// silently.
pub fn locate_in_chunk(
    result: &ClassificationResult,
    chunk: &Chunk,
    min_similarity: f64,
) -> Vec<LocatedSpan> {
    // Exact pass over the whole chunk first
    for paragraph in &chunk.paragraphs {
        if let Some(range) = locate_exact(&result.excerpt, &paragraph.text) {
            return vec![LocatedSpan {
                paragraph_index: paragraph.index,
                start: range.start,
                end: range.end,
                category: result.category,
            }];
        }
    }

    // Approximate pass only once no paragraph holds the excerpt verbatim
    for paragraph in &chunk.paragraphs {
        if let Some(range) = locate_approx(&result.excerpt, &paragraph.text, min_similarity) {
            return vec![LocatedSpan {
                paragraph_index: paragraph.index,
                start: range.start,
                end: range.end,
                category: result.category,
            }];
        }
    }

    // Paragraph-boundary fallback: match against consecutive pairs,
    // again exact before approximate
    for exact_phase in [true, false] {
        for pair in chunk.paragraphs.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            let combined = format!("{}\n{}", first.text, second.text);
            let range = if exact_phase {
                locate_exact(&result.excerpt, &combined)
            } else {
                locate_approx(&result.excerpt, &combined, min_similarity)
            };
            let Some(range) = range else {
                continue;
            };

            let spans = split_pair_span(first, second, &range, result.category);
            if !spans.is_empty() {
                return spans;
            }
        }
    }

    tracing::debug!(
        "Excerpt for category {} not found in chunk; dropping",
        result.category.code()
    );
    Vec::new()
}

/// Split a range matched against `"{first}\n{second}"` at the paragraph
/// boundary, yielding up to two per-paragraph spans.
fn split_pair_span(
    first: &crate::document::Paragraph,
    second: &crate::document::Paragraph,
    range: &Range<usize>,
    category: Category,
) -> Vec<LocatedSpan> {
    let boundary = first.text.len();
    let mut spans = Vec::new();

    if range.start < boundary {
        spans.push(LocatedSpan {
            paragraph_index: first.index,
            start: range.start,
            end: range.end.min(boundary),
            category,
        });
    }
    if range.end > boundary + 1 {
        spans.push(LocatedSpan {
            paragraph_index: second.index,
            start: range.start.saturating_sub(boundary + 1),
            end: range.end - (boundary + 1),
            category,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Paragraph;

    fn chunk_of(texts: &[&str]) -> Chunk {
        let paragraphs: Vec<Paragraph> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| Paragraph {
                index,
                text: text.to_string(),
            })
            .collect();
        let char_count = paragraphs.iter().map(|p| p.text.len() + 1).sum();
        Chunk {
            paragraphs,
            char_count,
        }
    }

    fn result(category: Category, excerpt: &str) -> ClassificationResult {
        ClassificationResult {
            category,
            excerpt: excerpt.to_string(),
        }
    }

    #[test]
    fn test_exact_match_offsets() {
        let paragraph = "In the end we found the budget too tight for two examiners.";
        let range = locate("we found the budget too tight", paragraph, 0.85).unwrap();

        assert_eq!(&paragraph[range], "we found the budget too tight");
    }

    #[test]
    fn test_approximate_match_absorbs_drift() {
        // Double space and trailing period in the excerpt, neither in the
        // source; the returned range covers only the original substring
        let paragraph = "Overall we found the budget too tight";
        let range = locate("we found the  budget too tight.", paragraph, 0.85).unwrap();

        assert_eq!(&paragraph[range], "we found the budget too tight");
    }

    #[test]
    fn test_case_and_quote_folding() {
        let paragraph = "She said \u{201C}It wasn\u{2019}t fair\u{201D} afterwards.";
        let range = locate("\"it wasn't fair\"", paragraph, 0.85).unwrap();

        assert_eq!(&paragraph[range], "\u{201C}It wasn\u{2019}t fair\u{201D}");
    }

    #[test]
    fn test_below_threshold_is_no_match() {
        let paragraph = "We spoke mostly about scheduling conflicts.";
        assert!(locate("the grading rubric needed work", paragraph, 0.85).is_none());
    }

    #[test]
    fn test_empty_excerpt_is_no_match() {
        assert!(locate("", "some paragraph", 0.85).is_none());
        assert!(locate("   ", "some paragraph", 0.85).is_none());
    }

    #[test]
    fn test_locate_in_chunk_finds_right_paragraph() {
        let chunk = chunk_of(&[
            "Interviewer: how did it go?",
            "It went well overall.",
            "Honestly we found the budget too tight this term.",
            "But the students were happy.",
        ]);

        let spans = locate_in_chunk(
            &result(Category::Feasibility, "we found the budget too tight"),
            &chunk,
            0.85,
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].paragraph_index, 2);
        let text = &chunk.paragraphs[2].text;
        assert_eq!(&text[spans[0].start..spans[0].end], "we found the budget too tight");
    }

    #[test]
    fn test_verbatim_match_in_later_paragraph_beats_earlier_near_miss() {
        // "right" in paragraph 0 is one edit from "tight"; the verbatim
        // occurrence in paragraph 1 must still win
        let chunk = chunk_of(&[
            "sadly the budget was right",
            "honestly the budget was tight this year",
        ]);

        let spans = locate_in_chunk(
            &result(Category::Feasibility, "the budget was tight"),
            &chunk,
            0.85,
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].paragraph_index, 1);
        let text = &chunk.paragraphs[1].text;
        assert_eq!(&text[spans[0].start..spans[0].end], "the budget was tight");
    }

    #[test]
    fn test_pair_fallback_splits_at_boundary() {
        let chunk = chunk_of(&["the exam ran long", "and students got tired"]);

        let spans = locate_in_chunk(
            &result(Category::StudentEngagement, "ran long and students got"),
            &chunk,
            0.85,
        );

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].paragraph_index, 0);
        assert_eq!(
            &chunk.paragraphs[0].text[spans[0].start..spans[0].end],
            "ran long"
        );
        assert_eq!(spans[1].paragraph_index, 1);
        assert_eq!(
            &chunk.paragraphs[1].text[spans[1].start..spans[1].end],
            "and students got"
        );
    }

    #[test]
    fn test_unmatched_excerpt_yields_no_spans() {
        let chunk = chunk_of(&["we talked about scheduling"]);
        let spans = locate_in_chunk(
            &result(Category::Validity, "completely unrelated hallucinated text"),
            &chunk,
            0.85,
        );
        assert!(spans.is_empty());
    }

    #[test]
    fn test_fuzzy_find_exact_window() {
        let needle: Vec<char> = "budget".chars().collect();
        let hay: Vec<char> = "the budget was tight".chars().collect();

        let (start, end, dist) = fuzzy_find(&needle, &hay).unwrap();
        assert_eq!(dist, 0);
        assert_eq!(hay[start..end].iter().collect::<String>(), "budget");
    }

    #[test]
    fn test_fuzzy_find_one_edit() {
        let needle: Vec<char> = "budgets".chars().collect();
        let hay: Vec<char> = "we found the budget tight".chars().collect();

        let (_, _, dist) = fuzzy_find(&needle, &hay).unwrap();
        assert_eq!(dist, 1);
    }

    #[test]
    fn test_normalization_mapping_multibyte() {
        // Curly apostrophe (3 bytes) before the match must not skew the
        // returned byte offsets
        let paragraph = "It\u{2019}s fine \u{2014} the budget held up";
        let range = locate("the budget held up", paragraph, 0.85).unwrap();
        assert_eq!(&paragraph[range], "the budget held up");
    }
}
