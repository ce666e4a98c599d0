//! Classification response parsing.
//!
//! Normalizes raw model output for one chunk into `(category, excerpt)`
//! pairs. The parser never fails: malformed JSON, missing fields, unknown
//! categories, and empty quotes all degrade to fewer (possibly zero)
//! results so the run can continue with the remaining chunks.

use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One quoted span claimed by the model as belonging to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub excerpt: String,
}

/// Parse raw model output into classification results.
///
/// Accepts a well-formed JSON object matching the requested schema, or,
/// when the model wrapped the object in code fences or prose, the first
/// embedded `{…}` block. Pairs with a category outside the fixed set or
/// a blank excerpt are dropped silently; anything unrecoverable yields an
/// empty list.
pub fn parse_response(raw: &str) -> Vec<ClassificationResult> {
    let Some(value) = parse_json_value(raw) else {
        tracing::warn!("Model response was not parseable JSON; treating as zero results");
        return Vec::new();
    };

    let mut results = Vec::new();

    let Some(matches) = value.get("matches").and_then(Value::as_array) else {
        tracing::warn!("Model response had no 'matches' array; treating as zero results");
        return results;
    };

    for item in matches {
        let Some(category) = item
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::parse)
        else {
            tracing::debug!("Dropping match with unknown or missing category");
            continue;
        };

        for quote in quotes_of(item) {
            let excerpt = quote.trim();
            if excerpt.is_empty() {
                continue;
            }
            results.push(ClassificationResult {
                category,
                excerpt: excerpt.to_string(),
            });
        }
    }

    tracing::debug!("Parsed {} classification results", results.len());
    results
}

/// Collect the quote strings of one match entry. Accepts the schema's
/// `quotes` array and, for lenience, a single-string `quotes` or `quote`
/// field.
fn quotes_of(item: &Value) -> Vec<&str> {
    match item.get("quotes") {
        Some(Value::Array(quotes)) => quotes.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(quote)) => vec![quote.as_str()],
        _ => item
            .get("quote")
            .and_then(Value::as_str)
            .map(|q| vec![q])
            .unwrap_or_default(),
    }
}

/// Parse the raw text as JSON, falling back to the first embedded
/// `{…}` block when the model added fences or surrounding prose.
fn parse_json_value(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<Value>(&trimmed[start..=end])
        .ok()
        .filter(Value::is_object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_response() {
        let raw = r#"{
            "matches": [
                {"category": "A", "quotes": ["the course ran over ten weeks"]},
                {"category": "F", "quotes": ["next time I would book two rooms", "we would start earlier"]}
            ]
        }"#;

        let results = parse_response(raw);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].category, Category::BackgroundContext);
        assert_eq!(results[0].excerpt, "the course ran over ten weeks");
        assert_eq!(results[1].category, Category::Reflection);
        assert_eq!(results[2].excerpt, "we would start earlier");
    }

    #[test]
    fn test_unknown_category_dropped_without_error() {
        let raw = r#"{"matches": [
            {"category": "Z", "quotes": ["should vanish"]},
            {"category": "b", "quotes": ["kept"]}
        ]}"#;

        let results = parse_response(raw);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, Category::Feasibility);
    }

    #[test]
    fn test_blank_excerpts_dropped() {
        let raw = r#"{"matches": [{"category": "C", "quotes": ["", "   ", "  real quote  "]}]}"#;

        let results = parse_response(raw);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].excerpt, "real quote");
    }

    #[test]
    fn test_fenced_json_recovered() {
        let raw = "Here is the coding you asked for:\n```json\n{\"matches\": [{\"category\": \"E\", \"quotes\": [\"students liked it\"]}]}\n```\n";

        let results = parse_response(raw);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, Category::StudentEngagement);
    }

    #[test]
    fn test_single_quote_field_accepted() {
        let raw = r#"{"matches": [{"category": "G", "quote": "we will keep the format"}]}"#;

        let results = parse_response(raw);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].excerpt, "we will keep the format");
    }

    #[test]
    fn test_garbage_never_raises() {
        assert!(parse_response("").is_empty());
        assert!(parse_response("I could not find any quotes.").is_empty());
        assert!(parse_response("[1, 2, 3]").is_empty());
        assert!(parse_response("{\"matches\": \"oops\"}").is_empty());
        assert!(parse_response("{\"matches\": [42]}").is_empty());
        assert!(parse_response("{unbalanced").is_empty());
    }
}
