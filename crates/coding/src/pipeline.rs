//! Pipeline orchestration.
//!
//! Drives chunking, per-chunk classification, span location, and
//! highlighting, in document order. Chunks are processed strictly
//! sequentially; the only suspension point is the transport call. A
//! failed or malformed chunk contributes zero spans and the run
//! continues; partial success is expected and acceptable. When the
//! whole document produces zero spans, the output is defined to be
//! identical to the input (the documented fallback, not an error).

use crate::chunker::{chunk_paragraphs, DEFAULT_CHUNK_BUDGET};
use crate::document::{HighlightedDocument, Paragraph};
use crate::highlight::apply_spans;
use crate::locate::{locate_in_chunk, DEFAULT_MIN_SIMILARITY};
use crate::parser::parse_response;
use crate::request::build_request;
use qualcode_core::AppResult;
use qualcode_llm::LlmClient;
use serde::{Deserialize, Serialize};

/// Tunable pipeline parameters.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Model identifier passed to the transport
    pub model: String,

    /// Maximum chunk size in characters
    pub chunk_budget: usize,

    /// Minimum similarity for approximate excerpt matches
    pub min_similarity: f64,
}

impl PipelineOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            chunk_budget: DEFAULT_CHUNK_BUDGET,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

/// Aggregate result of one coding run.
#[derive(Debug)]
pub struct CodingOutcome {
    /// The output document (unmodified when `spans_applied` is zero)
    pub document: HighlightedDocument,

    /// Total highlight annotations applied across the document
    pub spans_applied: usize,

    /// Chunks submitted to the model
    pub chunks_processed: usize,

    /// Classification results received (before span location)
    pub results_received: usize,
}

/// Per-run statistics, serializable for the CLI's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingStats {
    pub spans_applied: usize,
    pub chunks_processed: usize,
    pub results_received: usize,
}

impl CodingOutcome {
    pub fn stats(&self) -> CodingStats {
        CodingStats {
            spans_applied: self.spans_applied,
            chunks_processed: self.chunks_processed,
            results_received: self.results_received,
        }
    }
}

/// Run the full coding pipeline over an extracted paragraph sequence.
///
/// For each chunk: build the classification request, call the transport,
/// parse the response, locate each excerpt, and apply the resulting
/// spans in order (chunk order, then response order within a chunk;
/// this ordering is what makes the overlap precedence rule
/// deterministic). Transport and parse failures downgrade the chunk to
/// zero spans with a warning.
pub async fn run_pipeline(
    client: &dyn LlmClient,
    paragraphs: Vec<Paragraph>,
    options: &PipelineOptions,
) -> AppResult<CodingOutcome> {
    let chunks = chunk_paragraphs(&paragraphs, options.chunk_budget);
    let mut document = HighlightedDocument::new(paragraphs);

    if chunks.is_empty() {
        tracing::info!("Empty transcript; nothing to code");
        return Ok(CodingOutcome {
            document,
            spans_applied: 0,
            chunks_processed: 0,
            results_received: 0,
        });
    }

    let mut spans_applied = 0;
    let mut results_received = 0;
    let chunks_processed = chunks.len();

    for (chunk_number, chunk) in chunks.iter().enumerate() {
        tracing::info!(
            "Coding chunk {}/{} ({} characters)",
            chunk_number + 1,
            chunks_processed,
            chunk.char_count
        );

        let request = build_request(chunk, &options.model)?;

        let raw = match client.complete(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                // A failed chunk contributes zero spans; the run continues
                tracing::warn!("Transport failed for chunk {}: {}", chunk_number + 1, e);
                continue;
            }
        };

        let results = parse_response(&raw);
        results_received += results.len();
        tracing::info!("Received {} matches for chunk {}", results.len(), chunk_number + 1);

        for result in &results {
            let spans = locate_in_chunk(result, chunk, options.min_similarity);
            spans_applied += apply_spans(&mut document, &spans);
        }
    }

    if spans_applied == 0 {
        tracing::info!("No excerpts were located; the output document is unmodified");
    } else {
        tracing::info!("Applied {} highlight(s)", spans_applied);
    }

    Ok(CodingOutcome {
        document,
        spans_applied,
        chunks_processed,
        results_received,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;
    use qualcode_core::{AppError, AppResult};
    use qualcode_llm::{LlmRequest, LlmResponse, LlmUsage};
    use std::sync::Mutex;

    /// Scripted transport: returns canned replies per chunk, in order.
    struct MockClient {
        replies: Mutex<Vec<AppResult<String>>>,
    }

    impl MockClient {
        fn new(replies: Vec<AppResult<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for MockClient {
        fn provider_name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(AppError::Llm("mock exhausted".into()));
            }
            replies.remove(0).map(|content| LlmResponse {
                content,
                model: "mock".to_string(),
                usage: LlmUsage::default(),
            })
        }
    }

    fn paragraphs(texts: &[&str]) -> Vec<Paragraph> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Paragraph {
                index,
                text: text.to_string(),
            })
            .collect()
    }

    fn options() -> PipelineOptions {
        PipelineOptions::new("mock-model")
    }

    #[tokio::test]
    async fn test_empty_transcript_short_circuits() {
        let client = MockClient::new(vec![]);
        let outcome = run_pipeline(&client, vec![], &options()).await.unwrap();

        assert_eq!(outcome.chunks_processed, 0);
        assert_eq!(outcome.spans_applied, 0);
        assert!(outcome.document.is_unmodified());
    }

    #[tokio::test]
    async fn test_happy_path_applies_highlights() {
        let input = paragraphs(&[
            "Interviewer: how was the format?",
            "We found the budget too tight for two examiners.",
        ]);
        let client = MockClient::new(vec![Ok(r#"{"matches": [
            {"category": "B", "quotes": ["the budget too tight"]}
        ]}"#
            .to_string())]);

        let outcome = run_pipeline(&client, input, &options()).await.unwrap();

        assert_eq!(outcome.chunks_processed, 1);
        assert_eq!(outcome.results_received, 1);
        assert_eq!(outcome.spans_applied, 1);

        let runs = outcome.document.runs(1);
        let marked = runs.iter().find(|r| r.shading.is_some()).unwrap();
        assert_eq!(marked.text, "the budget too tight");
        assert_eq!(marked.shading, Some(Category::Feasibility));
    }

    #[tokio::test]
    async fn test_text_preserved_across_run() {
        let input = paragraphs(&["first paragraph here", "second paragraph here"]);
        let original: Vec<String> = input.iter().map(|p| p.text.clone()).collect();

        let client = MockClient::new(vec![Ok(r#"{"matches": [
            {"category": "A", "quotes": ["first paragraph"]},
            {"category": "H", "quotes": ["second paragraph here"]}
        ]}"#
            .to_string())]);

        let outcome = run_pipeline(&client, input, &options()).await.unwrap();

        for (index, text) in original.iter().enumerate() {
            let rebuilt: String = outcome
                .document
                .runs(index)
                .iter()
                .map(|r| r.text.as_str())
                .collect();
            assert_eq!(&rebuilt, text);
        }
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_zero_spans() {
        let long = "x".repeat(4000);
        let input = paragraphs(&[&long, "we found the budget too tight"]);

        // First chunk fails at the transport; second succeeds
        let client = MockClient::new(vec![
            Err(AppError::Llm("connection refused".into())),
            Ok(r#"{"matches": [{"category": "B", "quotes": ["budget too tight"]}]}"#.to_string()),
        ]);

        let outcome = run_pipeline(&client, input, &options()).await.unwrap();

        assert_eq!(outcome.chunks_processed, 2);
        assert_eq!(outcome.spans_applied, 1);
    }

    #[tokio::test]
    async fn test_zero_total_spans_means_unmodified_output() {
        let input = paragraphs(&["we only spoke about logistics"]);
        let client = MockClient::new(vec![Ok(
            r#"{"matches": [{"category": "C", "quotes": ["a quote that exists nowhere in this text at all"]}]}"#
                .to_string(),
        )]);

        let outcome = run_pipeline(&client, input, &options()).await.unwrap();

        assert_eq!(outcome.results_received, 1);
        assert_eq!(outcome.spans_applied, 0);
        assert!(outcome.document.is_unmodified());
    }

    #[tokio::test]
    async fn test_malformed_response_continues() {
        let long = "y".repeat(4000);
        let input = paragraphs(&[&long, "scheduling was painful"]);

        let client = MockClient::new(vec![
            Ok("total garbage, not json".to_string()),
            Ok(r#"{"matches": [{"category": "B", "quotes": ["scheduling was painful"]}]}"#
                .to_string()),
        ]);

        let outcome = run_pipeline(&client, input, &options()).await.unwrap();
        assert_eq!(outcome.spans_applied, 1);
    }

    #[tokio::test]
    async fn test_overlap_precedence_is_chunk_then_response_order() {
        let input = paragraphs(&["the oral format felt fair to everyone"]);
        let client = MockClient::new(vec![Ok(r#"{"matches": [
            {"category": "C", "quotes": ["the oral format felt fair"]},
            {"category": "E", "quotes": ["the oral format felt fair"]}
        ]}"#
            .to_string())]);

        let outcome = run_pipeline(&client, input, &options()).await.unwrap();
        assert_eq!(outcome.spans_applied, 2);

        let runs = outcome.document.runs(0);
        let marked = runs.iter().find(|r| !r.categories.is_empty()).unwrap();
        assert_eq!(
            marked.categories,
            vec![Category::Validity, Category::StudentEngagement]
        );
        // Later response entry wins the single-color precedence
        assert_eq!(marked.shading, Some(Category::StudentEngagement));
    }
}
