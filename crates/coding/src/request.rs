//! Classification request builder.
//!
//! Turns one chunk plus the fixed taxonomy into the prompt payload for
//! the model transport. The expected response shape is a JSON object:
//!
//! ```json
//! {"matches": [{"category": "A", "quotes": ["verbatim excerpt"]}]}
//! ```
//!
//! The builder only constructs the request; the call itself belongs to
//! the `LlmClient` collaborator.

use crate::chunker::Chunk;
use crate::taxonomy::Category;
use qualcode_core::AppResult;
use qualcode_llm::LlmRequest;
use qualcode_prompt::{build_prompt, PromptTemplate};
use std::collections::HashMap;

/// Classification prompt template. The system message pins the response
/// schema and the verbatim-only rule; the user message carries the chunk.
const CLASSIFY_TEMPLATE: PromptTemplate = PromptTemplate {
    id: "coding.classify",
    system: r#"You are an analyst that codes interview transcripts into the
specified categories. Return JSON following this schema:

{
  "matches": [
    {
      "category": "A",
      "quotes": ["verbatim excerpt"]
    }
  ]
}

Only output text that exists verbatim in the transcript. DO NOT paraphrase or
rewrite any text. Use the categories:

{{taxonomy}}"#,
    user: "Identify exact quotations from this transcript and map them \
to the categories. Only include verbatim matches. Transcript:\n\n{{transcript}}",
};

/// Build the classification request for one chunk.
///
/// Paragraph texts are joined with blank-line separators (`Chunk::text`),
/// temperature is pinned to 0, and JSON mode is requested so the model is
/// constrained to the schema above.
pub fn build_request(chunk: &Chunk, model: &str) -> AppResult<LlmRequest> {
    let mut variables = HashMap::new();
    variables.insert("taxonomy".to_string(), Category::prompt_listing());
    variables.insert("transcript".to_string(), chunk.text());

    let built = build_prompt(&CLASSIFY_TEMPLATE, variables)?;

    Ok(LlmRequest::new(built.user, model)
        .with_system(built.system)
        .with_temperature(0.0)
        .with_json_mode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Paragraph;

    fn test_chunk() -> Chunk {
        let paragraphs = vec![
            Paragraph {
                index: 0,
                text: "We ran the orals in week ten.".to_string(),
            },
            Paragraph {
                index: 1,
                text: "Scheduling was the hardest part.".to_string(),
            },
        ];
        let char_count = paragraphs.iter().map(|p| p.text.len() + 1).sum();
        Chunk {
            paragraphs,
            char_count,
        }
    }

    #[test]
    fn test_request_embeds_chunk_and_taxonomy() {
        let request = build_request(&test_chunk(), "gpt-4o").unwrap();

        assert!(request
            .prompt
            .contains("We ran the orals in week ten.\n\nScheduling was the hardest part."));
        let system = request.system.as_deref().unwrap();
        assert!(system.contains("\"matches\""));
        for category in Category::ALL {
            assert!(system.contains(category.title()));
        }
    }

    #[test]
    fn test_request_settings() {
        let request = build_request(&test_chunk(), "gpt-4o").unwrap();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.json_mode);
    }
}
