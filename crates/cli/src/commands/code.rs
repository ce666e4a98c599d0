//! Code command handler.
//!
//! Loads a transcript text file, runs the coding pipeline against the
//! configured provider, and writes the highlighted HTML output. When the
//! run located nothing, the output carries the transcript unmodified;
//! that is the documented fallback, not a failure.

use crate::html;
use clap::Args;
use qualcode_coding::{extract_paragraphs, run_pipeline, PipelineOptions};
use qualcode_core::{config::AppConfig, AppError, AppResult};
use qualcode_llm::create_client;
use std::path::PathBuf;

/// Code a transcript and write the highlighted output
#[derive(Args, Debug)]
pub struct CodeCommand {
    /// Input transcript (UTF-8 text; a paragraph per nonblank line)
    pub input: PathBuf,

    /// Output file (default: input path with .html extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum chunk size in characters
    #[arg(long)]
    pub chunk_budget: Option<usize>,

    /// Minimum similarity (0.0-1.0) for approximate excerpt matches
    #[arg(long)]
    pub min_similarity: Option<f64>,

    /// Print run statistics as JSON to stdout
    #[arg(long)]
    pub json: bool,
}

impl CodeCommand {
    /// Execute the code command.
    pub async fn execute(&self, config: &AppConfig, endpoint: Option<&str>) -> AppResult<()> {
        tracing::info!("Loading transcript from {:?}", self.input);

        let text = std::fs::read_to_string(&self.input)?;
        let paragraphs = extract_paragraphs(&text)?;
        tracing::info!("Extracted {} paragraphs", paragraphs.len());

        if config.model.is_empty() {
            return Err(AppError::Config(
                "No model configured. Set QUALCODE_MODEL or AZURE_OPENAI_DEPLOYMENT, \
                 or pass --model."
                    .to_string(),
            ));
        }

        // Credential problems surface here, before any chunk is sent
        let client = create_client(&config.provider, endpoint)?;

        let mut options = PipelineOptions::new(&config.model);
        if let Some(chunk_budget) = self.chunk_budget {
            options.chunk_budget = chunk_budget;
        }
        if let Some(min_similarity) = self.min_similarity {
            options.min_similarity = min_similarity;
        }

        let outcome = run_pipeline(client.as_ref(), paragraphs, &options).await?;

        if outcome.document.is_unmodified() {
            tracing::info!("No excerpts were returned by the model. Saving original document.");
        }

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("html"));

        let rendered = html::render(&outcome.document);
        std::fs::write(&output_path, rendered)?;
        tracing::info!(
            "Saved coded transcript to {:?} ({} highlight(s))",
            output_path,
            outcome.spans_applied
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome.stats())?);
        }

        Ok(())
    }
}
