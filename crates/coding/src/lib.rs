//! Transcript qualitative-coding engine.
//!
//! Takes an interview transcript (an ordered sequence of paragraphs),
//! asks a language model to classify passages into a fixed eight-category
//! taxonomy, locates each returned quotation inside the original text,
//! and layers category-colored highlight annotations over the untouched
//! transcript.
//!
//! The pipeline is strictly one-way:
//!
//! ```text
//! paragraphs -> chunks -> (per chunk) prompt -> raw response
//!            -> parsed (category, excerpt) pairs -> located spans
//!            -> highlighted document
//! ```
//!
//! This crate performs no I/O of its own; loading the transcript,
//! serializing the highlighted output, and the network call to the model
//! all belong to collaborators (`qualcode-llm` for transport, the cli
//! crate for files).

pub mod chunker;
pub mod document;
pub mod highlight;
pub mod locate;
pub mod parser;
pub mod pipeline;
pub mod request;
pub mod taxonomy;

// Re-export commonly used types
pub use chunker::{chunk_paragraphs, Chunk, DEFAULT_CHUNK_BUDGET};
pub use document::{extract_paragraphs, HighlightedDocument, Paragraph, Run};
pub use locate::LocatedSpan;
pub use parser::{parse_response, ClassificationResult};
pub use pipeline::{run_pipeline, CodingOutcome, PipelineOptions};
pub use taxonomy::Category;
