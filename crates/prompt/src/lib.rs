//! Prompt rendering crate for the qualcode CLI.
//!
//! Prompts are defined as Handlebars templates with named variables and
//! rendered into a system/user message pair ready for LLM execution.
//! Unlike a general prompt library, the templates here are compiled into
//! the binary: the coding taxonomy is a closed set, so there is nothing
//! to load at runtime.

pub mod builder;
pub mod types;

pub use builder::build_prompt;
pub use types::{BuiltPrompt, PromptTemplate};
