//! Prompt types for the qualcode CLI.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt template pair (system + user) with Handlebars placeholders.
/// Templates are compiled into the binary, hence the static strings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptTemplate {
    /// Unique template identifier
    pub id: &'static str,

    /// System message template
    pub system: &'static str,

    /// User message template
    pub user: &'static str,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered system message
    pub system: String,

    /// Rendered user message
    pub user: String,

    /// Template the prompt was rendered from
    pub template_id: String,

    /// Variables used during rendering
    pub variables: HashMap<String, String>,
}
