//! Prompt builder for rendering templates with variables.

use crate::types::{BuiltPrompt, PromptTemplate};
use handlebars::Handlebars;
use qualcode_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a template and input variables.
///
/// Renders both the system and user templates with the same variable
/// map and returns a `BuiltPrompt` ready for LLM execution.
///
/// # Example
/// ```
/// use qualcode_prompt::{build_prompt, PromptTemplate};
/// use std::collections::HashMap;
///
/// let template = PromptTemplate {
///     id: "test.echo",
///     system: "You answer briefly.",
///     user: "Question: {{prompt}}",
/// };
///
/// let mut vars = HashMap::new();
/// vars.insert("prompt".to_string(), "What is Rust?".to_string());
///
/// let built = build_prompt(&template, vars).unwrap();
/// assert_eq!(built.user, "Question: What is Rust?");
/// ```
pub fn build_prompt(
    template: &PromptTemplate,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", template.id);

    let system = render_template(template.system, &variables)?;
    let user = render_template(template.user, &variables)?;

    Ok(BuiltPrompt {
        system,
        user,
        template_id: template.id.to_string(),
        variables,
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
