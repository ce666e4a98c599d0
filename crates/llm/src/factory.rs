//! LLM provider factory.
//!
//! This module provides a factory for creating LLM clients based on
//! application configuration. It handles provider resolution and
//! credential loading from the environment.

use crate::client::LlmClient;
use crate::providers::{AzureOpenAiClient, OllamaClient};
use crate::types::ProviderType;
use qualcode_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// This function:
/// 1. Matches the provider string to a known provider type
/// 2. Resolves required secrets from environment variables (Azure)
/// 3. Creates the appropriate client implementation
///
/// # Arguments
/// * `provider` - Provider identifier ("azure", "ollama")
/// * `endpoint` - Optional custom endpoint URL (Ollama only)
///
/// # Returns
/// A shared trait object implementing `LlmClient`
pub fn create_client(provider: &str, endpoint: Option<&str>) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown LLM provider: {}", provider)))?;

    tracing::debug!("Creating LLM client for provider '{}'", provider_type.as_str());

    match provider_type {
        ProviderType::Azure => {
            let client = AzureOpenAiClient::from_env()?;
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
    }
}
