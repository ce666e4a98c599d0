//! LLM integration crate for the qualcode CLI.
//!
//! This crate provides a provider-agnostic abstraction for the single
//! operation the coding pipeline needs: send one prompt, get one
//! completion back. It supports multiple providers through a unified
//! trait-based interface.
//!
//! # Providers
//! - **Azure OpenAI**: chat-completions deployment (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use qualcode_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{AzureOpenAiClient, OllamaClient};
pub use types::ProviderType;
