//! Azure OpenAI provider implementation.
//!
//! Calls a chat-completions deployment:
//! `POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}`
//! with the API key in the `api-key` header. When the request asks for
//! JSON mode, `response_format: {"type": "json_object"}` is sent so the
//! model is constrained to a single JSON object.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use qualcode_core::{AppError, AppResult, AzureConfig};
use serde::{Deserialize, Serialize};

/// One chat message in the Azure/OpenAI wire format.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Azure chat-completions request body.
#[derive(Debug, Serialize)]
struct AzureRequest {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Azure chat-completions response body (the fields we consume).
#[derive(Debug, Deserialize)]
struct AzureResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<AzureChoice>,
    #[serde(default)]
    usage: Option<AzureUsage>,
}

#[derive(Debug, Deserialize)]
struct AzureChoice {
    message: AzureMessage,
}

#[derive(Debug, Deserialize)]
struct AzureMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Azure OpenAI LLM client.
pub struct AzureOpenAiClient {
    config: AzureConfig,
    client: reqwest::Client,
}

impl AzureOpenAiClient {
    /// Create a client from resolved Azure settings.
    pub fn new(config: AzureConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with settings from the environment.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self::new(AzureConfig::from_env()?))
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint, self.config.deployment, self.config.api_version
        )
    }

    /// Convert LlmRequest to the Azure wire format.
    fn to_azure_request(&self, request: &LlmRequest) -> AzureRequest {
        let mut messages = Vec::new();
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        AzureRequest {
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }

    /// Convert the Azure response to LlmResponse.
    fn convert_response(
        &self,
        request: &LlmRequest,
        response: AzureResponse,
    ) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Llm("Azure response contained no message content".into()))?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model.unwrap_or_else(|| request.model.clone()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for AzureOpenAiClient {
    fn provider_name(&self) -> &str {
        "azure"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            "Sending completion request to Azure OpenAI deployment '{}'",
            self.config.deployment
        );

        let azure_request = self.to_azure_request(request);
        let url = self.completions_url();

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&azure_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Azure OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Azure OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let azure_response: AzureResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Azure OpenAI response: {}", e)))?;

        tracing::info!("Received completion from Azure OpenAI");

        self.convert_response(request, azure_response)
    }
}
