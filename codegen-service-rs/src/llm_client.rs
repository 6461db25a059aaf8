// codegen-service-rs/src/llm_client.rs
//
// HTTP client for the generative backend (OpenAI-compatible chat completions API)
//
// One request/response call per operation. Failures are classified into LLMError
// and handed back to the invoker, which substitutes a fallback template.
//
// Configuration (.env file, read through config-rs):
// - LLM_API_KEY / OPENAI_API_KEY: API key; absent means template-only mode
// - LLM_API_URL: API endpoint URL (defaults to OpenAI chat completions)
// - LLM_MODEL: Model to use (default: gpt-4)
// - LLM_MAX_TOKENS / LLM_TEMPERATURE / LLM_TIMEOUT_SECS

use std::time::Duration;

use async_trait::async_trait;
use config_rs::LlmSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

// Classification of backend failures. None of these reach the API caller;
// they only decide what gets logged before the template fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LLMError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String), // 400, 401, 403, 404
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String), // 429
    #[error("Server error: {0}")]
    ServerError(String), // 500, 502, 503, 504
    #[error("Network error: {0}")]
    NetworkError(String), // connection issues, timeouts
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown error: {0}")]
    UnknownError(String),
}

/// A text-completion backend: one system instruction, one user message, one reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LLMError>;
}

#[derive(Debug, Clone)]
pub struct LLMClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    provider: String,
}

impl LLMClient {
    /// Builds a client from settings; `None` when no API key is configured.
    pub fn from_settings(settings: &LlmSettings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();

        let provider = Self::determine_provider(&settings.api_url, &settings.model);
        log::info!(
            "LLM client initialized for provider {} (model: {})",
            provider,
            settings.model
        );

        Some(Self {
            client,
            api_key,
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            provider,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Determine the LLM provider based on API URL and model
    fn determine_provider(api_url: &str, model: &str) -> String {
        if api_url.contains("openai.com") {
            "openai".to_string()
        } else if api_url.contains("openrouter.ai") {
            "openrouter".to_string()
        } else if api_url.contains("localhost:11434") {
            "ollama".to_string()
        } else if api_url.contains("localhost:1234") {
            "lmstudio".to_string()
        } else if model.starts_with("anthropic/") {
            "anthropic".to_string()
        } else {
            "default".to_string()
        }
    }

    fn build_request(&self, system_prompt: &str, user_message: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_message.to_string(),
                },
            ],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }

    async fn execute_request(&self, request_body: &ChatCompletionRequest) -> Result<String, LLMError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request_body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LLMError::NetworkError(format!("Request timed out: {}", err))
                } else if err.is_connect() {
                    LLMError::NetworkError(format!("Connection failed: {}", err))
                } else {
                    LLMError::NetworkError(format!("Network error: {}", err))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return match status.as_u16() {
                400 => Err(LLMError::InvalidRequest(format!("Bad request: {}", text))),
                401 => Err(LLMError::InvalidRequest(format!("Unauthorized: {}", text))),
                403 => Err(LLMError::InvalidRequest(format!("Forbidden: {}", text))),
                404 => Err(LLMError::InvalidRequest(format!("Not found: {}", text))),
                429 => Err(LLMError::RateLimitExceeded(text)),
                500 | 502 | 503 | 504 => Err(LLMError::ServerError(format!(
                    "Server error ({}): {}",
                    status, text
                ))),
                _ => Err(LLMError::UnknownError(format!(
                    "Unknown error ({}): {}",
                    status, text
                ))),
            };
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| LLMError::ParseError(format!("Failed to parse response: {}", err)))?;

        if let Some(usage) = &data.usage {
            log::info!("LLM request completed. Used {} tokens", usage.total_tokens);
        }

        data.choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::ParseError("No choices returned in response".to_string()))?
            .message
            .content
            .ok_or_else(|| LLMError::ParseError("Empty completion content".to_string()))
    }
}

#[async_trait]
impl CompletionBackend for LLMClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LLMError> {
        let request_body = self.build_request(system_prompt, user_message);
        log::debug!("Preparing LLM request to {} (model: {})", self.api_url, self.model);
        self.execute_request(&request_body).await
    }
}
