//! LLM Client: the single point of entry for all Claude API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! All LLM interactions MUST go through `StructuredGenerator`.
//!
//! Structured output is obtained by forcing a single tool call whose
//! `input_schema` is the caller's output schema; the tool input is the result.
//!
//! Model: claude-sonnet-4-5 (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM did not call tool '{0}'")]
    MissingToolCall(String),
}

/// One structured-generation call: a prompt, a system instruction, and the
/// JSON schema the answer must conform to.
#[derive(Debug, Clone, Copy)]
pub struct StructuredRequest<'a> {
    pub tool_name: &'a str,
    pub description: &'a str,
    pub schema: &'a Value,
    pub prompt: &'a str,
    pub system: &'a str,
}

/// Produces a JSON object conforming to a caller-supplied schema.
///
/// Carried in `AppState` as `Arc<dyn StructuredGenerator>`.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(&self, request: StructuredRequest<'_>) -> Result<Value, LlmError>;
}

/// Runs `generator` and deserializes its output into `T`.
pub async fn generate_object<T: DeserializeOwned>(
    generator: &dyn StructuredGenerator,
    request: StructuredRequest<'_>,
) -> Result<T, LlmError> {
    let value = generator.generate(request).await?;
    serde_json::from_value(value).map_err(LlmError::Parse)
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<AnthropicTool<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub name: Option<String>,
    pub input: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the input of the first `tool_use` block calling `tool_name`.
    pub fn tool_input(&self, tool_name: &str) -> Option<&Value> {
        self.content
            .iter()
            .filter(|b| b.block_type == "tool_use")
            .find(|b| b.name.as_deref() == Some(tool_name))
            .and_then(|b| b.input.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by the service.
/// Wraps the Anthropic Messages API with retry logic and schema-forced tool calls.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    retry_base_delay: Duration,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, ANTHROPIC_API_URL.to_string())
    }

    /// Points the client at a different Messages endpoint (proxies, tests).
    pub fn with_base_url(api_key: String, api_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key,
            api_url,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    /// First backoff delay; later attempts double it.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Posts a request to the Messages API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn send(&self, request_body: &AnthropicRequest<'_>) -> Result<LlmResponse, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = self.retry_base_delay * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl StructuredGenerator for LlmClient {
    async fn generate(&self, request: StructuredRequest<'_>) -> Result<Value, LlmError> {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
            tools: vec![AnthropicTool {
                name: request.tool_name,
                description: request.description,
                input_schema: request.schema,
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: request.tool_name,
            },
        };

        let response = self.send(&body).await?;
        if response.content.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        response
            .tool_input(request.tool_name)
            .cloned()
            .ok_or_else(|| LlmError::MissingToolCall(request.tool_name.to_string()))
    }
}
