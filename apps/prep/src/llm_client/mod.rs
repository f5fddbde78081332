//! LLM Client — the single point of entry for all model calls in the prep pipeline.
//!
//! ARCHITECTURAL RULE: pipeline stages never talk to the Anthropic API directly.
//! They go through the `ChatModel` trait; `LlmClient` is the production backend.
//!
//! Every stage runs against the same `MODEL`; it is a constant, not a config knob.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::prompts::structured_output_instruction;
use crate::models::turn::{Role, Turn};

pub mod prompts;
#[cfg(test)]
pub mod scripted;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for every stage.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Response does not match shape `{shape}`: {reason}")]
    Decode { shape: &'static str, reason: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Structured output shapes
// ────────────────────────────────────────────────────────────────────────────

/// One required field of a structured output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Alternate keys accepted in place of `name`.
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl FieldSpec {
    fn present_in(&self, object: &serde_json::Map<String, Value>) -> bool {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .any(|key| object.contains_key(key))
    }
}

/// Target shape for a structured completion: a flat JSON object of string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputShape {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl OutputShape {
    /// Decodes raw model text into a JSON object carrying every field of the shape.
    pub fn decode(&self, text: &str) -> Result<Value, LlmError> {
        let value: Value =
            serde_json::from_str(strip_json_fences(text)).map_err(|e| LlmError::Decode {
                shape: self.name,
                reason: e.to_string(),
            })?;

        let object = value.as_object().ok_or_else(|| LlmError::Decode {
            shape: self.name,
            reason: "expected a JSON object".to_string(),
        })?;

        if let Some(missing) = self.fields.iter().find(|f| !f.present_in(object)) {
            return Err(LlmError::Decode {
                shape: self.name,
                reason: format!("missing field `{}`", missing.name),
            });
        }

        Ok(value)
    }
}

/// What a model call produced: free text, or a value already matching the requested shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Structured(Value),
}

impl Completion {
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Structured(value) => value.to_string(),
        }
    }

    pub fn into_structured(self, shape: &OutputShape) -> Result<Value, LlmError> {
        match self {
            Completion::Structured(value) => Ok(value),
            Completion::Text(text) => shape.decode(&text),
        }
    }
}

/// The generic "invoke the model with these turns" primitive shared by every stage.
///
/// `shape` is a capability flag: `None` asks for free text, `Some` asks for a
/// structured reply and yields `Completion::Structured` or `LlmError::Decode`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        turns: &[Turn],
        shape: Option<&OutputShape>,
    ) -> Result<Completion, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
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
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
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

/// Builds the request body from a turn log.
///
/// System turns are lifted into the `system` field (with the structured-output
/// instruction appended when a shape is requested). Adjacent turns with the same
/// role are merged, since the API rejects consecutive same-role messages. Turn
/// content is sent as given, blank or not; the API's rejection of blank text
/// comes back as `LlmError::Api`.
fn build_request(turns: &[Turn], shape: Option<&OutputShape>) -> AnthropicRequest<'static> {
    let mut system_parts: Vec<String> = turns
        .iter()
        .filter(|t| t.role == Role::System)
        .map(|t| t.content.clone())
        .collect();
    if let Some(shape) = shape {
        system_parts.push(structured_output_instruction(shape));
    }

    let mut messages: Vec<AnthropicMessage> = Vec::new();
    for turn in turns.iter().filter(|t| t.role != Role::System) {
        let role = match turn.role {
            Role::Assistant => "assistant",
            _ => "user",
        };
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&turn.content);
            }
            _ => messages.push(AnthropicMessage {
                role,
                content: turn.content.clone(),
            }),
        }
    }

    AnthropicRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        messages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Anthropic Messages API backend. One request per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(
        &self,
        turns: &[Turn],
        shape: Option<&OutputShape>,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = build_request(turns, shape);

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
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

        Ok(llm_response)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(
        &self,
        turns: &[Turn],
        shape: Option<&OutputShape>,
    ) -> Result<Completion, LlmError> {
        let response = self.call(turns, shape).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;

        match shape {
            Some(shape) => shape.decode(text).map(Completion::Structured),
            None => Ok(Completion::Text(text.to_string())),
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let rest = rest.trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}
