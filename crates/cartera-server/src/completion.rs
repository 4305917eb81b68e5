//! Client for an OpenAI-compatible chat-completion endpoint.

use std::time::Duration;

use anyhow::Context as _;
use cartera_context::ChatMessage;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ChatConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
  /// The provider refused the API key.
  #[error("authentication error with chat provider")]
  Authentication,
  #[error("chat provider request failed: {0}")]
  Request(String),
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
  model:       &'a str,
  messages:    &'a [ChatMessage],
  max_tokens:  u32,
  temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
  content: String,
}

/// Async HTTP client for the chat-completion provider.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct CompletionClient {
  client: Client,
  config: ChatConfig,
}

impl CompletionClient {
  pub fn new(config: ChatConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  /// Send `messages` and return the first choice's content.
  pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
    let body = CompletionRequest {
      model:       &self.config.model,
      messages,
      max_tokens:  self.config.max_tokens,
      temperature: self.config.temperature,
    };

    debug!(model = %self.config.model, messages = messages.len(), "sending completion request");

    let resp = self
      .client
      .post(&self.config.api_url)
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| CompletionError::Request(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      let text = resp.text().await.unwrap_or_default();
      warn!(%status, body = %text, "chat provider returned an error");
      if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || is_authentication_error(&text)
      {
        return Err(CompletionError::Authentication);
      }
      return Err(CompletionError::Request(format!("provider returned {status}")));
    }

    let parsed: CompletionResponse = resp
      .json()
      .await
      .map_err(|e| CompletionError::Request(format!("invalid response body: {e}")))?;

    parsed
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or_else(|| CompletionError::Request("no choices in response".to_owned()))
  }
}

/// `{"error": {"type": "authentication_error"}}`
fn is_authentication_error(body: &str) -> bool {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| {
      v.pointer("/error/type")
        .and_then(|t| t.as_str())
        .map(|t| t == "authentication_error")
    })
    .unwrap_or(false)
}
