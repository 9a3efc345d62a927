//! [`GeminiClient`]: a [`TextGenerator`] over the Gemini `generateContent`
//! REST endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, TextGenerator};

fn default_model() -> String { "gemini-3-flash-preview".to_owned() }
fn default_base_url() -> String {
  "https://generativelanguage.googleapis.com".to_owned()
}
fn default_timeout_secs() -> u64 { 60 }

/// Connection settings for the Gemini API, read from the `[gemini]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
  pub api_key:      String,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl GeminiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:      api_key.into(),
      model:        default_model(),
      base_url:     default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Part {
  #[serde(default)]
  text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
  contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
  message: String,
}

impl GenerateRequest {
  fn new(prompt: &str) -> Self {
    Self {
      contents: vec![Content { parts: vec![Part { text: prompt.to_owned() }] }],
    }
  }
}

/// Concatenated text of the first candidate's parts.
fn reply_text(response: GenerateResponse) -> Result<String> {
  let text: String = response
    .candidates
    .into_iter()
    .next()
    .and_then(|c| c.content)
    .map(|c| c.parts.into_iter().map(|p| p.text).collect())
    .unwrap_or_default();

  if text.trim().is_empty() {
    return Err(Error::EmptyResponse);
  }
  Ok(text)
}

/// The API's own error message when the body carries one, else the body.
fn error_message(body: &str) -> String {
  serde_json::from_str::<ErrorBody>(body)
    .map(|b| b.error.message)
    .unwrap_or_else(|_| body.trim().to_owned())
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }
}

impl TextGenerator for GeminiClient {
  async fn generate<'a>(&'a self, prompt: &'a str) -> Result<String> {
    tracing::debug!(model = %self.config.model, "requesting generation");

    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&GenerateRequest::new(prompt))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
          tracing::warn!(error = %e, %status, "failed to read Gemini error body");
          String::new()
        }
      };
      return Err(Error::Api {
        status:  status.as_u16(),
        message: error_message(&body),
      });
    }

    reply_text(resp.json().await?)
  }
}
