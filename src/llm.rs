//! Hosted text-generation client for the Google Generative Language API.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ChatError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Seam between the generator and the hosted provider. Kept trait-shaped so
/// the generator can be exercised without a live account.
#[async_trait]
pub trait LlmClient: Send + Sync {
  /// Model names available to the configured account.
  async fn list_models(&self) -> Result<Vec<String>, ChatError>;

  /// One prompt in, the first text completion out.
  async fn complete(&self, model: &str, prompt: &str) -> Result<String, ChatError>;

  fn name(&self) -> &str;
}

pub struct GeminiClient {
  api_key: String,
  base_url: String,
  client: reqwest::Client,
}

impl GeminiClient {
  pub fn new(api_key: &str) -> Self {
    Self { api_key: api_key.to_string(), base_url: GEMINI_BASE_URL.to_string(), client: reqwest::Client::new() }
  }

  /// Masked rendering for status lines, `AIza...ptn8` style.
  pub fn masked_key(&self) -> String {
    mask_key(&self.api_key)
  }
}

pub fn mask_key(key: &str) -> String {
  // Counted in chars, not bytes, so a pasted key with multi-byte characters
  // cannot split a boundary.
  let chars: Vec<char> = key.chars().collect();
  if chars.len() <= 12 {
    return "*".repeat(chars.len());
  }
  let prefix: String = chars[..8].iter().collect();
  let suffix: String = chars[chars.len() - 4..].iter().collect();
  format!("{prefix}...{suffix}")
}

/// Request path segment for a model; names from `list_models` already carry
/// the `models/` prefix, a pinned override usually does not.
pub fn model_path(model: &str) -> String {
  if model.starts_with("models/") {
    model.to_string()
  } else {
    format!("models/{model}")
  }
}

pub fn parse_model_list(json: &Value) -> Result<Vec<String>, ChatError> {
  let models = json
    .pointer("/models")
    .and_then(|v| v.as_array())
    .ok_or_else(|| ChatError::Provider("missing models array in list response".to_string()))?;

  Ok(models.iter().filter_map(|m| m.pointer("/name").and_then(|v| v.as_str()).map(|s| s.to_string())).collect())
}

pub fn parse_completion(json: &Value) -> Result<String, ChatError> {
  json
    .pointer("/candidates/0/content/parts/0/text")
    .and_then(|v| v.as_str())
    .map(|s| s.trim().to_string())
    .ok_or_else(|| ChatError::Provider("missing candidates[0].content.parts[0].text".to_string()))
}

#[async_trait]
impl LlmClient for GeminiClient {
  async fn list_models(&self) -> Result<Vec<String>, ChatError> {
    let url = format!("{}/models?key={}", self.base_url, self.api_key);

    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| ChatError::Provider(format!("gemini: {e}")))?
      .error_for_status()?;

    let json: Value = resp.json().await?;
    parse_model_list(&json)
  }

  async fn complete(&self, model: &str, prompt: &str) -> Result<String, ChatError> {
    let url = format!("{}/{}:generateContent?key={}", self.base_url, model_path(model), self.api_key);

    let body = serde_json::json!({
      "contents": [{"parts": [{"text": prompt}]}]
    });

    let resp = self
      .client
      .post(&url)
      .json(&body)
      .send()
      .await
      .map_err(|e| ChatError::Provider(format!("gemini: {e}")))?
      .error_for_status()?;

    let json: Value = resp.json().await?;
    parse_completion(&json)
  }

  fn name(&self) -> &str {
    "gemini"
  }
}
