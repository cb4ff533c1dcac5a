//! Minimal Gemini client for report generation.
//!
//! We only call `models/{model}:generateContent` with a JSON response schema and
//! return the raw candidate text; validation happens in `report`.
//! Calls are instrumented and log model names, latencies, and token counts (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::ReportError;
use crate::report::ReportModel;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  api_key: Option<String>,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl Gemini {
  /// Build from GEMINI_API_KEY (or API_KEY), GEMINI_BASE_URL and GEMINI_MODEL.
  /// A missing key only warns here; every call then fails with a configuration error.
  pub fn from_env(timeout: Duration) -> Self {
    let api_key = std::env::var("GEMINI_API_KEY")
      .or_else(|_| std::env::var("API_KEY"))
      .ok()
      .filter(|k| !k.trim().is_empty());
    if api_key.is_none() {
      warn!(target: "healthyguide_backend", "GEMINI_API_KEY / API_KEY is missing. Reports will use the fallback.");
    }
    let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
    Self::new(api_key, base_url, model, timeout)
  }

  pub fn new(api_key: Option<String>, base_url: String, model: String, timeout: Duration) -> Self {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .unwrap_or_else(|e| {
        warn!(target: "healthyguide_backend", error = %e, "HTTP client builder failed; using defaults");
        reqwest::Client::new()
      });
    Self { client, api_key, base_url, model, temperature: 0.7 }
  }

  pub fn has_api_key(&self) -> bool {
    self.api_key.is_some()
  }

  fn endpoint(&self) -> String {
    format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
  }
}

#[async_trait]
impl ReportModel for Gemini {
  #[instrument(level = "info", skip(self, prompt, schema), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, ReportError> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or_else(|| ReportError::Configuration("GEMINI_API_KEY / API_KEY not set".into()))?;

    let req = build_request(prompt, schema, self.temperature);
    let start = Instant::now();
    let res = self.client.post(self.endpoint())
      .header(USER_AGENT, "healthyguide-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", api_key)
      .json(&req).send().await?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      return Err(map_http_error(status, &body));
    }

    let body: GenerateContentResponse = res.json().await?;
    if let Some(usage) = &body.usage_metadata {
      info!(
        elapsed = ?start.elapsed(),
        prompt_tokens = ?usage.prompt_token_count,
        completion_tokens = ?usage.candidates_token_count,
        total_tokens = ?usage.total_token_count,
        "Gemini usage"
      );
    }
    Ok(candidate_text(&body))
  }

  fn model_name(&self) -> &str {
    &self.model
  }
}

fn build_request(prompt: &str, schema: &serde_json::Value, temperature: f32) -> GenerateContentRequest {
  GenerateContentRequest {
    contents: vec![Content {
      role: "user".into(),
      parts: vec![PartReq { text: prompt.into() }],
    }],
    generation_config: GenerationConfig {
      response_mime_type: "application/json".into(),
      response_schema: schema.clone(),
      temperature,
    },
  }
}

/// Concatenated text parts of the first candidate; empty when there is none.
fn candidate_text(body: &GenerateContentResponse) -> String {
  body.candidates.first()
    .and_then(|c| c.content.as_ref())
    .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect::<String>())
    .unwrap_or_default()
}

fn map_http_error(status: StatusCode, body: &str) -> ReportError {
  let msg = extract_gemini_error(body).unwrap_or_else(|| body.to_string());
  let auth = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    || msg.contains("API key");
  if auth {
    ReportError::Configuration(format!("Gemini HTTP {}: {}", status, msg))
  } else {
    ReportError::Transport(format!("Gemini HTTP {}: {}", status, msg))
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}
#[derive(Serialize)]
struct Content { role: String, parts: Vec<PartReq> }
#[derive(Serialize)]
struct PartReq { text: String }
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  response_mime_type: String,
  response_schema: serde_json::Value,
  temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate { #[serde(default)] content: Option<ContentResp> }
#[derive(Deserialize)]
struct ContentResp { #[serde(default)] parts: Vec<PartResp> }
#[derive(Deserialize)]
struct PartResp { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_request_body_shape() {
    let schema = json!({"type": "OBJECT"});
    let v = serde_json::to_value(build_request("hello", &schema, 0.7)).unwrap();
    assert_eq!(v["contents"][0]["role"], "user");
    assert_eq!(v["contents"][0]["parts"][0]["text"], "hello");
    assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(v["generationConfig"]["responseSchema"], schema);
  }

  #[test]
  fn test_candidate_text_joins_parts() {
    let body: GenerateContentResponse = serde_json::from_value(json!({
      "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"}],
      "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
    })).unwrap();
    assert_eq!(candidate_text(&body), "{\"a\":1}");
  }

  #[test]
  fn test_candidate_text_empty_without_candidates() {
    let body: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(candidate_text(&body), "");
  }

  #[test]
  fn test_http_error_mapping() {
    let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
    match map_http_error(StatusCode::TOO_MANY_REQUESTS, body) {
      ReportError::Transport(m) => assert!(m.contains("Resource has been exhausted")),
      other => panic!("unexpected {other:?}"),
    }

    let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
    assert_eq!(map_http_error(StatusCode::BAD_REQUEST, body).kind(), "configuration");
    assert_eq!(map_http_error(StatusCode::FORBIDDEN, "nope").kind(), "configuration");
    assert_eq!(map_http_error(StatusCode::BAD_GATEWAY, "<html>").kind(), "transport");
  }

  #[tokio::test]
  async fn test_missing_key_fails_at_call_time() {
    let g = Gemini::new(None, DEFAULT_BASE_URL.into(), DEFAULT_MODEL.into(), Duration::from_secs(1));
    assert!(!g.has_api_key());
    let err = g.generate_json("prompt", &json!({})).await.unwrap_err();
    assert_eq!(err.kind(), "configuration");
  }

  #[test]
  fn test_endpoint_trims_trailing_slash() {
    let g = Gemini::new(Some("k".into()), "http://localhost:9/v1beta/".into(), "m".into(), Duration::from_secs(1));
    assert_eq!(g.endpoint(), "http://localhost:9/v1beta/models/m:generateContent");
  }
}
