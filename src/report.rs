//! Health report generation.
//!
//! Answers are turned into a prompt, sent to the model together with a JSON
//! response schema, and the returned text is decoded and validated into an
//! `AssessmentResult`. Any failure along the way (missing key, transport,
//! timeout, bad response) yields the fixed fallback report instead.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::Prompts;
use crate::domain::{AssessmentResult, Category, HealthTip, Question, UserResponse};
use crate::error::{ReportError, ValidationError};
use crate::seeds::fallback_report;
use crate::util::{fill_template, trunc_for_log};

pub const MIN_TIPS: usize = 3;

/// A model that answers a prompt with JSON text constrained by `schema`.
#[async_trait]
pub trait ReportModel: Send + Sync {
  async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, ReportError>;
  fn model_name(&self) -> &str;
}

#[derive(Clone)]
pub struct ReportGenerator {
  model: Arc<dyn ReportModel>,
  prompts: Prompts,
  timeout: Duration,
}

impl ReportGenerator {
  pub fn new(model: Arc<dyn ReportModel>, prompts: Prompts, timeout: Duration) -> Self {
    Self { model, prompts, timeout }
  }

  /// Always resolves to a usable report: the model's, or the fallback.
  #[instrument(
    level = "info",
    skip(self, questions, answers),
    fields(model = %self.model.model_name(), questions = questions.len(), answers = answers.len())
  )]
  pub async fn generate(&self, questions: &[Question], answers: &[UserResponse]) -> AssessmentResult {
    let report_id = Uuid::new_v4();
    match self.try_generate(questions, answers).await {
      Ok(report) => {
        info!(target: "report", %report_id, score = report.score, tips = report.tips.len(), "Report generated");
        report
      }
      Err(e) => {
        error!(target: "report", %report_id, kind = e.kind(), error = %e, "Report generation failed; serving fallback report");
        fallback_report()
      }
    }
  }

  async fn try_generate(&self, questions: &[Question], answers: &[UserResponse]) -> Result<AssessmentResult, ReportError> {
    let prompt = build_prompt(&self.prompts, questions, answers);
    let schema = response_schema();
    let text = tokio::time::timeout(self.timeout, self.model.generate_json(&prompt, &schema))
      .await
      .map_err(|_| ReportError::Transport(format!("model call timed out after {:?}", self.timeout)))??;
    parse_report(&text).map_err(|e| {
      tracing::debug!(target: "report", response = %trunc_for_log(&text, 200), "Rejected model response");
      ReportError::from(e)
    })
  }
}

/// One "Question: ... Answer: ..." line per answer, in answer order.
/// An unknown question id yields an empty question text.
pub fn build_user_context(questions: &[Question], answers: &[UserResponse]) -> String {
  answers
    .iter()
    .map(|ans| {
      let text = questions
        .iter()
        .find(|q| q.id == ans.question_id)
        .map(|q| q.text.as_str())
        .unwrap_or("");
      format!("Question: {} Answer: {}", text, ans.answer)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn build_prompt(prompts: &Prompts, questions: &[Question], answers: &[UserResponse]) -> String {
  let responses = build_user_context(questions, answers);
  fill_template(&prompts.report_template, &[("responses", &responses)])
}

/// Output schema sent with the request, mirroring `AssessmentResult`.
pub fn response_schema() -> serde_json::Value {
  let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
  json!({
    "type": "OBJECT",
    "properties": {
      "summary": { "type": "STRING" },
      "score": { "type": "INTEGER" },
      "tips": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "category": { "type": "STRING", "enum": categories }
          },
          "required": ["title", "description", "category"]
        }
      }
    },
    "required": ["summary", "score", "tips"]
  })
}

/// Strict decode of the model text. Score must be an integer in 0..=100 and
/// there must be at least three tips with known categories.
pub fn parse_report(text: &str) -> Result<AssessmentResult, ValidationError> {
  #[derive(Deserialize)]
  struct RawReport {
    summary: String,
    score: i64,
    tips: Vec<HealthTip>,
  }

  let text = text.trim();
  if text.is_empty() {
    return Err(ValidationError::EmptyResponse);
  }
  let raw: RawReport = serde_json::from_str(text).map_err(|e| ValidationError::Malformed(e.to_string()))?;

  let score = u8::try_from(raw.score)
    .ok()
    .filter(|s| *s <= 100)
    .ok_or(ValidationError::ScoreOutOfRange(raw.score))?;
  if raw.tips.len() < MIN_TIPS {
    return Err(ValidationError::TooFewTips { got: raw.tips.len() });
  }

  Ok(AssessmentResult { summary: raw.summary, score, tips: raw.tips })
}
