//! HTTP endpoint handlers. These are thin wrappers that forward to state and the report generator.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::catalog::{dashboard_stats, dedupe_answers, ensure_unique_ids};
use crate::domain::AppSettings;
use crate::error::AppResult;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.questions().await)
}

#[instrument(level = "info", skip(state, body), fields(%id, text_len = body.text.len()))]
pub async fn http_put_question(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<QuestionTextIn>,
) -> AppResult<impl IntoResponse> {
  let questions = state.update_question_text(&id, &body.text).await?;
  info!(target: "healthyguide_backend", %id, "Question text updated");
  Ok(Json(questions))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_question(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
  let questions = state.delete_question(&id).await?;
  info!(target: "healthyguide_backend", %id, remaining = questions.len(), "Question deleted");
  Ok(Json(questions))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.settings().await)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_put_settings(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AppSettings>,
) -> impl IntoResponse {
  Json(state.replace_settings(body).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_articles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.articles.clone())
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(dashboard_stats(&state.questions().await))
}

/// Model failures surface as the fallback report, never as an error status.
/// Only a malformed request (a catalog override with repeated ids) is rejected.
#[instrument(level = "info", skip(state, body), fields(answers = body.answers.len(), custom_catalog = body.questions.is_some()))]
pub async fn http_post_report(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ReportIn>,
) -> AppResult<impl IntoResponse> {
  let questions = match body.questions {
    Some(qs) => {
      ensure_unique_ids(&qs)?;
      qs
    }
    None => state.questions().await,
  };
  let answers = dedupe_answers(body.answers);
  let report: ReportOut = state.reports.generate(&questions, &answers).await;
  info!(target: "report", score = report.score, tips = report.tips.len(), "HTTP report served");
  Ok(Json(report))
}
