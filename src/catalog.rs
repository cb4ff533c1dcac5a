//! Admin-side edits of the question catalog and the hardcoded dashboard numbers.
//!
//! Edits are pure: they take the current catalog and return the next one.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Question, UserResponse};
use crate::error::{AppError, AppResult};

/// Question ids must be unique; the first repeated id is reported.
pub fn ensure_unique_ids(questions: &[Question]) -> AppResult<()> {
  let mut seen = HashSet::new();
  match questions.iter().find(|q| !seen.insert(q.id.as_str())) {
    Some(dup) => Err(AppError::BadRequest(format!("duplicate question id {}", dup.id))),
    None => Ok(()),
  }
}

/// At most one response per question: the last answer wins, kept at the
/// position where that question was first answered.
pub fn dedupe_answers(answers: Vec<UserResponse>) -> Vec<UserResponse> {
  let mut out: Vec<UserResponse> = Vec::with_capacity(answers.len());
  for ans in answers {
    match out.iter_mut().find(|a| a.question_id == ans.question_id) {
      Some(existing) => *existing = ans,
      None => out.push(ans),
    }
  }
  out
}

pub fn update_question_text(questions: &[Question], id: &str, text: &str) -> AppResult<Vec<Question>> {
  let text = text.trim();
  if text.is_empty() {
    return Err(AppError::BadRequest("question text must not be empty".into()));
  }
  if !questions.iter().any(|q| q.id == id) {
    return Err(AppError::NotFound(format!("question {}", id)));
  }
  Ok(questions
    .iter()
    .map(|q| if q.id == id { Question { text: text.to_string(), ..q.clone() } } else { q.clone() })
    .collect())
}

pub fn delete_question(questions: &[Question], id: &str) -> AppResult<Vec<Question>> {
  if !questions.iter().any(|q| q.id == id) {
    return Err(AppError::NotFound(format!("question {}", id)));
  }
  Ok(questions.iter().filter(|q| q.id != id).cloned().collect())
}

/// Dashboard overview. Only `active_questions` is live; the rest are fixed demo numbers.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_assessments: u32,
  pub avg_health_score: u32,
  pub completed: u32,
  pub dropped_off: u32,
  pub active_questions: usize,
}

pub fn dashboard_stats(questions: &[Question]) -> DashboardStats {
  DashboardStats {
    total_assessments: 155,
    avg_health_score: 72,
    completed: 120,
    dropped_off: 35,
    active_questions: questions.len(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Answer;
  use crate::seeds::seed_questions;

  #[test]
  fn test_update_question_text() {
    let qs = seed_questions();
    let next = update_question_text(&qs, "q2", "  Daily water intake?  ").unwrap();
    assert_eq!(next.len(), qs.len());
    assert_eq!(next[1].text, "Daily water intake?");
    assert_eq!(next[1].options, qs[1].options);
    assert_eq!(next[0], qs[0]);
  }

  #[test]
  fn test_update_unknown_or_blank() {
    let qs = seed_questions();
    assert!(matches!(update_question_text(&qs, "zz", "x"), Err(AppError::NotFound(_))));
    assert!(matches!(update_question_text(&qs, "q1", "   "), Err(AppError::BadRequest(_))));
  }

  #[test]
  fn test_delete_question_keeps_order() {
    let qs = seed_questions();
    let next = delete_question(&qs, "q5").unwrap();
    assert_eq!(next.len(), 9);
    assert_eq!(next[4].id, "q6");
    assert!(matches!(delete_question(&next, "q5"), Err(AppError::NotFound(_))));
  }

  #[test]
  fn test_duplicate_ids_rejected() {
    let mut qs = seed_questions();
    assert!(ensure_unique_ids(&qs).is_ok());
    qs[3].id = "q1".into();
    match ensure_unique_ids(&qs) {
      Err(AppError::BadRequest(msg)) => assert!(msg.contains("q1")),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn test_dedupe_answers_keeps_last_in_first_seen_order() {
    let r = |id: &str, v: &str| UserResponse { question_id: id.into(), answer: Answer::from(v) };
    let out = dedupe_answers(vec![r("q2", "<2"), r("q1", "3"), r("q2", ">8"), r("q3", "weekly")]);
    let ids: Vec<_> = out.iter().map(|a| a.question_id.as_str()).collect();
    assert_eq!(ids, vec!["q2", "q1", "q3"]);
    assert_eq!(out[0].answer, Answer::from(">8"));
  }

  #[test]
  fn test_stats_track_catalog_size() {
    let qs = seed_questions();
    let stats = dashboard_stats(&qs[..4]);
    assert_eq!(stats.active_questions, 4);
    assert_eq!(stats.total_assessments, 155);
    assert_eq!(stats.completed + stats.dropped_off, 155);
  }
}
