//! Assessment session as an explicit state machine.
//!
//! `reduce` is pure: it takes the current state and an event and returns the
//! next state plus, at most, one effect for the caller to run (report generation).
//! The question list is snapshotted when the assessment starts and stays fixed
//! for the rest of that run.

use serde::Serialize;

use crate::domain::{Answer, AssessmentResult, Question, UserResponse, View};
use crate::error::{AppError, AppResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
  pub view: View,
  pub questions: Vec<Question>,
  pub current_index: usize,
  pub answers: Vec<UserResponse>,
  pub results: Option<AssessmentResult>,
  pub is_generating: bool,
}

#[derive(Clone, Debug)]
pub enum SessionEvent {
  Navigate(View),
  /// Also used for "retake": results are cleared and progress restarts.
  StartAssessment { questions: Vec<Question> },
  Answer(Answer),
  Back,
  Cancel,
  ReportReady(AssessmentResult),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
  GenerateReport { questions: Vec<Question>, answers: Vec<UserResponse> },
}

#[derive(Debug)]
pub struct Transition {
  pub state: SessionState,
  pub effect: Option<Effect>,
}

impl Transition {
  fn to(state: SessionState) -> Self { Self { state, effect: None } }
}

pub fn reduce(state: &SessionState, event: SessionEvent) -> AppResult<Transition> {
  match event {
    SessionEvent::Navigate(View::Assessment) => {
      Err(AppError::BadRequest("use start_assessment to begin an assessment".into()))
    }
    SessionEvent::Navigate(view) => {
      let mut next = state.clone();
      if state.view == View::Assessment {
        next.current_index = 0;
        next.answers.clear();
      }
      next.view = view;
      Ok(Transition::to(next))
    }

    SessionEvent::StartAssessment { questions } => {
      if questions.is_empty() {
        return Err(AppError::BadRequest("the question catalog is empty".into()));
      }
      Ok(Transition::to(SessionState {
        view: View::Assessment,
        questions,
        current_index: 0,
        answers: vec![],
        results: None,
        is_generating: false,
      }))
    }

    SessionEvent::Answer(value) => {
      let question = match (state.view, state.questions.get(state.current_index)) {
        (View::Assessment, Some(q)) => q,
        _ => return Err(AppError::BadRequest("no assessment in progress".into())),
      };
      let mut next = state.clone();
      let response = UserResponse { question_id: question.id.clone(), answer: value };
      match next.answers.iter_mut().find(|a| a.question_id == question.id) {
        Some(existing) => *existing = response,
        None => next.answers.push(response),
      }

      if state.current_index + 1 < state.questions.len() {
        next.current_index += 1;
        return Ok(Transition::to(next));
      }

      next.view = View::Results;
      next.is_generating = true;
      next.results = None;
      let effect = Effect::GenerateReport { questions: next.questions.clone(), answers: next.answers.clone() };
      Ok(Transition { state: next, effect: Some(effect) })
    }

    SessionEvent::Back => {
      if state.view != View::Assessment {
        return Err(AppError::BadRequest("no assessment in progress".into()));
      }
      let mut next = state.clone();
      next.current_index = state.current_index.saturating_sub(1);
      Ok(Transition::to(next))
    }

    SessionEvent::Cancel => {
      let mut next = state.clone();
      next.view = View::Welcome;
      next.current_index = 0;
      next.answers.clear();
      Ok(Transition::to(next))
    }

    SessionEvent::ReportReady(result) => {
      let mut next = state.clone();
      next.results = Some(result);
      next.is_generating = false;
      Ok(Transition::to(next))
    }
  }
}

/// What the client renders for the current state.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
  pub view: View,
  pub current_question: Option<Question>,
  pub question_number: usize,
  pub total_questions: usize,
  pub progress_percent: u32,
  pub answers: Vec<UserResponse>,
  pub results: Option<AssessmentResult>,
  pub is_generating: bool,
}

impl SessionState {
  pub fn snapshot(&self) -> SessionSnapshot {
    let total = self.questions.len();
    let in_assessment = self.view == View::Assessment && total > 0;
    SessionSnapshot {
      view: self.view,
      current_question: if in_assessment { self.questions.get(self.current_index).cloned() } else { None },
      question_number: if in_assessment { self.current_index + 1 } else { 0 },
      total_questions: total,
      progress_percent: if in_assessment { progress_percent(self.current_index, total) } else { 0 },
      answers: self.answers.clone(),
      results: self.results.clone(),
      is_generating: self.is_generating,
    }
  }
}

fn progress_percent(index: usize, total: usize) -> u32 {
  (((index + 1) as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::{fallback_report, seed_questions};

  fn started() -> SessionState {
    reduce(&SessionState::default(), SessionEvent::StartAssessment { questions: seed_questions() })
      .unwrap()
      .state
  }

  fn answer(state: &SessionState, v: &str) -> Transition {
    reduce(state, SessionEvent::Answer(Answer::from(v))).unwrap()
  }

  #[test]
  fn test_start_resets_progress() {
    let s = started();
    assert_eq!(s.view, View::Assessment);
    assert_eq!(s.current_index, 0);
    assert!(s.answers.is_empty());
    let snap = s.snapshot();
    assert_eq!(snap.question_number, 1);
    assert_eq!(snap.progress_percent, 10);
    assert_eq!(snap.current_question.map(|q| q.id), Some("q1".to_string()));
  }

  #[test]
  fn test_start_with_empty_catalog_rejected() {
    let err = reduce(&SessionState::default(), SessionEvent::StartAssessment { questions: vec![] });
    assert!(err.is_err());
  }

  #[test]
  fn test_answering_all_questions_emits_generation() {
    let mut s = started();
    for i in 0..9 {
      let t = answer(&s, "x");
      assert!(t.effect.is_none(), "effect emitted early at {i}");
      s = t.state;
    }
    let t = answer(&s, "good");
    assert_eq!(t.state.view, View::Results);
    assert!(t.state.is_generating);
    match t.effect {
      Some(Effect::GenerateReport { questions, answers }) => {
        assert_eq!(questions.len(), 10);
        assert_eq!(answers.len(), 10);
        assert_eq!(answers[9].question_id, "q10");
        assert_eq!(answers[9].answer, Answer::from("good"));
      }
      None => panic!("expected report generation"),
    }

    let done = reduce(&t.state, SessionEvent::ReportReady(fallback_report())).unwrap().state;
    assert!(!done.is_generating);
    assert_eq!(done.results, Some(fallback_report()));
  }

  #[test]
  fn test_back_then_reanswer_replaces_in_place() {
    let s = answer(&started(), "1-2").state;
    let s = answer(&s, "<2").state;
    let s = reduce(&s, SessionEvent::Back).unwrap().state;
    let s = reduce(&s, SessionEvent::Back).unwrap().state;
    assert_eq!(s.current_index, 0);
    let s = reduce(&s, SessionEvent::Back).unwrap().state;
    assert_eq!(s.current_index, 0);

    let s = answer(&s, "3").state;
    assert_eq!(s.answers.len(), 2);
    assert_eq!(s.answers[0].question_id, "q1");
    assert_eq!(s.answers[0].answer, Answer::from("3"));
    assert_eq!(s.current_index, 1);
  }

  #[test]
  fn test_cancel_and_navigate_discard_progress() {
    let s = answer(&started(), "3").state;
    let c = reduce(&s, SessionEvent::Cancel).unwrap().state;
    assert_eq!(c.view, View::Welcome);
    assert!(c.answers.is_empty());

    let n = reduce(&s, SessionEvent::Navigate(View::Articles)).unwrap().state;
    assert_eq!(n.view, View::Articles);
    assert!(n.answers.is_empty());
    assert_eq!(n.snapshot().current_question, None);
  }

  #[test]
  fn test_invalid_events() {
    let idle = SessionState::default();
    assert!(reduce(&idle, SessionEvent::Answer(Answer::from("x"))).is_err());
    assert!(reduce(&idle, SessionEvent::Back).is_err());
    assert!(reduce(&idle, SessionEvent::Navigate(View::Assessment)).is_err());
  }

  #[test]
  fn test_retake_clears_results() {
    let mut s = started();
    s.view = View::Results;
    s.results = Some(fallback_report());
    let r = reduce(&s, SessionEvent::StartAssessment { questions: seed_questions() }).unwrap().state;
    assert_eq!(r.results, None);
    assert_eq!(r.view, View::Assessment);
  }

  #[test]
  fn test_progress_percent_rounds() {
    assert_eq!(progress_percent(0, 3), 33);
    assert_eq!(progress_percent(1, 3), 67);
    assert_eq!(progress_percent(2, 3), 100);
  }
}
