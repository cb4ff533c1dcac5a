//! Domain models: questions, answers, the generated report, branding settings and articles.
//!
//! Wire names are camelCase to match what the SPA sends and renders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification shared by questions and tips.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Diet,
  Activity,
  Lifestyle,
}

impl Category {
  pub const ALL: [Category; 3] = [Category::Diet, Category::Activity, Category::Lifestyle];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Diet => "diet",
      Category::Activity => "activity",
      Category::Lifestyle => "lifestyle",
    }
  }
}

/// How the question is answered in the UI.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
  SingleChoice,
  Text,
  Rating,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
  pub id: String,
  pub label: String,
  /// Canonical answer token sent back as the answer.
  pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
  pub id: String,
  pub text: String,
  #[serde(rename = "type")]
  pub kind: QuestionType,
  pub category: Category,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<AnswerOption>,
}

/// An answer is either a choice token / free text, or a number (ratings).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Answer {
  Text(String),
  Number(serde_json::Number),
}

impl fmt::Display for Answer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Answer::Text(s) => f.write_str(s),
      Answer::Number(n) => write!(f, "{}", n),
    }
  }
}

impl From<&str> for Answer {
  fn from(s: &str) -> Self { Answer::Text(s.to_string()) }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
  pub question_id: String,
  pub answer: Answer,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthTip {
  pub title: String,
  pub description: String,
  pub category: Category,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon: Option<String>,
}

/// Final report handed to the UI. Score is already range-checked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssessmentResult {
  pub summary: String,
  pub score: u8,
  pub tips: Vec<HealthTip>,
}

/// Cosmetic branding edited from the admin screen.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
  pub app_name: String,
  pub primary_color: String,
  pub secondary_color: String,
  pub logo_text: String,
  pub welcome_title: String,
  pub welcome_subtitle: String,
  pub dark_mode: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  pub id: String,
  pub title: String,
  pub summary: String,
  pub image_url: String,
  pub date: String,
}

/// Screens of the SPA.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
  #[default]
  Welcome,
  Assessment,
  Results,
  History,
  Settings,
  Admin,
  Articles,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_answer_accepts_string_or_number() {
    let r: UserResponse = serde_json::from_str(r#"{"questionId":"q1","answer":"3+"}"#).unwrap();
    assert_eq!(r.answer.to_string(), "3+");

    let r: UserResponse = serde_json::from_str(r#"{"questionId":"q2","answer":4}"#).unwrap();
    assert_eq!(r.answer.to_string(), "4");

    let r: UserResponse = serde_json::from_str(r#"{"questionId":"q3","answer":4.5}"#).unwrap();
    assert_eq!(r.answer.to_string(), "4.5");
  }

  #[test]
  fn test_question_wire_shape() {
    let q: Question = serde_json::from_str(
      r#"{"id":"q9","text":"Notes?","type":"text","category":"lifestyle"}"#,
    ).unwrap();
    assert_eq!(q.kind, QuestionType::Text);
    assert!(q.options.is_empty());

    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["type"], "text");
    assert!(v.get("options").is_none());
  }

  #[test]
  fn test_settings_use_camel_case() {
    let s = AppSettings {
      app_name: "A".into(),
      primary_color: "#000".into(),
      secondary_color: "#111".into(),
      logo_text: "L".into(),
      welcome_title: "T".into(),
      welcome_subtitle: "S".into(),
      dark_mode: true,
    };
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["appName"], "A");
    assert_eq!(v["darkMode"], true);
  }
}
