//! Runtime configuration: environment variables plus an optional TOML file.
//!
//! `GUIDE_CONFIG_PATH` may point at a TOML file overriding the report prompt,
//! branding settings, question catalog and article library. See `GuideConfig`.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{AppSettings, Article, Question};

pub const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GuideConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub settings: Option<AppSettings>,
  #[serde(default)]
  pub questions: Vec<Question>,
  #[serde(default)]
  pub articles: Vec<Article>,
}

/// Prompt used for report generation. `{responses}` is replaced by the
/// newline-joined "Question: ... Answer: ..." lines.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub report_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      report_template: r#"
Analyze the following user health habits and provide personalized health tips.

User Responses:
{responses}

Please provide the output in JSON format with the following structure:
{
  "summary": "A 2-3 sentence overall summary of their health status based on inputs.",
  "score": 0-100 (an integer estimating health score),
  "tips": [
    {
      "title": "Tip Title",
      "description": "Detailed actionable advice.",
      "category": "diet" | "activity" | "lifestyle"
    }
  ]
}
Provide at least 3 tips, one for each category if possible. Keep tone encouraging and professional.
"#.into(),
    }
  }
}

/// Attempt to load `GuideConfig` from GUIDE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_guide_config_from_env() -> Option<GuideConfig> {
  let path = std::env::var("GUIDE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_guide_config(&s) {
      Ok(cfg) => {
        info!(target: "healthyguide_backend", %path, questions = cfg.questions.len(), articles = cfg.articles.len(), "Loaded guide config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "healthyguide_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "healthyguide_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_guide_config(s: &str) -> Result<GuideConfig, toml::de::Error> {
  toml::from_str::<GuideConfig>(s)
}

/// REPORT_TIMEOUT_SECS, falling back to the default on absence or garbage.
pub fn report_timeout_from_env() -> Duration {
  match std::env::var("REPORT_TIMEOUT_SECS") {
    Ok(raw) => match raw.parse::<u64>() {
      Ok(secs) if secs > 0 => Duration::from_secs(secs),
      _ => {
        warn!(target: "healthyguide_backend", %raw, "Invalid REPORT_TIMEOUT_SECS; using default");
        DEFAULT_REPORT_TIMEOUT
      }
    },
    Err(_) => DEFAULT_REPORT_TIMEOUT,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Category, QuestionType};

  #[test]
  fn test_default_prompt_has_placeholder() {
    assert!(Prompts::default().report_template.contains("{responses}"));
  }

  #[test]
  fn test_parse_full_config() {
    let cfg = parse_guide_config(r##"
[prompts]
report_template = "Rate these: {responses}"

[settings]
appName = "FitCheck"
primaryColor = "#000000"
secondaryColor = "#ffffff"
logoText = "FC"
welcomeTitle = "Hi"
welcomeSubtitle = "Answer a few questions"
darkMode = true

[[questions]]
id = "s1"
text = "Rate your stress from 1 to 5"
type = "rating"
category = "lifestyle"

[[articles]]
id = "x1"
title = "Walk more"
summary = "Steps add up."
imageUrl = "https://example.com/a.png"
date = "Jan 01, 2024"
"##).unwrap();

    assert_eq!(cfg.prompts.report_template, "Rate these: {responses}");
    assert_eq!(cfg.settings.as_ref().map(|s| s.app_name.as_str()), Some("FitCheck"));
    assert_eq!(cfg.questions.len(), 1);
    assert_eq!(cfg.questions[0].kind, QuestionType::Rating);
    assert_eq!(cfg.questions[0].category, Category::Lifestyle);
    assert_eq!(cfg.articles[0].image_url, "https://example.com/a.png");
  }

  #[test]
  fn test_example_config_parses() {
    let cfg = parse_guide_config(include_str!("../guide.example.toml")).unwrap();
    assert_eq!(cfg.questions.len(), 2);
    assert_eq!(cfg.questions[0].options.len(), 2);
    assert!(cfg.prompts.report_template.contains("{responses}"));
  }

  #[test]
  fn test_empty_config_uses_defaults() {
    let cfg = parse_guide_config("").unwrap();
    assert!(cfg.settings.is_none());
    assert!(cfg.questions.is_empty());
    assert!(cfg.prompts.report_template.contains("{responses}"));
  }
}
