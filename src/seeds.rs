//! Built-in content: question catalog, branding defaults, article library and the
//! fallback report served when the model path fails.

use crate::domain::{
  AnswerOption, AppSettings, Article, AssessmentResult, Category, HealthTip, Question, QuestionType,
};

pub fn default_settings() -> AppSettings {
  AppSettings {
    app_name: "HealthyGuide".into(),
    primary_color: "#10B981".into(),
    secondary_color: "#3B82F6".into(),
    logo_text: "HealthyGuide".into(),
    welcome_title: "Your Personal Health Journey".into(),
    welcome_subtitle: "Take our 10-step assessment to get personalized diet and activity recommendations.".into(),
    dark_mode: false,
  }
}

fn choice(id: &str, text: &str, category: Category, opts: &[(&str, &str)]) -> Question {
  Question {
    id: id.into(),
    text: text.into(),
    kind: QuestionType::SingleChoice,
    category,
    options: opts
      .iter()
      .enumerate()
      .map(|(i, (label, value))| AnswerOption {
        id: format!("opt{}", i + 1),
        label: (*label).into(),
        value: (*value).into(),
      })
      .collect(),
  }
}

/// The ten-step assessment shipped with the app.
pub fn seed_questions() -> Vec<Question> {
  use Category::*;
  vec![
    choice("q1", "How many meals do you typically eat per day?", Diet, &[
      ("1-2 meals", "1-2"), ("3 balanced meals", "3"), ("3 meals + snacks", "3+"), ("Frequent small meals", "grazing"),
    ]),
    choice("q2", "How much water do you drink daily?", Diet, &[
      ("Less than 2 glasses", "<2"), ("2-4 glasses", "2-4"), ("5-8 glasses", "5-8"), ("More than 8 glasses", ">8"),
    ]),
    choice("q3", "How often do you eat fresh fruits and vegetables?", Diet, &[
      ("Rarely", "rarely"), ("A few times a week", "weekly"), ("Once a day", "daily_once"), ("With every meal", "daily_multi"),
    ]),
    choice("q4", "How often do you consume processed foods or sugary drinks?", Diet, &[
      ("Daily", "daily"), ("Several times a week", "frequent"), ("Occasionally", "occasional"), ("Almost never", "rarely"),
    ]),
    choice("q5", "Which best describes your typical portion sizes?", Diet, &[
      ("Small", "small"), ("Moderate", "moderate"), ("Large", "large"), ("I often overeat", "excessive"),
    ]),
    choice("q6", "How many days a week do you engage in intentional exercise?", Activity, &[
      ("0 days", "0"), ("1-2 days", "1-2"), ("3-4 days", "3-4"), ("5+ days", "5+"),
    ]),
    choice("q7", "What type of physical activity do you prefer?", Activity, &[
      ("Walking / Light Jogging", "light_cardio"), ("Strength Training / Weights", "strength"),
      ("High Intensity / Sports", "hiit"), ("None / Sedentary", "none"),
    ]),
    choice("q8", "How many hours do you spend sitting per day (work, TV, etc.)?", Activity, &[
      ("Less than 4 hours", "<4"), ("4-6 hours", "4-6"), ("6-8 hours", "6-8"), ("More than 8 hours", ">8"),
    ]),
    choice("q9", "Do you incorporate stretching or mobility work into your routine?", Activity, &[
      ("Never", "never"), ("Sometimes", "sometimes"), ("Always before/after exercise", "regularly"), ("Daily dedicated session", "daily"),
    ]),
    choice("q10", "How would you rate your overall sleep quality?", Lifestyle, &[
      ("Poor (Frequent waking, <6 hrs)", "poor"), ("Fair (Sometimes tired)", "fair"),
      ("Good (Mostly rested)", "good"), ("Excellent (7-9 hrs solid sleep)", "excellent"),
    ]),
  ]
}

pub fn seed_articles() -> Vec<Article> {
  vec![
    Article {
      id: "a1".into(),
      title: "The Benefits of Morning Hydration".into(),
      summary: "Why drinking water first thing in the morning boosts your metabolism.".into(),
      image_url: "https://picsum.photos/400/250?random=1".into(),
      date: "Oct 24, 2023".into(),
    },
    Article {
      id: "a2".into(),
      title: "5-Minute Desk Stretches".into(),
      summary: "Simple movements to keep your joints healthy while working.".into(),
      image_url: "https://picsum.photos/400/250?random=2".into(),
      date: "Nov 12, 2023".into(),
    },
    Article {
      id: "a3".into(),
      title: "Understanding Macronutrients".into(),
      summary: "A beginner guide to protein, fats, and carbohydrates.".into(),
      image_url: "https://picsum.photos/400/250?random=3".into(),
      date: "Dec 05, 2023".into(),
    },
  ]
}

/// Generic report used whenever the model path fails. Never depends on the answers.
pub fn fallback_report() -> AssessmentResult {
  AssessmentResult {
    summary: "We couldn't generate a live report at this moment, but based on general guidelines, focus on balanced nutrition and regular movement.".into(),
    score: 75,
    tips: vec![
      HealthTip {
        title: "Hydration is Key".into(),
        description: "Try to drink at least 8 glasses of water a day to maintain energy levels.".into(),
        category: Category::Diet,
        icon: None,
      },
      HealthTip {
        title: "Keep Moving".into(),
        description: "Aim for 30 minutes of moderate activity most days of the week.".into(),
        category: Category::Activity,
        icon: None,
      },
      HealthTip {
        title: "Sleep Well".into(),
        description: "Prioritize 7-9 hours of sleep for optimal recovery.".into(),
        category: Category::Lifestyle,
        icon: None,
      },
    ],
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn test_seed_question_ids_are_unique() {
    let qs = seed_questions();
    assert_eq!(qs.len(), 10);
    let ids: HashSet<_> = qs.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), qs.len());
    assert!(qs.iter().all(|q| q.options.len() == 4));
  }

  #[test]
  fn test_fallback_has_one_tip_per_category() {
    let r = fallback_report();
    assert_eq!(r.score, 75);
    let cats: Vec<_> = r.tips.iter().map(|t| t.category).collect();
    assert_eq!(cats, Category::ALL.to_vec());
  }
}
