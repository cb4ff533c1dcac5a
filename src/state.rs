//! Application state: in-memory catalog (questions, settings, articles) and the report generator.
//!
//! Nothing here is persisted; a restart brings back the seeds or the TOML overrides.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::catalog;
use crate::config::{load_guide_config_from_env, report_timeout_from_env, GuideConfig};
use crate::domain::{AppSettings, Article, Question};
use crate::error::AppResult;
use crate::gemini::Gemini;
use crate::report::ReportGenerator;
use crate::seeds::{default_settings, seed_articles, seed_questions};

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<RwLock<Vec<Question>>>,
    pub settings: Arc<RwLock<AppSettings>>,
    pub articles: Vec<Article>,
    pub reports: ReportGenerator,
}

impl AppState {
    /// Build state from env: load config, seed the catalog, init the Gemini client.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let cfg = load_guide_config_from_env().unwrap_or_default();
        let timeout = report_timeout_from_env();
        let gemini = Gemini::from_env(timeout);
        if gemini.has_api_key() {
            info!(target: "healthyguide_backend", base_url = %gemini.base_url, model = %gemini.model, ?timeout, "Gemini enabled.");
        } else {
            warn!(target: "healthyguide_backend", model = %gemini.model, "Gemini has no API key; every report will be the fallback.");
        }
        let reports = ReportGenerator::new(Arc::new(gemini), cfg.prompts.clone(), timeout);
        Self::with_config(cfg, reports)
    }

    /// Config entries win over seeds; empty lists mean "use the seeds".
    /// A configured catalog with repeated question ids is discarded for the seeds.
    pub fn with_config(cfg: GuideConfig, reports: ReportGenerator) -> Self {
        let questions = if cfg.questions.is_empty() {
            seed_questions()
        } else if let Err(e) = catalog::ensure_unique_ids(&cfg.questions) {
            warn!(target: "healthyguide_backend", error = %e, "Invalid question catalog in config; using built-in questions");
            seed_questions()
        } else {
            cfg.questions
        };
        let articles = if cfg.articles.is_empty() { seed_articles() } else { cfg.articles };
        let settings = cfg.settings.unwrap_or_else(default_settings);
        info!(target: "healthyguide_backend", questions = questions.len(), articles = articles.len(), app_name = %settings.app_name, "Startup catalog");

        Self {
            questions: Arc::new(RwLock::new(questions)),
            settings: Arc::new(RwLock::new(settings)),
            articles,
            reports,
        }
    }

    pub async fn questions(&self) -> Vec<Question> {
        self.questions.read().await.clone()
    }

    #[instrument(level = "info", skip(self, text), fields(%id, text_len = text.len()))]
    pub async fn update_question_text(&self, id: &str, text: &str) -> AppResult<Vec<Question>> {
        let mut guard = self.questions.write().await;
        let next = catalog::update_question_text(&guard, id, text)?;
        *guard = next.clone();
        Ok(next)
    }

    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn delete_question(&self, id: &str) -> AppResult<Vec<Question>> {
        let mut guard = self.questions.write().await;
        let next = catalog::delete_question(&guard, id)?;
        *guard = next.clone();
        Ok(next)
    }

    pub async fn settings(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    #[instrument(level = "info", skip_all, fields(app_name = %settings.app_name))]
    pub async fn replace_settings(&self, settings: AppSettings) -> AppSettings {
        *self.settings.write().await = settings.clone();
        settings
    }
}
