//! HealthyGuide · Health Assessment Backend
//!
//! - Axum HTTP + WebSocket API
//! - Gemini-generated health reports with a fixed fallback report
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   GEMINI_API_KEY       : model credential (API_KEY is accepted too)
//!   GEMINI_BASE_URL      : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL         : default "gemini-2.5-flash"
//!   REPORT_TIMEOUT_SECS  : model call timeout, default 20
//!   GUIDE_CONFIG_PATH    : path to TOML config (prompt, settings, questions, articles)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod catalog;
mod flow;
mod report;
mod gemini;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // In-memory catalog, settings and the report generator.
  let state = Arc::new(AppState::from_env());

  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "healthyguide_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "healthyguide_backend", error = %e, "Failed to listen for ctrl-c");
  }
  info!(target: "healthyguide_backend", "Shutdown signal received");
}
