//! HTTP API for ScriptGo.
//!
//! Exposes an axum [`Router`] backed by any [`ScriptStore`] and any
//! [`TextGenerator`]. Callers authenticate with HTTP Basic credentials
//! (`email:password`) checked against the store's accounts.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod notify;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use scriptgo_core::store::ScriptStore;
use scriptgo_genai::{GeminiConfig, ResponseFormat, TextGenerator};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{accounts, generate, healthz, scripts};
use mailer::{EmailConfig, Mailer};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_app_url() -> String { "http://localhost:3000".to_owned() }

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCRIPTGO__*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  /// Public URL of the web app; emails link to `{app_url}/dashboard`.
  #[serde(default = "default_app_url")]
  pub app_url:         String,
  pub store_path:      PathBuf,
  /// Reply format requested for single scripts.
  #[serde(default)]
  pub response_format: ResponseFormat,
  pub gemini:          GeminiConfig,
  /// SMTP settings. Without them, emails are skipped.
  #[serde(default)]
  pub email:           Option<EmailConfig>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, G> {
  pub store:     Arc<S>,
  pub generator: Arc<G>,
  pub mailer:    Mailer,
  pub config:    Arc<ServerConfig>,
}

impl<S, G> Clone for AppState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      generator: Arc::clone(&self.generator),
      mailer:    self.mailer.clone(),
      config:    Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the ScriptGo [`Router`].
pub fn router<S, G>(state: AppState<S, G>) -> Router
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  Router::new()
    .route("/healthz",          get(healthz))
    .route("/api/accounts",     post(accounts::sign_up::<S, G>))
    .route("/api/me",           get(accounts::me))
    .route("/api/generate",     post(generate::handler::<S, G>))
    .route(
      "/api/scripts",
      get(scripts::list::<S, G>).post(scripts::save::<S, G>),
    )
    .route(
      "/api/scripts/{id}",
      get(scripts::get_one::<S, G>)
        .put(scripts::update_one::<S, G>)
        .delete(scripts::delete_one::<S, G>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
