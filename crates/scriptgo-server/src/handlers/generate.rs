//! `POST /api/generate`: generate a script from a brief without saving it.

use axum::{Json, extract::State};
use scriptgo_core::{script::ScriptBrief, store::ScriptStore};
use scriptgo_genai::{GeneratedScript, TextGenerator};

use crate::{AppState, auth::CurrentUser, error::ApiError};

pub async fn handler<S, G>(
  State(state): State<AppState<S, G>>,
  CurrentUser(account): CurrentUser,
  Json(brief): Json<ScriptBrief>,
) -> Result<Json<GeneratedScript>, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  if brief.topic.trim().is_empty() {
    return Err(ApiError::BadRequest("topic is required".into()));
  }

  tracing::debug!(user_id = %account.user_id, "generate requested");
  let generated = scriptgo_genai::generate(
    state.generator.as_ref(),
    &brief,
    state.config.response_format,
  )
  .await?;

  Ok(Json(generated))
}
