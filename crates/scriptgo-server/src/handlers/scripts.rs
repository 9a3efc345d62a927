//! Handlers for `/api/scripts` endpoints. Every operation is scoped to the
//! authenticated caller.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/scripts` | Newest first |
//! | `POST`   | `/api/scripts` | Save: update when `id` is given, otherwise create (201) |
//! | `GET`    | `/api/scripts/{id}` | 403 for another user's script, 404 if unknown |
//! | `PUT`    | `/api/scripts/{id}` | In-place update |
//! | `DELETE` | `/api/scripts/{id}` | 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use scriptgo_core::{
  account::Account,
  content::ScriptContent,
  script::{NewScript, Script, ScriptBrief, ScriptListing, ScriptUpdate},
  store::{Access, ScriptStore},
};
use scriptgo_genai::TextGenerator;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError, notify::spawn_detached};

/// Editable fields of a script, as sent by the client.
#[derive(Debug, Deserialize)]
pub struct ScriptBody {
  #[serde(default)]
  pub title:   String,
  #[serde(default)]
  pub content: ScriptContent,
  #[serde(flatten)]
  pub brief:   ScriptBrief,
}

impl ScriptBody {
  /// Reject empty content; a blank title falls back to the topic. The
  /// brief's day count is made to agree with the content's kind.
  fn validate(mut self) -> Result<ScriptUpdate, ApiError> {
    if self.content.is_empty() {
      return Err(ApiError::BadRequest("script content is empty".into()));
    }
    self.brief.calendar_days = match &self.content {
      ScriptContent::Calendar { days } if self.brief.calendar_days == 0 => {
        u32::try_from(days.len()).unwrap_or(u32::MAX)
      }
      ScriptContent::Calendar { .. } => self.brief.calendar_days,
      ScriptContent::Script { .. } | ScriptContent::Legacy { .. } => 0,
    };
    let title = match self.title.trim() {
      "" => self.brief.topic.clone(),
      title => title.to_owned(),
    };
    Ok(ScriptUpdate { title, content: self.content, brief: self.brief })
  }
}

/// Body of `POST /api/scripts`.
#[derive(Debug, Deserialize)]
pub struct SaveScript {
  #[serde(default)]
  pub id:     Option<Uuid>,
  #[serde(flatten)]
  pub script: ScriptBody,
}

fn granted<T>(access: Access<T>, id: Uuid) -> Result<T, ApiError> {
  match access {
    Access::Granted(v) => Ok(v),
    Access::NotFound => Err(ApiError::NotFound(format!("script {id} not found"))),
    Access::Denied => {
      tracing::warn!(script_id = %id, "access denied");
      Err(ApiError::Forbidden)
    }
  }
}

async fn update_owned<S: ScriptStore>(
  store:  &S,
  id:     Uuid,
  owner:  &Account,
  update: ScriptUpdate,
) -> Result<Script, ApiError> {
  let access = store
    .update_script(id, owner.user_id, update)
    .await
    .map_err(ApiError::store)?;
  granted(access, id)
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /api/scripts`
pub async fn list<S, G>(
  State(state): State<AppState<S, G>>,
  CurrentUser(account): CurrentUser,
) -> Result<Json<ScriptListing>, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  let listing = state
    .store
    .list_scripts(account.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(listing))
}

// ─── Save ────────────────────────────────────────────────────────────────────

/// `POST /api/scripts`
pub async fn save<S, G>(
  State(state): State<AppState<S, G>>,
  CurrentUser(account): CurrentUser,
  Json(body): Json<SaveScript>,
) -> Result<Response, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  let fields = body.script.validate()?;

  if let Some(id) = body.id {
    let script = update_owned(state.store.as_ref(), id, &account, fields).await?;
    return Ok(Json(script).into_response());
  }

  let script = state
    .store
    .create_script(NewScript {
      user_id: account.user_id,
      title:   fields.title,
      content: fields.content,
      brief:   fields.brief,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(script_id = %script.id, user_id = %account.user_id, "script created");

  let mailer = state.mailer.clone();
  let (title, content) = (script.title.clone(), script.content.clone());
  spawn_detached("script ready email", async move {
    mailer.send_script_ready(&account.email, &title, &content).await
  });

  Ok((StatusCode::CREATED, Json(script)).into_response())
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /api/scripts/{id}`
pub async fn get_one<S, G>(
  State(state): State<AppState<S, G>>,
  CurrentUser(account): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Script>, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  let access = state
    .store
    .get_script(id, account.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(granted(access, id)?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /api/scripts/{id}`
pub async fn update_one<S, G>(
  State(state): State<AppState<S, G>>,
  CurrentUser(account): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<ScriptBody>,
) -> Result<Json<Script>, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  let script = update_owned(state.store.as_ref(), id, &account, body.validate()?).await?;
  Ok(Json(script))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /api/scripts/{id}`
pub async fn delete_one<S, G>(
  State(state): State<AppState<S, G>>,
  CurrentUser(account): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  let access = state
    .store
    .delete_script(id, account.user_id)
    .await
    .map_err(ApiError::store)?;
  granted(access, id)?;
  Ok(StatusCode::NO_CONTENT)
}
