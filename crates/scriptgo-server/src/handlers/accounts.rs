//! Handlers for account endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/accounts` | Unauthenticated sign-up; 409 if the email is taken |
//! | `GET`  | `/api/me` | The authenticated account |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use scriptgo_core::{
  account::{Account, NewAccount},
  store::ScriptStore,
};
use scriptgo_genai::TextGenerator;
use serde::Deserialize;

use crate::{
  AppState,
  auth::{CurrentUser, hash_password},
  error::ApiError,
  notify::spawn_detached,
};

// ─── Sign up ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUp {
  pub email:     String,
  pub password:  String,
  #[serde(default)]
  pub full_name: String,
}

/// `POST /api/accounts`
pub async fn sign_up<S, G>(
  State(state): State<AppState<S, G>>,
  Json(body): Json<SignUp>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  let email = body.email.trim();
  if email.is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest("email and password are required".into()));
  }

  // The store's unique index still guards against a concurrent sign-up.
  let existing = state
    .store
    .find_account_by_email(email)
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::Conflict(format!("an account for {email} already exists")));
  }

  let account = state
    .store
    .create_account(NewAccount {
      email:         email.to_owned(),
      full_name:     body.full_name.trim().to_owned(),
      password_hash: hash_password(&body.password)?,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %account.user_id, "account created");

  let mailer = state.mailer.clone();
  let (to, name) = (account.email.clone(), account.full_name.clone());
  spawn_detached("welcome email", async move {
    mailer.send_welcome(&to, &name).await
  });

  Ok((StatusCode::CREATED, Json(account)))
}

// ─── Me ──────────────────────────────────────────────────────────────────────

/// `GET /api/me`
pub async fn me(CurrentUser(account): CurrentUser) -> Json<Account> {
  Json(account)
}
