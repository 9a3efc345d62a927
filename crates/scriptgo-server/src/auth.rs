//! HTTP Basic authentication against stored account credentials.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use scriptgo_core::{account::Account, store::ScriptStore};
use scriptgo_genai::TextGenerator;

use crate::{AppState, error::ApiError};

/// The authenticated caller. Every owner-scoped operation is keyed by
/// `self.0.user_id`.
pub struct CurrentUser(pub Account);

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(phc).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

/// Decode `Authorization: Basic …` into `(email, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| ApiError::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  Ok((email.to_owned(), password.to_owned()))
}

impl<S, G> FromRequestParts<AppState<S, G>> for CurrentUser
where
  S: ScriptStore + 'static,
  G: TextGenerator + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, G>,
  ) -> Result<Self, Self::Rejection> {
    let (email, password) = basic_credentials(&parts.headers)?;

    let stored = state
      .store
      .find_account_by_email(&email)
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;

    verify_password(&password, &stored.password_hash)?;
    Ok(CurrentUser(stored.account))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    map
  }

  #[test]
  fn decodes_basic_credentials() {
    let value = format!("Basic {}", B64.encode("alice@example.com:pa:ss"));
    let (email, password) = basic_credentials(&headers(&value)).unwrap();
    assert_eq!(email, "alice@example.com");
    assert_eq!(password, "pa:ss");
  }

  #[test]
  fn rejects_malformed_headers() {
    assert!(matches!(basic_credentials(&HeaderMap::new()), Err(ApiError::Unauthorized)));
    assert!(matches!(
      basic_credentials(&headers("Bearer abc")),
      Err(ApiError::Unauthorized)
    ));
    assert!(matches!(
      basic_credentials(&headers("Basic !!!not-base64!!!")),
      Err(ApiError::Unauthorized)
    ));
    let no_colon = format!("Basic {}", B64.encode("alice"));
    assert!(matches!(basic_credentials(&headers(&no_colon)), Err(ApiError::Unauthorized)));
  }

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("secret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret", &hash).is_ok());
    assert!(matches!(verify_password("wrong", &hash), Err(ApiError::Unauthorized)));
    assert!(matches!(verify_password("secret", "not-a-hash"), Err(ApiError::Unauthorized)));
  }
}
