//! The `ScriptStore` trait and the [`Access`] outcome.
//!
//! The trait is implemented by storage backends (e.g.
//! `scriptgo-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Error,
  account::{Account, NewAccount, StoredAccount},
  script::{NewScript, Script, ScriptListing, ScriptUpdate},
};

// ─── Ownership outcome ───────────────────────────────────────────────────────

/// Outcome of an owner-scoped operation.
///
/// `Denied` is kept distinct from `NotFound` so callers can tell "someone
/// else's script" apart from "no such script".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<T> {
  Granted(T),
  NotFound,
  Denied,
}

impl Access<()> {
  /// Compare the stored owner of a record (if the record exists) with the
  /// caller's identity.
  pub fn check(stored_owner: Option<Uuid>, caller: Uuid) -> Self {
    match stored_owner {
      None => Self::NotFound,
      Some(owner) if owner == caller => Self::Granted(()),
      Some(_) => Self::Denied,
    }
  }
}

impl<T> Access<T> {
  pub fn is_granted(&self) -> bool { matches!(self, Self::Granted(_)) }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Access<U> {
    match self {
      Self::Granted(v) => Access::Granted(f(v)),
      Self::NotFound => Access::NotFound,
      Self::Denied => Access::Denied,
    }
  }

  /// Convert into a [`Result`](crate::Result), naming `id` in the error.
  pub fn into_result(self, id: Uuid) -> crate::Result<T> {
    match self {
      Self::Granted(v) => Ok(v),
      Self::NotFound => Err(Error::ScriptNotFound(id)),
      Self::Denied => Err(Error::AccessDenied(id)),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a ScriptGo store backend: accounts and the scripts they
/// own.
///
/// Every read and write of an existing script is scoped to an owner: the
/// backend compares the stored `user_id` with `owner` and answers
/// [`Access::Denied`] on mismatch without touching the record.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ScriptStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Register a new account. Fails if the email is already taken.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Look up an account and its password hash by email (case-insensitive).
  fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<StoredAccount>, Self::Error>> + Send + 'a;

  // ── Scripts ───────────────────────────────────────────────────────────

  /// Persist a new script. Id and timestamps are assigned by the store.
  fn create_script(
    &self,
    input: NewScript,
  ) -> impl Future<Output = Result<Script, Self::Error>> + Send + '_;

  /// Replace the editable fields of a script in place and refresh
  /// `updated_at`.
  fn update_script(
    &self,
    id: Uuid,
    owner: Uuid,
    update: ScriptUpdate,
  ) -> impl Future<Output = Result<Access<Script>, Self::Error>> + Send + '_;

  fn get_script(
    &self,
    id: Uuid,
    owner: Uuid,
  ) -> impl Future<Output = Result<Access<Script>, Self::Error>> + Send + '_;

  fn delete_script(
    &self,
    id: Uuid,
    owner: Uuid,
  ) -> impl Future<Output = Result<Access<()>, Self::Error>> + Send + '_;

  /// All scripts owned by `owner`, newest first.
  fn list_scripts(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<ScriptListing, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn check_distinguishes_missing_from_foreign() {
    let me = Uuid::new_v4();
    let other = Uuid::new_v4();
    assert_eq!(Access::check(Some(me), me), Access::Granted(()));
    assert_eq!(Access::check(Some(other), me), Access::Denied);
    assert_eq!(Access::check(None, me), Access::NotFound);
  }

  #[test]
  fn into_result_names_the_script() {
    let id = Uuid::new_v4();
    assert!(matches!(
      Access::<()>::Denied.into_result(id),
      Err(Error::AccessDenied(x)) if x == id
    ));
    assert!(matches!(
      Access::<()>::NotFound.into_result(id),
      Err(Error::ScriptNotFound(x)) if x == id
    ));
    assert_eq!(Access::Granted(3).map(|n| n * 2).into_result(id).unwrap(), 6);
  }
}
