//! User accounts, the identities that own scripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. The password hash is deliberately not part of this
/// type; see [`StoredAccount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub user_id:    Uuid,
  pub email:      String,
  pub full_name:  String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`ScriptStore::create_account`](crate::store::ScriptStore::create_account).
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub email:         String,
  pub full_name:     String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// An account together with its credential, as read for verification.
#[derive(Debug, Clone)]
pub struct StoredAccount {
  pub account:       Account,
  pub password_hash: String,
}
