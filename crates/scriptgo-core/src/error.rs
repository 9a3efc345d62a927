//! Error types for `scriptgo-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("script not found: {0}")]
  ScriptNotFound(Uuid),

  /// The script exists but belongs to another user.
  #[error("access denied to script {0}")]
  AccessDenied(Uuid),

  #[error("unknown framework: {0:?}")]
  UnknownFramework(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
