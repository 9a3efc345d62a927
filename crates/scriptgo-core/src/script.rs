//! Script records and the brief a user fills in to request one.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, content::ScriptContent};

// ─── Framework ───────────────────────────────────────────────────────────────

/// Copywriting framework the script should follow.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum Framework {
  #[default]
  None,
  /// Attention, Interest, Desire, Action.
  #[serde(rename = "AIDA", alias = "aida")]
  Aida,
  /// Problem, Agitate, Solution.
  #[serde(rename = "PAS", alias = "pas")]
  Pas,
}

impl Framework {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::None => "None",
      Self::Aida => "AIDA",
      Self::Pas => "PAS",
    }
  }
}

impl fmt::Display for Framework {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Framework {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "" | "none" => Ok(Self::None),
      "aida" => Ok(Self::Aida),
      "pas" => Ok(Self::Pas),
      _ => Err(Error::UnknownFramework(s.to_owned())),
    }
  }
}

// ─── Brief ───────────────────────────────────────────────────────────────────

fn default_platform() -> String { "YouTube".to_owned() }
fn default_tone() -> String { "Professional".to_owned() }
fn default_length() -> String { "60s".to_owned() }
fn default_language() -> String { "English".to_owned() }

/// What the user asked for. Stored alongside the generated content so a
/// script can be regenerated or edited with the same settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBrief {
  #[serde(default = "default_platform")]
  pub platform:        String,
  pub topic:           String,
  #[serde(default = "default_tone")]
  pub tone:            String,
  /// Free-form target length, e.g. `60s` or `5 minutes`.
  #[serde(default = "default_length")]
  pub length:          String,
  #[serde(default = "default_language")]
  pub language:        String,
  #[serde(default)]
  pub framework:       Framework,
  #[serde(default)]
  pub target_audience: Option<String>,
  /// Number of days for a content calendar; `0` requests a single script.
  #[serde(default)]
  pub calendar_days:   u32,
}

impl ScriptBrief {
  pub fn new(topic: impl Into<String>) -> Self {
    Self {
      platform:        default_platform(),
      topic:           topic.into(),
      tone:            default_tone(),
      length:          default_length(),
      language:        default_language(),
      framework:       Framework::None,
      target_audience: None,
      calendar_days:   0,
    }
  }

  pub fn is_calendar(&self) -> bool { self.calendar_days > 0 }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted script, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
  pub id:         Uuid,
  pub user_id:    Uuid,
  pub title:      String,
  pub content:    ScriptContent,
  #[serde(flatten)]
  pub brief:      ScriptBrief,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`ScriptStore::create_script`](crate::store::ScriptStore::create_script).
#[derive(Debug, Clone)]
pub struct NewScript {
  pub user_id: Uuid,
  pub title:   String,
  pub content: ScriptContent,
  pub brief:   ScriptBrief,
}

/// Replacement fields for an in-place save. Ownership and timestamps are
/// managed by the store.
#[derive(Debug, Clone)]
pub struct ScriptUpdate {
  pub title:   String,
  pub content: ScriptContent,
  pub brief:   ScriptBrief,
}

/// The result of listing a user's scripts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptListing {
  /// Newest first.
  pub scripts:         Vec<Script>,
  /// Expected columns absent from the backing table. Diagnostic only.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub missing_columns: Vec<String>,
}
