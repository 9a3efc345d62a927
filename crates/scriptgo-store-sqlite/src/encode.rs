//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Script content is stored as JSON text and
//! decoded by [`ScriptContent::decode_stored`].

use chrono::{DateTime, Utc};
use rusqlite::{Row, types::FromSql};
use scriptgo_core::{
  account::{Account, StoredAccount},
  content::ScriptContent,
  script::{Framework, Script, ScriptBrief},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Framework
// ────────────────────────────────────────────────────────────────

pub fn encode_framework(f: Framework) -> &'static str { f.as_str() }

/// Unknown values read as [`Framework::None`]; a stored row is never
/// rejected over its framework label.
pub fn decode_framework(s: Option<&str>) -> Framework {
  match s.map(str::parse::<Framework>) {
    Some(Ok(f)) => f,
    Some(Err(e)) => {
      tracing::warn!("ignoring stored framework: {e}");
      Framework::None
    }
    None => Framework::None,
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Read `name` from `row` if the result set has such a column.
fn optional_column<T: FromSql>(
  row:     &Row<'_>,
  present: &[String],
  name:    &str,
) -> rusqlite::Result<Option<T>> {
  if present.iter().any(|c| c == name) {
    row.get(name)
  } else {
    Ok(None)
  }
}

/// Raw values read from a `SELECT *` over `scripts`. Every column other than
/// the keys is optional so that tables missing newer columns still read.
pub struct RawScript {
  pub id:              String,
  pub user_id:         String,
  pub title:           Option<String>,
  pub content:         Option<String>,
  pub platform:        Option<String>,
  pub topic:           Option<String>,
  pub tone:            Option<String>,
  pub length:          Option<String>,
  pub language:        Option<String>,
  pub framework:       Option<String>,
  pub target_audience: Option<String>,
  pub calendar_days:   Option<i64>,
  pub created_at:      Option<String>,
  pub updated_at:      Option<String>,
}

impl RawScript {
  /// Build from a row whose result set has the columns named in `present`.
  pub fn from_row(row: &Row<'_>, present: &[String]) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get("id")?,
      user_id:         row.get("user_id")?,
      title:           optional_column(row, present, "title")?,
      content:         optional_column(row, present, "content")?,
      platform:        optional_column(row, present, "platform")?,
      topic:           optional_column(row, present, "topic")?,
      tone:            optional_column(row, present, "tone")?,
      length:          optional_column(row, present, "length")?,
      language:        optional_column(row, present, "language")?,
      framework:       optional_column(row, present, "framework")?,
      target_audience: optional_column(row, present, "target_audience")?,
      calendar_days:   optional_column(row, present, "calendar_days")?,
      created_at:      optional_column(row, present, "created_at")?,
      updated_at:      optional_column(row, present, "updated_at")?,
    })
  }

  pub fn into_script(self) -> Result<Script> {
    let calendar_days = self
      .calendar_days
      .and_then(|d| u32::try_from(d).ok())
      .unwrap_or(0);

    let defaults = ScriptBrief::new(self.topic.unwrap_or_default());
    let brief = ScriptBrief {
      platform:        self.platform.unwrap_or(defaults.platform),
      tone:            self.tone.unwrap_or(defaults.tone),
      length:          self.length.filter(|l| !l.is_empty()).unwrap_or(defaults.length),
      language:        self.language.filter(|l| !l.is_empty()).unwrap_or(defaults.language),
      framework:       decode_framework(self.framework.as_deref()),
      target_audience: self.target_audience.filter(|a| !a.trim().is_empty()),
      calendar_days,
      topic:           defaults.topic,
    };

    let created_at = self
      .created_at
      .as_deref()
      .map(decode_dt)
      .transpose()?
      .unwrap_or(DateTime::<Utc>::default());
    let updated_at = self
      .updated_at
      .as_deref()
      .map(decode_dt)
      .transpose()?
      .unwrap_or(created_at);

    Ok(Script {
      id: decode_uuid(&self.id)?,
      user_id: decode_uuid(&self.user_id)?,
      title: self.title.unwrap_or_default(),
      content: ScriptContent::decode_stored(self.content.as_deref(), calendar_days),
      brief,
      created_at,
      updated_at,
    })
  }
}

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub user_id:       String,
  pub email:         String,
  pub full_name:     String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawAccount {
  pub fn into_stored(self) -> Result<StoredAccount> {
    Ok(StoredAccount {
      account:       Account {
        user_id:    decode_uuid(&self.user_id)?,
        email:      self.email,
        full_name:  self.full_name,
        created_at: decode_dt(&self.created_at)?,
      },
      password_hash: self.password_hash,
    })
  }
}
