//! Script content: the visual/audio beats a script is made of.
//!
//! Content is persisted as plain JSON text (a row array, a day array, or
//! whatever a legacy writer left behind). Its shape is decided exactly once,
//! by [`ScriptContent::decode_stored`], and carried from then on as an
//! explicit `kind`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Result;

/// Visual text given to stored content that could not be decoded.
pub const LEGACY_VISUAL: &str = "Legacy Content";

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One beat of a script: what is seen and what is heard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRow {
  #[serde(default)]
  pub visual: String,
  #[serde(default)]
  pub audio:  String,
}

impl ScriptRow {
  pub fn new(visual: impl Into<String>, audio: impl Into<String>) -> Self {
    Self { visual: visual.into(), audio: audio.into() }
  }
}

/// Either a list of rows or a single row covering the whole piece.
#[derive(Deserialize)]
#[serde(untagged)]
enum RowsOrSingle {
  Rows(Vec<ScriptRow>),
  Single(ScriptRow),
}

impl From<RowsOrSingle> for Vec<ScriptRow> {
  fn from(value: RowsOrSingle) -> Self {
    match value {
      RowsOrSingle::Rows(rows) => rows,
      RowsOrSingle::Single(row) => vec![row],
    }
  }
}

fn rows_or_single<'de, D>(deserializer: D) -> Result<Vec<ScriptRow>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(
    Option::<RowsOrSingle>::deserialize(deserializer)?
      .map(Vec::from)
      .unwrap_or_default(),
  )
}

/// Decode a JSON value that is either a row array or a single row object.
/// `null` yields no rows.
pub fn rows_from_value(value: Value) -> Result<Vec<ScriptRow>> {
  Ok(
    serde_json::from_value::<Option<RowsOrSingle>>(value)?
      .map(Vec::from)
      .unwrap_or_default(),
  )
}

// ─── Calendar ────────────────────────────────────────────────────────────────

/// One day of a multi-day content plan.
///
/// Accepts either `script: [row, …]` or the singular `content: row` on input;
/// always serialises as `script`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
  pub day:    u32,
  #[serde(default)]
  pub title:  String,
  #[serde(default, alias = "content", deserialize_with = "rows_or_single")]
  pub script: Vec<ScriptRow>,
}

// ─── Tagged content ──────────────────────────────────────────────────────────

/// The body of a script, tagged with the shape it was decoded as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptContent {
  /// A single script, one row per beat.
  Script { rows: Vec<ScriptRow> },
  /// A multi-day plan.
  Calendar { days: Vec<CalendarEntry> },
  /// Stored text that predates structured content.
  Legacy { rows: Vec<ScriptRow> },
}

impl Default for ScriptContent {
  fn default() -> Self { Self::Script { rows: Vec::new() } }
}

impl ScriptContent {
  /// Wrap undecodable stored text as a single placeholder row.
  pub fn legacy(raw: impl Into<String>) -> Self {
    Self::Legacy { rows: vec![ScriptRow::new(LEGACY_VISUAL, raw)] }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Script { .. } => "script",
      Self::Calendar { .. } => "calendar",
      Self::Legacy { .. } => "legacy",
    }
  }

  pub fn is_calendar(&self) -> bool { matches!(self, Self::Calendar { .. }) }

  pub fn is_empty(&self) -> bool {
    match self {
      Self::Script { rows } | Self::Legacy { rows } => rows.is_empty(),
      Self::Calendar { days } => days.is_empty(),
    }
  }

  /// One-line teaser: the first day's title for calendars, the first row's
  /// audio otherwise.
  pub fn preview(&self) -> String {
    match self {
      Self::Calendar { days } => {
        let title = days
          .first()
          .map(|d| d.title.as_str())
          .filter(|t| !t.is_empty())
          .unwrap_or("Content Plan");
        format!("Day 1: {title}")
      }
      Self::Script { rows } | Self::Legacy { rows } => {
        rows.first().map(|r| r.audio.clone()).unwrap_or_default()
      }
    }
  }

  /// Serialise to the untagged JSON text stored in the `content` column.
  ///
  /// Untouched legacy content is written back as its original text so it
  /// keeps reading as legacy; edited legacy rows are stored as a script.
  pub fn encode_stored(&self) -> Result<String> {
    let text = match self {
      Self::Legacy { rows } => match rows.as_slice() {
        [only] if only.visual == LEGACY_VISUAL => only.audio.clone(),
        rows => serde_json::to_string(rows)?,
      },
      Self::Script { rows } => serde_json::to_string(rows)?,
      Self::Calendar { days } => serde_json::to_string(days)?,
    };
    Ok(text)
  }

  /// Decode the stored `content` column. Never fails: text that cannot be
  /// read as structured content becomes [`ScriptContent::Legacy`].
  ///
  /// An array is read as a calendar when `calendar_days > 0` or its first
  /// element carries a `day` field. A dayless array that is not a calendar
  /// still reads as rows.
  pub fn decode_stored(raw: Option<&str>, calendar_days: u32) -> Self {
    let Some(text) = raw.filter(|t| !t.trim().is_empty()) else {
      return Self::default();
    };

    match serde_json::from_str::<Value>(text) {
      // Double-encoded: the column holds a JSON string containing the JSON.
      Ok(Value::String(inner)) => {
        if inner.trim().is_empty() {
          return Self::default();
        }
        match serde_json::from_str::<Value>(&inner) {
          Ok(value) => Self::from_value(value, calendar_days)
            .unwrap_or_else(|| Self::legacy(inner.as_str())),
          Err(_) => Self::legacy(inner),
        }
      }
      Ok(value) => {
        Self::from_value(value, calendar_days).unwrap_or_else(|| Self::legacy(text))
      }
      Err(_) => Self::legacy(text),
    }
  }

  fn from_value(value: Value, calendar_days: u32) -> Option<Self> {
    match value {
      Value::Null => Some(Self::default()),
      Value::Array(items) => {
        let has_days = items.first().is_some_and(|first| first.get("day").is_some());
        let items = Value::Array(items);
        if calendar_days > 0 || has_days {
          if let Ok(days) = serde_json::from_value(items.clone()) {
            return Some(Self::Calendar { days });
          }
          // Entries that carry a day but fail to decode are not rows either.
          if has_days {
            return None;
          }
        }
        // A row array saved alongside a day count still reads as rows.
        serde_json::from_value(items).ok().map(|rows| Self::Script { rows })
      }
      Value::Object(map) => {
        if map.contains_key("kind") {
          serde_json::from_value(Value::Object(map)).ok()
        } else if map.contains_key("visual") || map.contains_key("audio") {
          serde_json::from_value::<ScriptRow>(Value::Object(map))
            .ok()
            .map(|row| Self::Script { rows: vec![row] })
        } else {
          None
        }
      }
      _ => None,
    }
  }
}
