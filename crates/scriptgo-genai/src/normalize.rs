//! Turning a model's free-text reply into a [`GeneratedScript`].
//!
//! Models are asked for bare JSON but routinely wrap it in prose or code
//! fences. The normalizer cuts out the outermost JSON span, decodes it
//! according to a [`ResponseFormat`], and falls back where it safely can.

use scriptgo_core::content::{
  CalendarEntry, ScriptContent, ScriptRow, rows_from_value,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Visual text of the single row returned when a reply is not JSON.
pub const FALLBACK_VISUAL: &str = "Error: AI failed to return JSON";

// ─── Format descriptor ───────────────────────────────────────────────────────

/// The reply shape a prompt asks for and the normalizer expects.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
  /// `{"title": …, "script": [{visual, audio}, …]}`
  #[default]
  ScriptRows,
  /// `{"title": …, "content": {visual, audio}}`
  SingleContent,
  /// `[{"day": 1, "title": …, "script" | "content": …}, …]`
  #[serde(skip)]
  CalendarDays { days: u32 },
}

impl ResponseFormat {
  /// Field of the reply object holding the rows, for single formats.
  fn rows_field(self) -> &'static str {
    match self {
      Self::SingleContent => "content",
      Self::ScriptRows | Self::CalendarDays { .. } => "script",
    }
  }

  fn delimiters(self) -> (char, char) {
    match self {
      Self::CalendarDays { .. } => ('[', ']'),
      Self::ScriptRows | Self::SingleContent => ('{', '}'),
    }
  }
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// A freshly generated script, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedScript {
  pub title:   String,
  pub content: ScriptContent,
}

pub fn calendar_title(topic: &str, days: u32) -> String {
  format!("{days}-Day Content Calendar: {topic}")
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// The span from the first `open` to the last `close`, or all of `raw` when
/// there is no such span.
pub fn extract_span(raw: &str, open: char, close: char) -> &str {
  match (raw.find(open), raw.rfind(close)) {
    (Some(start), Some(end)) if start < end => &raw[start..=end],
    _ => raw,
  }
}

/// Normalize a raw model reply.
///
/// Single formats never fail: an undecodable reply becomes one row holding
/// the raw text under [`FALLBACK_VISUAL`]. Calendars fail with
/// [`Error::InvalidCalendar`] instead, since a made-up day would be
/// indistinguishable from a real one.
pub fn normalize(
  raw:    &str,
  topic:  &str,
  format: ResponseFormat,
) -> Result<GeneratedScript> {
  match format {
    ResponseFormat::CalendarDays { days } => normalize_calendar(raw, topic, days),
    single => Ok(normalize_single(raw, topic, single)),
  }
}

fn normalize_single(raw: &str, topic: &str, format: ResponseFormat) -> GeneratedScript {
  let (open, close) = format.delimiters();
  let span = extract_span(raw, open, close);

  match decode_single(span, format.rows_field()) {
    Ok((title, rows)) => GeneratedScript {
      title:   title.unwrap_or_else(|| topic.to_owned()),
      content: ScriptContent::Script { rows },
    },
    Err(e) => {
      tracing::warn!(error = %e, raw, "model reply is not valid JSON, using fallback");
      GeneratedScript {
        title:   topic.to_owned(),
        content: ScriptContent::Script {
          rows: vec![ScriptRow::new(FALLBACK_VISUAL, raw)],
        },
      }
    }
  }
}

fn decode_single(
  span:  &str,
  field: &str,
) -> scriptgo_core::Result<(Option<String>, Vec<ScriptRow>)> {
  let mut value: Value = serde_json::from_str(span)?;
  if !value.is_object() {
    let e = <serde_json::Error as serde::de::Error>::custom("model reply is not a JSON object");
    return Err(e.into());
  }

  let title = value
    .get("title")
    .and_then(Value::as_str)
    .filter(|t| !t.is_empty())
    .map(str::to_owned);

  let rows = match value.get_mut(field) {
    Some(v) => rows_from_value(v.take())?,
    None => Vec::new(),
  };

  Ok((title, rows))
}

fn normalize_calendar(raw: &str, topic: &str, days: u32) -> Result<GeneratedScript> {
  let (open, close) = ResponseFormat::CalendarDays { days }.delimiters();
  let span = extract_span(raw, open, close);

  let entries: Vec<CalendarEntry> = serde_json::from_str(span).map_err(|source| {
    tracing::warn!(error = %source, raw, "model reply is not a valid calendar");
    Error::InvalidCalendar { source }
  })?;

  if entries.len() != days as usize {
    tracing::warn!(
      requested = days,
      returned = entries.len(),
      "calendar day count differs from request"
    );
  }

  Ok(GeneratedScript {
    title:   calendar_title(topic, days),
    content: ScriptContent::Calendar { days: entries },
  })
}
