//! Script generation for ScriptGo.
//!
//! [`generate`] turns a [`ScriptBrief`] into a prompt, sends it to any
//! [`TextGenerator`] (in production, [`GeminiClient`]) and normalizes the
//! reply into a [`GeneratedScript`].

#![allow(async_fn_in_trait)]

pub mod error;
pub mod gemini;
pub mod normalize;
pub mod prompt;

use std::future::Future;

use scriptgo_core::script::ScriptBrief;

pub use error::{Error, Result};
pub use gemini::{GeminiClient, GeminiConfig};
pub use normalize::{GeneratedScript, ResponseFormat, normalize};
pub use prompt::build_prompt;

/// A text-in, text-out generative backend.
pub trait TextGenerator: Send + Sync {
  fn generate<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// The reply format for `brief`: a calendar when days are requested,
/// otherwise the configured single-script format.
pub fn format_for(brief: &ScriptBrief, single: ResponseFormat) -> ResponseFormat {
  match (brief.calendar_days, single) {
    (0, ResponseFormat::CalendarDays { .. }) => ResponseFormat::ScriptRows,
    (0, single) => single,
    (days, _) => ResponseFormat::CalendarDays { days },
  }
}

/// Generate a script for `brief` with `generator`.
pub async fn generate<G: TextGenerator>(
  generator: &G,
  brief:     &ScriptBrief,
  single:    ResponseFormat,
) -> Result<GeneratedScript> {
  let format = format_for(brief, single);
  let prompt = build_prompt(brief, format);

  tracing::info!(
    topic = %brief.topic,
    platform = %brief.platform,
    ?format,
    "generating script"
  );

  let raw = generator.generate(&prompt).await?;
  normalize(&raw, &brief.topic, format)
}
