use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("generation request failed: {0}")]
  Upstream(#[from] reqwest::Error),

  #[error("generation backend returned {status}: {message}")]
  Api { status: u16, message: String },

  #[error("generation backend returned no text")]
  EmptyResponse,

  #[error("model reply is not a valid content calendar: {source}")]
  InvalidCalendar {
    #[source]
    source: serde_json::Error,
  },
}

impl Error {
  /// True when the backend itself failed, as opposed to answering with
  /// something that could not be used.
  pub fn is_upstream(&self) -> bool {
    matches!(self, Self::Upstream(_) | Self::Api { .. } | Self::EmptyResponse)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
