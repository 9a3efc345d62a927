//! Fire-and-forget side effects.

use std::{fmt::Display, future::Future};

use tokio::task::JoinHandle;

/// Run `task` on its own tokio task. Failure is logged and otherwise
/// ignored; nothing retries. The request path never awaits the handle.
pub fn spawn_detached<F, E>(what: &'static str, task: F) -> JoinHandle<()>
where
  F: Future<Output = Result<(), E>> + Send + 'static,
  E: Display + Send + 'static,
{
  tokio::spawn(async move {
    if let Err(e) = task.await {
      tracing::warn!(task = what, error = %e, "background task failed");
    }
  })
}
