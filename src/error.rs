//! Typed failures for the generate/execute pipeline.
//!
//! Every variant is terminal for the action that triggered it: the app loop
//! turns it into a transcript message and an error popup, never a crash.

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
  /// A required credential (API key or connection string) was never set.
  #[error("not configured: {0}")]
  Unconfigured(&'static str),

  /// The hosted generation call failed (network, quota, malformed response).
  #[error("provider error: {0}")]
  Provider(String),

  /// The cleaned completion did not look like a SELECT query. Carries the
  /// offending text so the UI can show what came back.
  #[error("generated text is not a valid query: {0}")]
  InvalidSqlShape(String),

  /// The account lists no model at all at configuration time.
  #[error("no compatible model available")]
  NoModelAvailable,

  /// The database driver rejected the connect, execute, or read.
  #[error("query execution failed: {0}")]
  QueryExecution(String),
}

impl From<reqwest::Error> for ChatError {
  fn from(e: reqwest::Error) -> Self {
    ChatError::Provider(e.to_string())
  }
}

impl From<sqlx::Error> for ChatError {
  fn from(e: sqlx::Error) -> Self {
    ChatError::QueryExecution(e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_carries_detail() {
    let e = ChatError::InvalidSqlShape("DROP TABLE authors".to_string());
    assert!(e.to_string().contains("DROP TABLE authors"));

    let e = ChatError::Unconfigured("api key");
    assert!(e.to_string().contains("api key"));
  }
}
