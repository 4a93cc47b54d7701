use async_trait::async_trait;

use pubs_chat::{error::ChatError, llm::LlmClient, sql::QueryResult};

/// Scripted stand-in for the hosted provider.
pub struct MockLlm {
  pub models: Vec<String>,
  pub completion: Result<String, String>,
  pub fail_listing: bool,
}

impl MockLlm {
  pub fn completing(text: &str) -> Self {
    Self {
      models: vec!["models/gemini-1.5-flash".to_string()],
      completion: Ok(text.to_string()),
      fail_listing: false,
    }
  }

  pub fn failing(message: &str) -> Self {
    Self {
      models: vec!["models/gemini-1.5-flash".to_string()],
      completion: Err(message.to_string()),
      fail_listing: false,
    }
  }

  pub fn with_models(models: &[&str]) -> Self {
    Self {
      models: models.iter().map(|s| s.to_string()).collect(),
      completion: Ok(String::new()),
      fail_listing: false,
    }
  }
}

#[async_trait]
impl LlmClient for MockLlm {
  async fn list_models(&self) -> Result<Vec<String>, ChatError> {
    if self.fail_listing {
      return Err(ChatError::Provider("listing failed".to_string()));
    }
    Ok(self.models.clone())
  }

  async fn complete(&self, _model: &str, _prompt: &str) -> Result<String, ChatError> {
    self.completion.clone().map_err(ChatError::Provider)
  }

  fn name(&self) -> &str {
    "mock"
  }
}

pub fn sample_result() -> QueryResult {
  QueryResult {
    headers: vec!["au_lname".to_string(), "au_fname".to_string(), "state".to_string()],
    rows: vec![
      vec!["Bennet".to_string(), "Abraham".to_string(), "CA".to_string()],
      vec!["Green".to_string(), "Marjorie".to_string(), "CA".to_string()],
    ],
  }
}
