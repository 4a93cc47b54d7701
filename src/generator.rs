//! Natural language to SQL for the fixed pubs schema.
//!
//! Holds the static schema description, formats it into one prompt per
//! question, and gates the reply behind a cheap SELECT/FROM substring check.
//! The check is a heuristic, not a parser: it can admit malformed SQL and
//! will happily accept `SELECT ... FROM t; DROP TABLE t`.

use std::sync::Arc;

use tracing::info;

use crate::{error::ChatError, llm::LlmClient};

/// Schema description handed to the model verbatim. The database is the
/// classic SQL Server `pubs` sample; nothing is introspected at runtime.
pub const PUBS_SCHEMA: &str = r#"
### PUBS DATABASE SCHEMA ###

**MAIN TABLES:**

1. **authors**
   - au_id (varchar) - unique author id
   - au_lname (varchar) - last name
   - au_fname (varchar) - first name
   - phone (char) - phone number
   - address (varchar) - street address
   - city (varchar) - city
   - state (char) - state
   - zip (char) - postal code
   - contract (bit) - whether the author is under contract

2. **publishers**
   - pub_id (char) - publisher id
   - pub_name (varchar) - publisher name
   - city (varchar) - city
   - state (char) - state
   - country (varchar) - country

3. **titles**
   - title_id (varchar) - title id
   - title (varchar) - book title
   - type (char) - category (business, psychology, etc.)
   - pub_id (char) - publisher id (FK to publishers)
   - price (money) - price
   - advance (money) - advance paid
   - royalty (int) - royalty percentage
   - ytd_sales (int) - year-to-date sales
   - notes (varchar) - notes
   - pubdate (datetime) - publication date

4. **titleauthor**
   - au_id (varchar) - author id (FK to authors)
   - title_id (varchar) - title id (FK to titles)
   - au_ord (tinyint) - author order
   - royaltyper (int) - royalty share

5. **sales**
   - stor_id (char) - store id
   - ord_num (varchar) - order number
   - ord_date (datetime) - order date
   - qty (smallint) - quantity
   - payterms (varchar) - payment terms
   - title_id (varchar) - title id (FK to titles)

6. **stores**
   - stor_id (char) - store id
   - stor_name (varchar) - store name
   - stor_address (varchar) - street address
   - city (varchar) - city
   - state (char) - state
   - zip (char) - postal code

**RELATIONSHIPS:**
- authors <-> titleauthor <-> titles
- publishers -> titles
- titles -> sales -> stores
"#;

pub const DEFAULT_PREFERRED_MODELS: [&str; 4] =
  ["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.0-pro", "gemini-pro"];

/// Builds the full prompt: instruction block + schema + question.
pub fn build_prompt(question: &str) -> String {
  format!(
    "You are an expert in SQL Server and the pubs database.\n\
     Convert the following natural-language question into a valid SQL Server query.\n\
     \n\
     DATABASE SCHEMA:\n\
     {PUBS_SCHEMA}\n\
     \n\
     IMPORTANT RULES:\n\
     1. Return ONLY the SQL code, with no explanations\n\
     2. Use JOINs where tables need to be related\n\
     3. Include the fields relevant to the question\n\
     4. Use WHERE to filter where appropriate\n\
     5. Use ORDER BY to sort where relevant\n\
     6. Use aggregate functions (COUNT, SUM, AVG) where needed\n\
     7. Make sure the syntax is valid for SQL Server\n\
     8. Do not include any extra text, only the SQL code\n\
     \n\
     QUESTION: {question}\n\
     \n\
     SQL:"
  )
}

/// Strips leading/trailing whitespace and any code-fence markup from a raw
/// completion.
pub fn clean_sql(raw: &str) -> String {
  raw.replace("```sql", "").replace("```", "").trim().to_string()
}

/// The two-keyword heuristic: both SELECT and FROM must occur somewhere,
/// case-insensitive. Nothing stronger is guaranteed.
pub fn looks_like_select(sql: &str) -> bool {
  if sql.is_empty() {
    return false;
  }
  let upper = sql.to_uppercase();
  upper.contains("SELECT") && upper.contains("FROM")
}

/// Picks the first preferred model that is a substring match against an
/// available name (list order is priority order), else the first available
/// model, else nothing. Pure so it is testable without a live provider.
pub fn select_model(preferred: &[String], available: &[String]) -> Option<String> {
  for wanted in preferred {
    for name in available {
      if name.contains(wanted.as_str()) {
        return Some(name.clone());
      }
    }
  }
  available.first().cloned()
}

pub struct SqlGenerator {
  client: Option<Arc<dyn LlmClient>>,
  model: Option<String>,
  preferred_models: Vec<String>,
}

impl SqlGenerator {
  pub fn new(preferred_models: Vec<String>) -> Self {
    let preferred_models = if preferred_models.is_empty() {
      DEFAULT_PREFERRED_MODELS.iter().map(|s| s.to_string()).collect()
    } else {
      preferred_models
    };
    Self { client: None, model: None, preferred_models }
  }

  /// Attaches a client and resolves the model to use, once, at configuration
  /// time. Fails with `NoModelAvailable` when the account lists nothing.
  pub async fn configure(&mut self, client: Arc<dyn LlmClient>, model_override: Option<String>) -> Result<String, ChatError> {
    let model = match model_override {
      Some(m) => m,
      None => {
        let available = client.list_models().await?;
        select_model(&self.preferred_models, &available).ok_or(ChatError::NoModelAvailable)?
      },
    };

    info!("selected model: {model}");
    self.client = Some(client);
    self.model = Some(model.clone());
    Ok(model)
  }

  pub fn is_configured(&self) -> bool {
    self.client.is_some() && self.model.is_some()
  }

  pub fn model(&self) -> Option<&str> {
    self.model.as_deref()
  }

  /// One network call, no retry. Never returns an empty success: the result
  /// either passes the SELECT/FROM check or comes back as an error.
  pub async fn generate(&self, question: &str) -> Result<String, ChatError> {
    let (client, model) = match (&self.client, &self.model) {
      (Some(c), Some(m)) => (c, m),
      _ => return Err(ChatError::Unconfigured("API key")),
    };

    let prompt = build_prompt(question);
    let raw = client.complete(model, &prompt).await?;
    let sql = clean_sql(&raw);

    if looks_like_select(&sql) {
      Ok(sql)
    } else {
      Err(ChatError::InvalidSqlShape(sql))
    }
  }
}
