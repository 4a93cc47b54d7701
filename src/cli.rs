use clap::Parser;

use crate::utils::version;

/// Env vars checked for the generation API key, in order.
pub const API_KEY_ENV_VARS: [&str; 3] = ["GOOGLE_API_KEY", "GEMINI_API_KEY", "GOOGLE_AI_KEY"];

/// Env var checked for the database connection string.
pub const DB_CONNECTION_ENV_VAR: &str = "DB_CONNECTION_STRING";

#[derive(Parser, Debug, Default)]
#[command(author, version = version(), about)]
pub struct Cli {
  // Performance tuning options
  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 1.0)]
  pub tick_rate: f64,

  #[arg(
    short('r'),
    long,
    value_name = "FLOAT",
    help = "Frame rate, i.e. number of frames per second",
    default_value_t = 4.0
  )]
  pub frame_rate: f64,

  // Generator options
  #[arg(long = "api-key", value_name = "KEY", help = "Google AI API key (falls back to GOOGLE_API_KEY/GEMINI_API_KEY/GOOGLE_AI_KEY)")]
  pub api_key: Option<String>,

  #[arg(short('m'), long = "model", value_name = "MODEL", help = "Pin a model instead of auto-selecting one")]
  pub model: Option<String>,

  // Database options
  #[arg(
    long = "connection-string",
    value_name = "CONNECTION_STRING",
    help = "Database connection string (falls back to DB_CONNECTION_STRING)"
  )]
  pub connection_string: Option<String>,

  #[arg(short('f'), long = "file", value_name = "FILE", help = "SQLite database file to use instead of a server")]
  pub filename: Option<String>,

  #[arg(long = "prompt-credentials", help = "Interactively prompt for any credential not found in flags or env")]
  pub prompt_credentials: bool,
}

impl Cli {
  /// API key with CLI > env priority; `None` leaves the generator
  /// unconfigured rather than failing startup.
  pub fn resolve_api_key(&self) -> Option<String> {
    if let Some(key) = &self.api_key {
      return Some(key.clone());
    }
    for var in API_KEY_ENV_VARS {
      if let Ok(key) = std::env::var(var) {
        if !key.is_empty() {
          return Some(key);
        }
      }
    }
    if self.prompt_credentials {
      let key = Self::prompt_secret("Google AI API key");
      if !key.is_empty() {
        return Some(key);
      }
    }
    None
  }

  /// Connection string with CLI > `--file` > env priority.
  pub fn resolve_connection_string(&self) -> Option<String> {
    if let Some(conn) = &self.connection_string {
      return Some(conn.clone());
    }
    if let Some(file) = &self.filename {
      return Some(format!("sqlite:{file}"));
    }
    if let Ok(conn) = std::env::var(DB_CONNECTION_ENV_VAR) {
      if !conn.is_empty() {
        return Some(conn);
      }
    }
    if self.prompt_credentials {
      let conn = Self::prompt_text("Database connection string");
      if !conn.is_empty() {
        return Some(conn);
      }
    }
    None
  }

  /// Prompt for a secret with better paste support
  pub fn prompt_secret(label: &str) -> String {
    use dialoguer::Password;

    // Try dialoguer first (better paste support)
    match Password::new().with_prompt(label).allow_empty_password(true).interact() {
      Ok(value) => value,
      Err(_) => {
        // Fallback to rpassword if dialoguer fails
        eprintln!("Primary input failed, trying fallback...");
        eprintln!("Tip: Use Ctrl+Shift+V or right-click to paste in most terminals");

        rpassword::prompt_password(format!("{label} (fallback): ")).unwrap_or_else(|_| {
          eprintln!("All input methods failed. Set the value via environment variable or flag instead.");
          String::new()
        })
      },
    }
  }

  pub fn prompt_text(label: &str) -> String {
    use dialoguer::Input;

    Input::<String>::new()
      .with_prompt(label)
      .allow_empty(true)
      .interact_text()
      .unwrap_or_default()
  }
}
