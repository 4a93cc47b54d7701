//! Query execution against the pubs database.
//!
//! One connection per user-triggered run: connect, execute, materialize all
//! rows, close unconditionally. The SQL is trusted as generated; there is no
//! sanitizing, no transaction handling, and no retry.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{
  postgres::{PgColumn, PgPoolOptions, PgRow},
  sqlite::{SqliteColumn, SqlitePoolOptions, SqliteRow},
  types::Uuid,
  Column, Row,
};
use tokio_stream::StreamExt as OtherStream;

use crate::error::ChatError;

/// In-memory tabular result: named columns, row-major string values.
/// Transient; rendered and summarized into the transcript, never retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl QueryResult {
  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn column_count(&self) -> usize {
    self.headers.len()
  }

  /// Plain-text rendering of the first `max_rows` rows, columns padded to
  /// their widest value, suitable for a transcript entry.
  pub fn to_text(&self, max_rows: usize) -> String {
    if self.headers.is_empty() {
      return String::from("(no columns)");
    }

    let shown = self.rows.iter().take(max_rows).collect::<Vec<_>>();
    let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
    for row in &shown {
      for (i, cell) in row.iter().enumerate() {
        if i < widths.len() {
          widths[i] = widths[i].max(cell.len());
        }
      }
    }

    let render = |cells: &[String]| -> String {
      cells
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c, width = widths.get(i).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
    };

    let mut out = render(&self.headers);
    for row in &shown {
      out.push('\n');
      out.push_str(&render(row));
    }
    if self.rows.len() > max_rows {
      out.push_str(&format!("\n... ({} more rows)", self.rows.len() - max_rows));
    }
    out
  }

  /// The transcript entry body for an executed query.
  pub fn summary(&self) -> String {
    format!("Results ({} rows, {} columns):\n{}", self.row_count(), self.column_count(), self.to_text(10))
  }
}

#[async_trait]
pub trait Queryer: Send + Sync {
  /// Connect-and-disconnect check used when a connection string is set.
  async fn probe(&self) -> Result<(), ChatError>;

  /// Runs the statement and reads every row into memory. The connection is
  /// closed before this returns, success or not.
  async fn execute(&self, sql: &str) -> Result<QueryResult, ChatError>;
}

pub struct Sqlite {
  url: String,
}

impl Sqlite {
  pub fn new(filename: &str) -> Self {
    let url = if filename.starts_with("sqlite:") { filename.to_string() } else { format!("sqlite:{filename}") };
    Self { url }
  }
}

#[async_trait]
impl Queryer for Sqlite {
  async fn probe(&self) -> Result<(), ChatError> {
    let pool = SqlitePoolOptions::new().max_connections(1).connect(&self.url).await?;
    pool.close().await;
    Ok(())
  }

  async fn execute(&self, sql: &str) -> Result<QueryResult, ChatError> {
    let pool = SqlitePoolOptions::new().max_connections(1).connect(&self.url).await?;
    let result = fetch_sqlite(&pool, sql).await;
    pool.close().await;
    result
  }
}

pub struct Postgres {
  conn_str: String,
}

impl Postgres {
  pub fn new(conn_str: &str) -> Self {
    Self { conn_str: conn_str.to_string() }
  }
}

#[async_trait]
impl Queryer for Postgres {
  async fn probe(&self) -> Result<(), ChatError> {
    let pool = PgPoolOptions::new().max_connections(1).connect(&self.conn_str).await?;
    pool.close().await;
    Ok(())
  }

  async fn execute(&self, sql: &str) -> Result<QueryResult, ChatError> {
    let pool = PgPoolOptions::new().max_connections(1).connect(&self.conn_str).await?;
    let result = fetch_pg(&pool, sql).await;
    pool.close().await;
    result
  }
}

async fn fetch_sqlite(pool: &sqlx::SqlitePool, sql: &str) -> Result<QueryResult, ChatError> {
  let mut rows = sqlx::query(sql).fetch(pool);

  let mut headers = vec![];
  let mut results = vec![];
  while let Some(row) = rows.try_next().await? {
    if headers.is_empty() {
      headers = row.columns().iter().map(|c| c.name().to_string()).collect();
    }
    let mut row_result = vec![];
    for c in row.columns() {
      row_result.push(cell_text(get_sqlite_value(&row, c)));
    }

    results.push(row_result);
  }

  Ok(QueryResult { headers, rows: results })
}

async fn fetch_pg(pool: &sqlx::PgPool, sql: &str) -> Result<QueryResult, ChatError> {
  let mut rows = sqlx::query(sql).fetch(pool);

  let mut headers = vec![];
  let mut results = vec![];
  while let Some(row) = rows.try_next().await? {
    if headers.is_empty() {
      headers = row.columns().iter().map(|c| c.name().to_string()).collect();
    }
    let mut row_result = vec![];
    for c in row.columns() {
      row_result.push(cell_text(get_pg_value(&row, c)));
    }

    results.push(row_result);
  }

  Ok(QueryResult { headers, rows: results })
}

/// A cell that decodes through no arm of the type cascade still occupies its
/// slot, so every row stays as long as the header list and later values never
/// shift under the wrong column.
fn cell_text(value: Result<String, ChatError>) -> String {
  value.unwrap_or_else(|_| "?".to_string())
}

/// `true` when the target looks like a SQLite file rather than a server URL.
pub fn is_sqlite_target(conn_str: &str) -> bool {
  conn_str.starts_with("sqlite:")
    || conn_str.ends_with(".db")
    || conn_str.ends_with(".sqlite")
    || conn_str.ends_with(".sqlite3")
}

/// The configuration gate in front of a backend. `execute` with nothing set
/// fails with `Unconfigured` without attempting any connection.
#[derive(Default)]
pub struct Executor {
  target: Option<Box<dyn Queryer>>,
  connection_string: Option<String>,
}

impl Executor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores the connection string and runs the connect-and-disconnect probe.
  /// The target stays set even if the probe fails, matching the manual-entry
  /// flow where a database may come up later.
  pub async fn set_connection_string(&mut self, conn_str: &str) -> Result<(), ChatError> {
    let target: Box<dyn Queryer> = if is_sqlite_target(conn_str) {
      Box::new(Sqlite::new(conn_str))
    } else {
      Box::new(Postgres::new(conn_str))
    };
    let probe = target.probe().await;
    self.target = Some(target);
    self.connection_string = Some(conn_str.to_string());
    probe
  }

  pub fn is_configured(&self) -> bool {
    self.target.is_some()
  }

  pub fn connection_string(&self) -> Option<&str> {
    self.connection_string.as_deref()
  }

  pub async fn execute(&self, sql: &str) -> Result<QueryResult, ChatError> {
    match &self.target {
      Some(target) => target.execute(sql).await,
      None => Err(ChatError::Unconfigured("connection string")),
    }
  }
}

#[macro_export]
macro_rules! get_or_null {
  ($value:expr) => {
    $value.map_or("NULL".to_string(), |v| v.to_string())
  };
}

fn get_sqlite_value(row: &SqliteRow, column: &SqliteColumn) -> Result<String, ChatError> {
  let column_name = column.name();
  if let Ok(value) = row.try_get(column_name) {
    let value: Option<i16> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<i32> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<i64> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<f64> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: String = value;
    Ok(value)
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<chrono::DateTime<chrono::Utc>> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<NaiveDateTime> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<NaiveDate> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<NaiveTime> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<serde_json::Value> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get::<Option<bool>, _>(column_name) {
    let value: Option<bool> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<&[u8]> = value;
    Ok(value.map_or("NULL".to_string(), |values| {
      format!("\\x{}", values.iter().map(|v| format!("{v:02x}")).collect::<String>())
    }))
  } else {
    Err(ChatError::QueryExecution(format!("Unknown type for column {column_name}")))
  }
}

fn get_pg_value(row: &PgRow, column: &PgColumn) -> Result<String, ChatError> {
  let column_name = column.name();
  if let Ok(value) = row.try_get(column_name) {
    let value: Option<i16> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<i32> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<i64> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<rust_decimal::Decimal> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<f64> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: String = value;
    Ok(value)
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<chrono::DateTime<chrono::Utc>> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<chrono::DateTime<chrono::Local>> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<NaiveDateTime> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<NaiveDate> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<NaiveTime> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<serde_json::Value> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get::<Option<bool>, _>(column_name) {
    let value: Option<bool> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<Vec<String>> = value;
    Ok(value.map_or("NULL".to_string(), |v| v.join(",")))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<Uuid> = value;
    Ok(get_or_null!(value))
  } else if let Ok(value) = row.try_get(column_name) {
    let value: Option<&[u8]> = value;
    Ok(value.map_or("NULL".to_string(), |values| {
      format!("\\x{}", values.iter().map(|v| format!("{v:02x}")).collect::<String>())
    }))
  } else {
    Err(ChatError::QueryExecution(format!("Unknown type for column {column_name}")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> QueryResult {
    QueryResult {
      headers: vec!["au_lname".to_string(), "state".to_string()],
      rows: vec![
        vec!["Bennet".to_string(), "CA".to_string()],
        vec!["Green".to_string(), "CA".to_string()],
        vec!["Ringer".to_string(), "UT".to_string()],
      ],
    }
  }

  #[test]
  fn counts_match_shape() {
    let r = sample();
    assert_eq!(r.row_count(), 3);
    assert_eq!(r.column_count(), 2);
  }

  #[test]
  fn to_text_truncates_and_notes_remainder() {
    let r = sample();
    let text = r.to_text(2);
    assert!(text.contains("au_lname"));
    assert!(text.contains("Bennet"));
    assert!(!text.contains("Ringer"));
    assert!(text.contains("(1 more rows)"));
  }

  #[test]
  fn summary_reports_row_and_column_counts() {
    let summary = sample().summary();
    assert!(summary.starts_with("Results (3 rows, 2 columns):"));
  }

  #[test]
  fn undecodable_cell_keeps_its_column_slot() {
    assert_eq!(cell_text(Ok("Bennet".to_string())), "Bennet");
    assert_eq!(cell_text(Err(ChatError::QueryExecution("Unknown type for column pay_span".to_string()))), "?");
  }

  #[test]
  fn sqlite_target_detection() {
    assert!(is_sqlite_target("pubs.db"));
    assert!(is_sqlite_target("sqlite::memory:"));
    assert!(is_sqlite_target("/tmp/test.sqlite"));
    assert!(!is_sqlite_target("postgresql://localhost/pubs"));
  }
}
