use std::time::Instant;

use color_eyre::eyre::Result;

use super::{Chat, EXPORT_FILE_NAME};
use crate::{
  action::Action,
  components::ComponentKind,
  transcript::Role,
};

impl Chat {
  pub(super) fn handle_update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::SubmitQuestion(question) => {
        self.transcript.append(Role::User, question);
        self.is_generating = true;
        self.error_message = None;
        self.scroll_to_tail();
      },
      Action::SqlGenerated(sql) => {
        self.is_generating = false;
        self.transcript.append(Role::Assistant, format!("Generated SQL:\n```sql\n{sql}\n```"));
        self.pending_sql = Some(sql);
        self.scroll_to_tail();
      },
      Action::ExecutePending => {
        if let Some(sql) = self.pending_sql.clone() {
          return Ok(Some(Action::ExecuteSql(sql)));
        }
        self.error_message = Some("No generated SQL to execute yet".to_string());
      },
      Action::ExecuteSql(_) => {
        self.is_query_running = true;
        self.query_start_time = Some(Instant::now());
      },
      Action::QueryResult(result) => {
        self.is_query_running = false;
        self.query_start_time = None;
        self.transcript.append(Role::Assistant, result.summary());
        self.results = Some(result);
        self.selected_row_index = 0;
        self.horizontal_scroll_offset = 0;
        self.scroll_to_tail();
      },
      Action::Error(message) => {
        self.is_generating = false;
        self.is_query_running = false;
        self.query_start_time = None;
        self.transcript.append(Role::Assistant, format!("Error: {message}"));
        self.error_message = Some(message);
        self.scroll_to_tail();
      },
      Action::ClearTranscript => {
        self.transcript.clear();
        self.pending_sql = None;
        self.results = None;
        self.transcript_scroll = 0;
        self.error_message = None;
      },
      Action::ExportTranscript => {
        let path = self.export_dir.join(EXPORT_FILE_NAME);
        match std::fs::write(&path, self.transcript.export()) {
          Ok(()) => {
            let shown = path.display().to_string();
            self.export_status = Some((format!("Exported to {shown}"), Instant::now()));
            return Ok(Some(Action::TranscriptExported(shown)));
          },
          Err(e) => {
            self.error_message = Some(format!("Export failed: {e}"));
          },
        }
      },
      Action::TranscriptScrollUp => {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
      },
      Action::TranscriptScrollDown => {
        self.transcript_scroll = self.transcript_scroll.saturating_add(1);
      },
      Action::RowMoveDown => {
        if let Some(results) = &self.results {
          if !results.rows.is_empty() && self.selected_component == ComponentKind::Results {
            if self.selected_row_index < results.rows.len() - 1 {
              self.selected_row_index += 1;
            } else {
              self.selected_row_index = 0; // Wrap to top
            }
          }
        }
      },
      Action::RowMoveUp => {
        if let Some(results) = &self.results {
          if !results.rows.is_empty() && self.selected_component == ComponentKind::Results {
            if self.selected_row_index > 0 {
              self.selected_row_index -= 1;
            } else {
              self.selected_row_index = results.rows.len() - 1; // Wrap to bottom
            }
          }
        }
      },
      Action::ScrollTableLeft => {
        self.horizontal_scroll_offset = self.horizontal_scroll_offset.saturating_sub(1);
      },
      Action::ScrollTableRight => {
        if let Some(results) = &self.results {
          let max = results.column_count().saturating_sub(super::VISIBLE_COLUMNS);
          if self.horizontal_scroll_offset < max {
            self.horizontal_scroll_offset += 1;
          }
        }
      },
      Action::FocusInput => {
        self.selected_component = ComponentKind::Input;
      },
      Action::FocusTranscript => {
        self.selected_component = ComponentKind::Transcript;
      },
      Action::FocusResults => {
        if self.results.is_some() {
          self.selected_component = ComponentKind::Results;
        }
      },
      Action::Help => {
        self.show_help = !self.show_help;
      },
      Action::Tick => {
        // Export feedback fades out after a few seconds.
        if let Some((_, at)) = &self.export_status {
          if at.elapsed().as_secs() >= 5 {
            self.export_status = None;
          }
        }
      },
      _ => {},
    }
    Ok(None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sql::QueryResult;

  fn chat_with_result(rows: usize) -> Chat {
    let mut chat = Chat::new();
    let result = QueryResult {
      headers: vec!["title".to_string()],
      rows: (0..rows).map(|i| vec![format!("book {i}")]).collect(),
    };
    chat.handle_update(Action::QueryResult(result)).unwrap();
    chat
  }

  #[test]
  fn submit_appends_user_message_and_marks_generating() {
    let mut chat = Chat::new();
    chat.handle_update(Action::SubmitQuestion("Autores de California".to_string())).unwrap();
    assert_eq!(chat.transcript.len(), 1);
    assert_eq!(chat.transcript.all()[0].role, Role::User);
    assert!(chat.is_generating);
  }

  #[test]
  fn generated_sql_becomes_pending() {
    let mut chat = Chat::new();
    chat.handle_update(Action::SubmitQuestion("q".to_string())).unwrap();
    chat.handle_update(Action::SqlGenerated("SELECT * FROM authors".to_string())).unwrap();
    assert_eq!(chat.pending_sql.as_deref(), Some("SELECT * FROM authors"));
    assert!(!chat.is_generating);
    assert_eq!(chat.transcript.len(), 2);
  }

  #[test]
  fn execute_pending_without_sql_sets_error() {
    let mut chat = Chat::new();
    let followup = chat.handle_update(Action::ExecutePending).unwrap();
    assert!(followup.is_none());
    assert!(chat.error_message.is_some());
  }

  #[test]
  fn execute_pending_forwards_sql() {
    let mut chat = Chat::new();
    chat.handle_update(Action::SqlGenerated("SELECT 1 FROM t".to_string())).unwrap();
    let followup = chat.handle_update(Action::ExecutePending).unwrap();
    assert_eq!(followup, Some(Action::ExecuteSql("SELECT 1 FROM t".to_string())));
  }

  #[test]
  fn query_result_is_summarized_into_transcript() {
    let chat = chat_with_result(3);
    assert_eq!(chat.transcript.len(), 1);
    assert!(chat.transcript.all()[0].content.starts_with("Results (3 rows, 1 columns):"));
    assert!(chat.results.is_some());
  }

  #[test]
  fn row_navigation_wraps() {
    let mut chat = chat_with_result(2);
    chat.selected_component = ComponentKind::Results;
    chat.handle_update(Action::RowMoveDown).unwrap();
    assert_eq!(chat.selected_row_index, 1);
    chat.handle_update(Action::RowMoveDown).unwrap();
    assert_eq!(chat.selected_row_index, 0);
    chat.handle_update(Action::RowMoveUp).unwrap();
    assert_eq!(chat.selected_row_index, 1);
  }

  #[test]
  fn clear_resets_conversation_state() {
    let mut chat = chat_with_result(1);
    chat.pending_sql = Some("SELECT 1 FROM t".to_string());
    chat.handle_update(Action::ClearTranscript).unwrap();
    assert!(chat.transcript.is_empty());
    assert!(chat.pending_sql.is_none());
    assert!(chat.results.is_none());
  }

  #[test]
  fn export_writes_transcript_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut chat = Chat::new();
    chat.export_dir = dir.path().to_path_buf();
    chat.transcript.append(Role::User, "show authors");
    chat.transcript.append(Role::Assistant, "SELECT * FROM authors");

    let followup = chat.handle_update(Action::ExportTranscript).unwrap();
    let expected = dir.path().join(EXPORT_FILE_NAME);
    assert_eq!(followup, Some(Action::TranscriptExported(expected.display().to_string())));
    assert!(chat.export_status.is_some());

    let text = std::fs::read_to_string(expected).unwrap();
    assert!(text.contains("## User - Message 1"));
    assert!(text.contains("SELECT * FROM authors"));
  }

  #[test]
  fn export_failure_sets_error_message() {
    let mut chat = Chat::new();
    chat.export_dir = std::path::PathBuf::from("/nonexistent-dir/nowhere");
    chat.transcript.append(Role::User, "q");

    let followup = chat.handle_update(Action::ExportTranscript).unwrap();
    assert!(followup.is_none());
    assert!(chat.error_message.as_deref().unwrap().starts_with("Export failed:"));
  }

  #[test]
  fn errors_land_in_transcript_and_popup() {
    let mut chat = Chat::new();
    chat.handle_update(Action::Error("provider error: quota".to_string())).unwrap();
    assert_eq!(chat.transcript.len(), 1);
    assert!(chat.transcript.all()[0].content.contains("quota"));
    assert!(chat.error_message.is_some());
  }
}
