use serde::{Deserialize, Serialize};
use strum::Display;

use crate::sql::QueryResult;

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  Quit,
  Refresh,
  Error(String),
  Help,
  FocusInput,
  FocusTranscript,
  FocusResults,
  SubmitQuestion(String),
  SqlGenerated(String),
  ExecutePending,
  ExecuteSql(String),
  QueryResult(QueryResult),
  TranscriptScrollUp,
  TranscriptScrollDown,
  RowMoveUp,
  RowMoveDown,
  ScrollTableLeft,
  ScrollTableRight,
  ClearTranscript,
  ExportTranscript,
  TranscriptExported(String),
}
