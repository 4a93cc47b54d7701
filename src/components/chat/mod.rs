pub mod handlers;
pub mod rendering;
pub mod state;

use std::{path::PathBuf, time::Instant};

use color_eyre::eyre::Result;
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

use super::{Component, ComponentKind, Frame};
use crate::{action::Action, config::Config, sql::QueryResult, transcript::Transcript};

/// How many result columns are shown at once; h/l scrolls the window.
const VISIBLE_COLUMNS: usize = 4;

/// Export lands in the working directory, same name every time.
pub const EXPORT_FILE_NAME: &str = "pubs_chat_export.txt";

/// Canned questions reachable from the help popup with 1-5.
pub const QUICK_EXAMPLES: [&str; 5] = [
  "Autores de California",
  "Libros de negocios",
  "Top 5 libros más vendidos",
  "Autores con contrato",
  "Ventas por tienda",
];

/// The single screen of the app: transcript, generated-SQL preview, result
/// table, and the question input, stacked vertically.
pub struct Chat {
  pub command_tx: Option<UnboundedSender<Action>>,
  pub config: Config,

  // Conversation
  pub transcript: Transcript,
  pub transcript_scroll: usize,

  // Question input
  pub input: TextArea<'static>,

  // Latest generated statement, waiting for a user-triggered run
  pub pending_sql: Option<String>,

  // Query results
  pub results: Option<QueryResult>,
  pub selected_row_index: usize,
  pub horizontal_scroll_offset: usize,

  // Component state
  pub selected_component: ComponentKind,
  pub show_help: bool,
  pub error_message: Option<String>,
  pub export_status: Option<(String, Instant)>,
  pub export_dir: PathBuf,

  // In-flight indicators
  pub is_generating: bool,
  pub is_query_running: bool,
  pub query_start_time: Option<Instant>,

  // Configuration status shown in the status line
  pub model_name: Option<String>,
  pub masked_key: Option<String>,
  pub executor_ready: bool,
}

impl Default for Chat {
  fn default() -> Self {
    Self::new()
  }
}

impl Chat {
  pub fn new() -> Self {
    let mut input = TextArea::default();
    input.set_placeholder_text("Ask a question about the pubs database...");
    Self {
      command_tx: None,
      config: Config::default(),
      transcript: Transcript::new(),
      transcript_scroll: 0,
      input,
      pending_sql: None,
      results: None,
      selected_row_index: 0,
      horizontal_scroll_offset: 0,
      selected_component: ComponentKind::Transcript,
      show_help: false,
      error_message: None,
      export_status: None,
      export_dir: PathBuf::from("."),
      is_generating: false,
      is_query_running: false,
      query_start_time: None,
      model_name: None,
      masked_key: None,
      executor_ready: false,
    }
  }

  /// Configuration feedback wired in once at startup.
  pub fn set_generator_status(&mut self, model_name: Option<String>, masked_key: Option<String>) {
    self.model_name = model_name;
    self.masked_key = masked_key;
  }

  pub fn set_executor_status(&mut self, ready: bool) {
    self.executor_ready = ready;
  }

  pub fn generator_ready(&self) -> bool {
    self.model_name.is_some()
  }

  fn scroll_to_tail(&mut self) {
    self.transcript_scroll = usize::MAX;
  }
}

impl Component for Chat {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn register_config_handler(&mut self, config: Config) -> Result<()> {
    self.config = config;
    Ok(())
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    self.handle_update(action)
  }

  fn handle_events(&mut self, event: Option<crate::tui::Event>) -> Result<Option<Action>> {
    if let Some(crate::tui::Event::Key(key)) = event {
      self.handle_key_events(key)
    } else {
      Ok(None)
    }
  }

  fn handle_key_events(&mut self, key: crossterm::event::KeyEvent) -> Result<Option<Action>> {
    self.handle_key(key)
  }

  fn init(&mut self, _area: Rect) -> Result<()> {
    Ok(())
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    self.render(f, area)
  }
}
