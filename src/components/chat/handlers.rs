use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::{Chat, QUICK_EXAMPLES};
use crate::{action::Action, components::ComponentKind};

impl Chat {
  pub(super) fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    // Esc dismisses popups before anything else sees the key.
    if let KeyCode::Esc = key.code {
      if self.error_message.is_some() {
        self.error_message = None;
        return Ok(None);
      }
      if self.show_help {
        self.show_help = false;
        return Ok(None);
      }
    }

    match self.selected_component {
      ComponentKind::Input => self.handle_input_key(key),
      ComponentKind::Transcript | ComponentKind::Results => self.handle_browse_key(key),
    }
  }

  fn handle_input_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    match key.code {
      KeyCode::Enter => {
        let question = self.input.lines().join(" ").trim().to_string();
        if question.is_empty() {
          return Ok(None);
        }
        self.input.select_all();
        self.input.cut();
        self.selected_component = ComponentKind::Transcript;
        Ok(Some(Action::SubmitQuestion(question)))
      },
      // Everything else is text editing; keybindings for Input mode only
      // carry esc/ctrl-c, so plain characters always reach the textarea.
      _ => {
        self.input.input(tui_textarea::Input::from(key));
        Ok(None)
      },
    }
  }

  fn handle_browse_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    // Digits fire the canned example questions (also listed in the help
    // popup), matching the quick-example buttons of the original UI.
    if let KeyCode::Char(c) = key.code {
      if let Some(d) = c.to_digit(10) {
        let idx = d as usize;
        if (1..=QUICK_EXAMPLES.len()).contains(&idx) {
          return Ok(Some(Action::SubmitQuestion(QUICK_EXAMPLES[idx - 1].to_string())));
        }
      }
    }
    Ok(None)
  }
}
