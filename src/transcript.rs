//! The append-only chat log for one session.
//!
//! Messages live for the lifetime of the running session only; `export`
//! renders them to text, it does not persist anything reloadable.

use chrono::{DateTime, Local};
use strum::Display;

pub const EMPTY_EXPORT: &str = "No messages to export";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

impl Role {
  pub fn label(&self) -> &'static str {
    match self {
      Role::User => "User",
      Role::Assistant => "Assistant",
    }
  }
}

/// Immutable once appended.
#[derive(Debug, Clone)]
pub struct ChatMessage {
  pub role: Role,
  pub content: String,
  pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptStats {
  pub total_messages: usize,
  pub user_messages: usize,
}

#[derive(Debug, Default)]
pub struct Transcript {
  messages: Vec<ChatMessage>,
}

impl Transcript {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends at the end with the current timestamp. No dedup, no size cap.
  pub fn append(&mut self, role: Role, content: impl Into<String>) {
    self.messages.push(ChatMessage { role, content: content.into(), timestamp: Local::now() });
  }

  pub fn all(&self) -> &[ChatMessage] {
    &self.messages
  }

  pub fn len(&self) -> usize {
    self.messages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }

  pub fn stats(&self) -> TranscriptStats {
    TranscriptStats {
      total_messages: self.messages.len(),
      user_messages: self.messages.iter().filter(|m| m.role == Role::User).count(),
    }
  }

  /// Discards all messages. Irreversible.
  pub fn clear(&mut self) {
    self.messages.clear();
  }

  /// Renders the whole transcript as a Markdown-like document, one block per
  /// message in chronological order.
  pub fn export(&self) -> String {
    if self.messages.is_empty() {
      return EMPTY_EXPORT.to_string();
    }

    let mut out = String::from("# Pubs SQL Chat - Transcript\n\n");
    out.push_str(&format!("Exported: {}\n\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    for (i, message) in self.messages.iter().enumerate() {
      out.push_str(&format!("## {} - Message {}\n\n", message.role.label(), i + 1));
      out.push_str(&message.content);
      out.push_str("\n\n---\n\n");
    }

    out
  }
}
