//! Shared color palette and widget styles for pubs-chat.
//!
//! Kept as its own crate so the styles stay consistent across components
//! without dragging the whole application into scope.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};

/// The palette every style function draws from.
pub struct Palette {
  pub background: Color,
  pub surface: Color,
  pub foreground: Color,
  pub muted: Color,
  pub accent: Color,
  pub user: Color,
  pub assistant: Color,
  pub warning: Color,
  pub error: Color,
  pub success: Color,
}

static PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
  background: Color::Reset,
  surface: Color::Rgb(30, 34, 42),
  foreground: Color::Gray,
  muted: Color::DarkGray,
  accent: Color::Cyan,
  user: Color::LightBlue,
  assistant: Color::LightGreen,
  warning: Color::Yellow,
  error: Color::LightRed,
  success: Color::Green,
});

pub fn bg_primary() -> Style {
  Style::default().bg(PALETTE.background)
}

pub fn title() -> Style {
  Style::default().fg(PALETTE.accent).add_modifier(Modifier::BOLD)
}

pub fn border_normal() -> Style {
  Style::default().fg(PALETTE.muted)
}

pub fn border_focused() -> Style {
  Style::default().fg(PALETTE.accent)
}

pub fn input() -> Style {
  Style::default().fg(PALETTE.foreground)
}

pub fn muted() -> Style {
  Style::default().fg(PALETTE.muted)
}

pub fn user_label() -> Style {
  Style::default().fg(PALETTE.user).add_modifier(Modifier::BOLD)
}

pub fn assistant_label() -> Style {
  Style::default().fg(PALETTE.assistant).add_modifier(Modifier::BOLD)
}

pub fn sql() -> Style {
  Style::default().fg(PALETTE.assistant)
}

pub fn warning() -> Style {
  Style::default().fg(PALETTE.warning)
}

pub fn error() -> Style {
  Style::default().fg(PALETTE.error).add_modifier(Modifier::BOLD)
}

pub fn success() -> Style {
  Style::default().fg(PALETTE.success)
}

pub fn selection() -> Style {
  Style::default().bg(PALETTE.surface).add_modifier(Modifier::BOLD)
}

pub fn table_header() -> Style {
  Style::default().fg(PALETTE.accent).add_modifier(Modifier::BOLD)
}
