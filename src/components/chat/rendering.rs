use color_eyre::eyre::Result;
use ratatui::{
  prelude::*,
  widgets::*,
};
use sqlformat::{FormatOptions, QueryParams};

use pubs_chat_theme as theme;

use super::{Chat, QUICK_EXAMPLES, VISIBLE_COLUMNS};
use crate::{components::ComponentKind, transcript::Role};

impl Chat {
  pub(super) fn render(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let has_results = self.results.is_some();
    let results_height = if has_results { 10 } else { 0 };

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(results_height),
        Constraint::Length(4),
        Constraint::Length(1),
      ])
      .split(area);

    self.render_title(f, chunks[0]);
    self.render_transcript(f, chunks[1]);
    if has_results {
      self.render_results(f, chunks[2]);
    }
    self.render_input(f, chunks[3]);
    self.render_status(f, chunks[4]);

    self.render_error(f)?;
    self.render_help(f)?;

    Ok(())
  }

  fn render_title(&self, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
      .borders(Borders::ALL)
      .border_style(theme::border_normal())
      .border_type(BorderType::Rounded)
      .style(theme::bg_primary());

    let title = Paragraph::new(Text::styled(
      "Pubs SQL Chat - [i] Ask [x] Run SQL [r] Results [e] Export [c] Clear [?] Help",
      theme::title(),
    ))
    .block(title_block);

    f.render_widget(title, area);
  }

  fn render_transcript(&mut self, f: &mut Frame<'_>, area: Rect) {
    let is_focused = self.selected_component == ComponentKind::Transcript;
    let stats = self.transcript.stats();
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(if is_focused { theme::border_focused() } else { theme::border_normal() })
      .title(format!("Conversation ({} messages, {} questions)", stats.total_messages, stats.user_messages))
      .title_style(theme::title())
      .border_type(BorderType::Rounded);

    let mut lines: Vec<Line> = Vec::new();
    if self.transcript.is_empty() {
      lines.push(Line::from(Span::styled("No messages yet. Press i to ask, or 1-5 for an example:", theme::muted())));
      for (i, example) in QUICK_EXAMPLES.iter().enumerate() {
        lines.push(Line::from(Span::styled(format!("  {}. {example}", i + 1), theme::muted())));
      }
    }

    for message in self.transcript.all() {
      let (label, style) = match message.role {
        Role::User => ("You", theme::user_label()),
        Role::Assistant => ("Assistant", theme::assistant_label()),
      };
      lines.push(Line::from(vec![
        Span::styled(format!("{label} "), style),
        Span::styled(message.timestamp.format("%H:%M:%S").to_string(), theme::muted()),
      ]));
      for (text, in_sql) in split_sql_blocks(&message.content) {
        for content_line in text.lines() {
          let style = if in_sql { theme::sql() } else { theme::input() };
          lines.push(Line::from(Span::styled(format!("  {content_line}"), style)));
        }
      }
      lines.push(Line::default());
    }

    if self.is_generating {
      lines.push(Line::from(Span::styled("Generating SQL...", theme::warning())));
    }
    if self.is_query_running {
      let elapsed = self.query_start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);
      lines.push(Line::from(Span::styled(format!("Running query... ({elapsed}s)"), theme::warning())));
    }

    // Clamp the scroll offset so the tail request from scroll_to_tail and
    // plain j/k both land inside the content.
    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    self.transcript_scroll = self.transcript_scroll.min(max_scroll);

    let transcript =
      Paragraph::new(lines).block(block).wrap(Wrap { trim: false }).scroll((self.transcript_scroll as u16, 0));
    f.render_widget(transcript, area);
  }

  fn render_results(&self, f: &mut Frame<'_>, area: Rect) {
    let Some(results) = &self.results else { return };
    let is_focused = self.selected_component == ComponentKind::Results;

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(if is_focused { theme::border_focused() } else { theme::border_normal() })
      .title(format!(
        "Results ({} rows, {} columns) - row {}",
        results.row_count(),
        results.column_count(),
        (self.selected_row_index + 1).min(results.row_count())
      ))
      .title_style(theme::title())
      .border_type(BorderType::Rounded);

    let start = self.horizontal_scroll_offset.min(results.headers.len());
    let end = (start + VISIBLE_COLUMNS).min(results.headers.len());

    let header = ratatui::widgets::Row::new(
      results.headers[start..end].iter().map(|h| Cell::from(Span::styled(h.clone(), theme::table_header()))),
    );

    let rows = results.rows.iter().enumerate().map(|(i, row)| {
      let cells = row.iter().skip(start).take(end - start).map(|c| Cell::from(c.clone()));
      let r = ratatui::widgets::Row::new(cells);
      if is_focused && i == self.selected_row_index {
        r.style(theme::selection())
      } else {
        r
      }
    });

    let widths = vec![Constraint::Percentage((100 / VISIBLE_COLUMNS.max(1)) as u16); end - start];
    let table = Table::new(rows, widths).header(header).block(block);

    let mut state = TableState::default();
    state.select(Some(self.selected_row_index));
    f.render_stateful_widget(table, area, &mut state);
  }

  fn render_input(&self, f: &mut Frame<'_>, area: Rect) {
    let is_focused = self.selected_component == ComponentKind::Input;
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(if is_focused { theme::border_focused() } else { theme::border_normal() })
      .title(if is_focused { "Question (enter to send, esc to leave)" } else { "Question [i]" })
      .title_style(theme::title())
      .border_type(BorderType::Rounded);

    let mut input = self.input.clone();
    input.set_block(block);
    input.set_style(theme::input());
    f.render_widget(&input, area);
  }

  fn render_status(&self, f: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::new();

    match (&self.model_name, &self.masked_key) {
      (Some(model), Some(key)) => {
        spans.push(Span::styled(format!("model: {model} "), theme::success()));
        spans.push(Span::styled(format!("key: {key} "), theme::muted()));
      },
      _ => spans.push(Span::styled("generator: not configured ", theme::warning())),
    }

    if self.executor_ready {
      spans.push(Span::styled("db: configured ", theme::success()));
    } else {
      spans.push(Span::styled("db: not configured ", theme::warning()));
    }

    if let Some(sql) = &self.pending_sql {
      let formatted = sqlformat::format(sql, &QueryParams::None, FormatOptions::default());
      let one_line = formatted.split_whitespace().collect::<Vec<_>>().join(" ");
      spans.push(Span::styled(format!("pending: {one_line}"), theme::sql()));
    }

    if let Some((message, _)) = &self.export_status {
      spans.push(Span::styled(format!(" {message}"), theme::success()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
  }

  fn render_error(&self, f: &mut Frame<'_>) -> Result<()> {
    let Some(message) = &self.error_message else { return Ok(()) };

    let area = centered_rect(60, 20, f.area());
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(theme::error())
      .title("Error (esc to dismiss)")
      .title_style(theme::error())
      .border_type(BorderType::Rounded);

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(message.clone()).wrap(Wrap { trim: true }).block(block), area);
    Ok(())
  }

  fn render_help(&self, f: &mut Frame<'_>) -> Result<()> {
    if !self.show_help {
      return Ok(());
    }

    let area = centered_rect(60, 60, f.area());
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(theme::border_focused())
      .title("Help")
      .title_style(theme::title())
      .border_type(BorderType::Rounded);

    let mut lines = vec![
      Line::from("i       ask a question"),
      Line::from("enter   send the question (while typing)"),
      Line::from("x       run the generated SQL"),
      Line::from("r       focus the result table"),
      Line::from("j/k     scroll transcript or rows"),
      Line::from("h/l     scroll result columns"),
      Line::from("e       export transcript"),
      Line::from("c       clear transcript"),
      Line::from("q       quit"),
      Line::default(),
      Line::from(Span::styled("Examples:", theme::title())),
    ];
    for (i, example) in QUICK_EXAMPLES.iter().enumerate() {
      lines.push(Line::from(format!("{}       {example}", i + 1)));
    }

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
    Ok(())
  }
}

/// Splits message content on ```sql fences, tagging which chunks are SQL.
fn split_sql_blocks(content: &str) -> Vec<(String, bool)> {
  let mut out = Vec::new();
  let mut rest = content;
  while let Some(start) = rest.find("```sql") {
    if start > 0 {
      out.push((rest[..start].trim_end().to_string(), false));
    }
    let after = &rest[start + 6..];
    match after.find("```") {
      Some(end) => {
        out.push((after[..end].trim().to_string(), true));
        rest = &after[end + 3..];
      },
      None => {
        out.push((after.trim().to_string(), true));
        rest = "";
      },
    }
  }
  if !rest.trim().is_empty() {
    out.push((rest.trim().to_string(), false));
  }
  out.retain(|(s, _)| !s.is_empty());
  out
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
  let popup_layout = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage((100 - percent_y) / 2),
      Constraint::Percentage(percent_y),
      Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - percent_x) / 2),
      Constraint::Percentage(percent_x),
      Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
