pub mod components;
pub mod render;
pub mod renderfns;
pub mod view;
pub mod views;

use ratatui::prelude::*;
use ratatui::widgets::{ListState, Paragraph};

use crate::app::{App, Mode};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let title = app.title();
  let platform = app.platform().to_string();
  let breadcrumb = app.view_breadcrumb().join(" > ");
  renderfns::draw_header(frame, chunks[0], &title, &platform, &breadcrumb);

  if let Some(view) = app.current_view_mut() {
    view.render(frame, chunks[1]);
  }

  draw_status_bar(frame, chunks[2], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let line = match app.mode() {
    Mode::Normal => {
      let hint = " :command  /search  j/k:nav  Enter:select  r:refresh  q:back  Ctrl-C:quit";
      Line::styled(hint, Style::default().fg(Color::DarkGray))
    }
    Mode::Command => {
      let mut spans = vec![Span::styled(
        format!(":{}", app.command_input()),
        Style::default().fg(Color::Yellow),
      )];
      for (i, cmd) in app.autocomplete_suggestions().iter().enumerate().take(4) {
        spans.push(Span::raw("  "));
        let style = if i == app.selected_suggestion() {
          Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
          Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", cmd.name), style));
      }
      Line::from(spans)
    }
  };

  frame.render_widget(Paragraph::new(line), area);
}

/// Clamp a list selection into the valid range for the current length.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i < len => {}
    _ => state.select(Some(0)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_valid_selection_empty_list() {
    let mut state = ListState::default();
    state.select(Some(3));
    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }

  #[test]
  fn test_ensure_valid_selection_clamps_overflow() {
    let mut state = ListState::default();
    state.select(Some(9));
    ensure_valid_selection(&mut state, 4);
    assert_eq!(state.selected(), Some(0));
  }

  #[test]
  fn test_ensure_valid_selection_keeps_valid() {
    let mut state = ListState::default();
    state.select(Some(2));
    ensure_valid_selection(&mut state, 4);
    assert_eq!(state.selected(), Some(2));
  }
}
