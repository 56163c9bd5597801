use ratatui::prelude::*;

use crate::ui::render::{RowSpec, Tone};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

/// Map a semantic tone to a terminal color
pub fn tone_color(tone: Tone) -> Color {
  match tone {
    Tone::Default => Color::White,
    Tone::Accent => Color::Cyan,
    Tone::Good => Color::Green,
    Tone::Warn => Color::Yellow,
    Tone::Bad => Color::Red,
    Tone::Dim => Color::DarkGray,
  }
}

/// Turn a render-instruction row into a styled line. `widths` pads each
/// cell; cells beyond the widths list are rendered unpadded.
pub fn row_to_line(row: &RowSpec, widths: &[usize]) -> Line<'static> {
  let spans: Vec<Span> = row
    .cells
    .iter()
    .enumerate()
    .map(|(i, cell)| {
      let text = match widths.get(i) {
        Some(&w) => format!("{:<width$} ", truncate(&cell.text, w), width = w),
        None => cell.text.clone(),
      };
      Span::styled(text, Style::default().fg(tone_color(cell.tone)))
    })
    .collect();
  Line::from(spans)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::render::Cell;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_tone_colors() {
    assert_eq!(tone_color(Tone::Good), Color::Green);
    assert_eq!(tone_color(Tone::Bad), Color::Red);
    assert_eq!(tone_color(Tone::Dim), Color::DarkGray);
  }

  #[test]
  fn test_row_to_line_pads_to_widths() {
    let row = RowSpec {
      cells: vec![Cell::new("ab", Tone::Default), Cell::new("cd", Tone::Dim)],
    };
    let line = row_to_line(&row, &[4]);
    assert_eq!(line.spans[0].content.as_ref(), "ab   ");
    assert_eq!(line.spans[1].content.as_ref(), "cd");
  }
}
