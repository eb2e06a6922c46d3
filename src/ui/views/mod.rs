mod home;
mod reader;
mod series;

pub use home::draw_home;
pub use reader::{draw_reader, ReaderPosition};
pub use series::draw_series;

use crate::error::NavigationError;
use crate::render::error_message;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_loading(frame: &mut Frame, area: Rect, location: &str) {
  let block = Block::default()
    .title(format!(" {} (loading...) ", location))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let paragraph = Paragraph::new("Loading...")
    .block(block)
    .style(Style::default().fg(Color::DarkGray));
  frame.render_widget(paragraph, area);
}

/// Error panel; never shows partial page data.
pub fn draw_error(frame: &mut Frame, area: Rect, error: &NavigationError) {
  let (headline, detail) = error_message(error);

  let block = Block::default()
    .title(format!(" {} ", headline))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let hint = if error.is_chapter_not_found() {
    "Press 't' to pick a chapter or 'u' for the series."
  } else {
    "Press 'r' to retry, 'b' to go back, or 'g' for home."
  };

  let lines = vec![
    Line::styled(headline, Style::default().fg(Color::Red).bold()),
    Line::raw(""),
    Line::raw(detail),
    Line::raw(""),
    Line::styled(hint, Style::default().fg(Color::DarkGray)),
  ];
  let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}
