use crate::site::types::VolumeManifest;
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Draw the chapter list over the reader. `current` is the chapter on screen.
pub fn draw_toc(
  frame: &mut Frame,
  area: Rect,
  manifest: &VolumeManifest,
  current: usize,
  state: &mut ListState,
) {
  let max_title_len = manifest
    .chapters
    .iter()
    .map(|c| c.title.chars().count())
    .max()
    .unwrap_or(10);
  let width = (max_title_len as u16 + 10).clamp(24, area.width.saturating_sub(4).max(24));
  let height = (manifest.chapters.len() as u16 + 2).clamp(3, area.height.saturating_sub(2).max(3));

  // Center the overlay
  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let overlay_area = Rect::new(x, y, width, height).intersection(area);

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .title(" Chapters ");

  if manifest.chapters.is_empty() {
    let empty = ratatui::widgets::Paragraph::new("No chapters in this volume.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(empty, overlay_area);
    return;
  }

  let title_width = width.saturating_sub(8) as usize;
  let items: Vec<ListItem> = manifest
    .chapters
    .iter()
    .enumerate()
    .map(|(i, chapter)| {
      let marker = if i == current { "• " } else { "  " };
      let style = if i == current {
        Style::default().fg(Color::Cyan).bold()
      } else {
        Style::default()
      };
      ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(truncate(&chapter.title, title_width), style),
      ]))
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

  frame.render_stateful_widget(list, overlay_area, state);
}
