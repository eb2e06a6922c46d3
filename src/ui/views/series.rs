use crate::render::series_metadata;
use crate::site::resources;
use crate::site::types::{SeriesInfo, VolumeSummary};
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

/// Draw series metadata, synopsis, and the volume list
pub fn draw_series(
  frame: &mut Frame,
  area: Rect,
  info: &SeriesInfo,
  volumes: &[VolumeSummary],
  state: &mut ListState,
) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage(55), // Metadata and synopsis
      Constraint::Min(3),         // Volumes
    ])
    .split(area);

  let block = Block::default()
    .title(format!(" {} ", info.title))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let mut lines: Vec<Line> = series_metadata(info)
    .into_iter()
    .map(|(label, value)| {
      Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
      ])
    })
    .collect();
  lines.push(Line::raw(""));
  lines.push(Line::raw(
    info.description.as_deref().unwrap_or("No synopsis."),
  ));

  let details = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
  frame.render_widget(details, chunks[0]);

  let block = Block::default()
    .title(format!(" Volumes ({}) ", volumes.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if volumes.is_empty() {
    let paragraph = Paragraph::new("No volumes published yet.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, chunks[1]);
    return;
  }

  if state.selected().is_none() {
    state.select(Some(0));
  }

  let items: Vec<ListItem> = volumes
    .iter()
    .map(|volume| {
      let number = match resources::volume_number(&volume.id) {
        Some(n) => format!("{:>3}", n),
        None => "  ?".to_string(),
      };
      ListItem::new(Line::from(vec![
        Span::styled(number, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(truncate(&volume.title, 60)),
      ]))
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  frame.render_stateful_widget(list, chunks[1], state);
}
