use crate::site::types::SeriesSummary;
use crate::ui::renderfns::{format_color, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Draw the series index
pub fn draw_home(frame: &mut Frame, area: Rect, series: &[SeriesSummary], state: &mut ListState) {
  let block = Block::default()
    .title(format!(" Series ({}) ", series.len()))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if series.is_empty() {
    let paragraph = Paragraph::new("This site lists no series.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  if state.selected().is_none() {
    state.select(Some(0));
  }

  let items: Vec<ListItem> = series
    .iter()
    .map(|s| {
      let mut spans = vec![Span::raw(truncate(&s.title, 60))];
      if let Some(format) = &s.format {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
          format!("[{}]", format),
          Style::default().fg(format_color(format)),
        ));
      }
      ListItem::new(Line::from(spans))
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

  frame.render_stateful_widget(list, area, state);
}
