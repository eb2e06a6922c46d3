use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with app name, site, location, and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  location: &str,
  shortcuts: &[(&'static str, &'static str)],
) {
  let paragraph = Paragraph::new(header_line(title, location, shortcuts))
    .style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

fn header_line<'a>(
  title: &'a str,
  location: &'a str,
  shortcuts: &[(&'static str, &'static str)],
) -> Line<'a> {
  let mut spans = vec![
    Span::styled(" ranobe ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", location),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ];

  // Shortcuts - keys and brackets highlighted, descriptions dimmed
  for (key, label) in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  Line::from(spans)
}
