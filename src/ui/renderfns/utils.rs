use ratatui::prelude::Color;

/// Truncate a string to a maximum number of chars, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the badge color for a series format
pub fn format_color(format: &str) -> Color {
  match format {
    "Light Novel" => Color::Blue,
    "Manga" => Color::Green,
    "Web Novel" => Color::Magenta,
    _ => Color::Gray,
  }
}
