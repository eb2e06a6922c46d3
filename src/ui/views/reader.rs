use crate::render::image_path;
use crate::site::types::{Chapter, ContentBlock, VolumeManifest};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Position of the chapter being read
#[derive(Debug, Clone, Copy)]
pub struct ReaderPosition<'a> {
  pub series_id: &'a str,
  pub volume: u32,
  pub chapter: usize,
}

/// Lay out chapter blocks as lines, one blank line between blocks.
pub fn chapter_lines<'a>(position: ReaderPosition<'_>, chapter: &'a Chapter) -> Vec<Line<'a>> {
  let mut lines = Vec::new();

  for block in &chapter.content {
    let block_lines: Vec<Line> = match block {
      ContentBlock::Paragraph { paragraph } => vec![Line::raw(paragraph.as_str())],
      ContentBlock::Image { image } => vec![Line::styled(
        format!(
          "[image: {}]",
          image_path(position.series_id, position.volume, image)
        ),
        Style::default().fg(Color::Magenta),
      )],
      ContentBlock::Quote { quote } => vec![Line::from(vec![
        Span::styled("┃ ", Style::default().fg(Color::DarkGray)),
        Span::styled(quote.as_str(), Style::default().italic()),
      ])],
      ContentBlock::Dialogue { dialogue } => dialogue
        .iter()
        .map(|line| {
          Line::from(vec![
            Span::styled(
              format!("{}: ", line.character),
              Style::default().fg(Color::Cyan).bold(),
            ),
            Span::raw(line.speech.as_str()),
          ])
        })
        .collect(),
      ContentBlock::Other(_) => continue,
    };

    if !lines.is_empty() {
      lines.push(Line::raw(""));
    }
    lines.extend(block_lines);
  }

  lines
}

/// Draw a chapter. `scroll` is clamped to the content.
pub fn draw_reader(
  frame: &mut Frame,
  area: Rect,
  position: ReaderPosition<'_>,
  manifest: &VolumeManifest,
  chapter: &Chapter,
  scroll: &mut u16,
) {
  let block = Block::default()
    .title(format!(
      " {} ({}/{}) ",
      chapter.title,
      position.chapter + 1,
      manifest.chapters.len()
    ))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let lines = chapter_lines(position, chapter);
  let max_scroll = u16::try_from(lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
  *scroll = (*scroll).min(max_scroll);

  let paragraph = Paragraph::new(lines)
    .block(block)
    .wrap(Wrap { trim: false })
    .scroll((*scroll, 0));
  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::site::types::DialogueLine;

  fn text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
  }

  #[test]
  fn test_chapter_lines() {
    let chapter = Chapter {
      title: "One".to_string(),
      content: vec![
        ContentBlock::Paragraph {
          paragraph: "It began.".to_string(),
        },
        ContentBlock::Other(serde_json::json!({"video": "x.mp4"})),
        ContentBlock::Image {
          image: "p1.jpg".to_string(),
        },
        ContentBlock::Dialogue {
          dialogue: vec![
            DialogueLine {
              character: "Aya".to_string(),
              speech: "Hi".to_string(),
            },
            DialogueLine {
              character: "Ren".to_string(),
              speech: "Hello".to_string(),
            },
          ],
        },
      ],
    };
    let position = ReaderPosition {
      series_id: "demo",
      volume: 3,
      chapter: 0,
    };

    let lines: Vec<String> = chapter_lines(position, &chapter).iter().map(text).collect();
    assert_eq!(
      lines,
      vec![
        "It began.",
        "",
        "[image: /images/demo/volume3/p1.jpg]",
        "",
        "Aya: Hi",
        "Ren: Hello",
      ]
    );
  }
}
