pub mod components;
mod renderer;
mod renderfns;
mod views;

use crate::app::{App, Mode};
use crate::render::Renderer;
use crate::router::{Navigator, ViewDescriptor};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::warn;

pub use renderer::TuiRenderer;

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

  let shortcuts = shortcuts(app.navigator());
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    app.navigator().location(),
    &shortcuts,
  );

  let mode = app.mode();
  {
    let (navigator, view_state) = app.render_parts();
    let location = navigator.location();
    let mut renderer = TuiRenderer::new(frame, chunks[1], location, view_state);
    if let Err(e) = renderer.render(navigator.view(), navigator.state()) {
      warn!(error = %e, "failed to render page");
    }

    if mode == Mode::Toc {
      if let (ViewDescriptor::VolumeRead { chapter, .. }, Some(manifest)) =
        (navigator.view(), navigator.manifest())
      {
        components::draw_toc(frame, chunks[1], manifest, *chapter, &mut view_state.toc);
      }
    }
  }

  app.palette().render_overlay(frame, chunks[1]);

  draw_status_bar(frame, chunks[2], app);
}

fn shortcuts(navigator: &Navigator) -> Vec<(&'static str, &'static str)> {
  match navigator.view() {
    ViewDescriptor::Home => vec![("Enter", "open"), (":", "command")],
    ViewDescriptor::SeriesDetail { .. } => {
      vec![("Enter", "read"), ("g", "home"), ("b", "back")]
    }
    ViewDescriptor::VolumeRead { .. } => vec![
      ("n", "next"),
      ("p", "prev"),
      ("t", "chapters"),
      ("u", "series"),
    ],
  }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match (app.mode(), app.status()) {
    (Mode::Command, _) => {
      let cmd = format!(":{}", app.palette().value());
      (cmd, Style::default().fg(Color::Yellow))
    }
    (Mode::Toc, _) => {
      let hint = " j/k:move  Enter:jump  Esc:close";
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
    (Mode::Normal, Some(status)) => {
      let color = if status.is_error { Color::Red } else { Color::Green };
      (format!(" {}", status.text), Style::default().fg(color))
    }
    (Mode::Normal, None) => {
      let hint = " :command  j/k:nav  Enter:select  r:refresh  b/f:history  q:back  Ctrl-C:quit";
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
