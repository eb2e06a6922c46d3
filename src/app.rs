use crate::commands::{self, Invocation};
use crate::config::Config;
use crate::event::{Event, EventHandler, TICK_RATE};
use crate::router::{Action, Navigator, PageState, ViewData, ViewDescriptor};
use crate::site::resources;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandPalette, KeyResult};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::io::stdout;
use tracing::{info, warn};

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  /// Table of contents overlay in the reader
  Toc,
}

/// Per-page UI state, reset whenever the view changes
#[derive(Debug, Default)]
pub struct ViewState {
  /// Selected series (home) or volume (series detail)
  pub list: ListState,
  /// Reader scroll offset in lines
  pub scroll: u16,
  /// Highlighted entry in the table of contents
  pub toc: ListState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  pub text: String,
  pub is_error: bool,
}

/// Main application state
pub struct App {
  navigator: Navigator,
  title: String,
  mode: Mode,
  palette: CommandPalette,
  view_state: ViewState,
  /// The view `view_state` belongs to
  shown: ViewDescriptor,
  status: Option<StatusMessage>,
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, navigator: Navigator) -> Self {
    let shown = navigator.view().clone();
    Self {
      navigator,
      title: config.display_title(),
      mode: Mode::Normal,
      palette: CommandPalette::new(),
      view_state: ViewState::default(),
      shown,
      status: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(TICK_RATE);

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => {}
      Event::Tick => {
        self.navigator.tick();
      }
    }
    self.sync_view_state();
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Toc => self.handle_toc_mode_key(key),
    }
    self.sync_view_state();
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    self.status = None;
    match key.code {
      KeyCode::Char('q') => {
        if !self.navigator.back() {
          self.should_quit = true;
        }
      }

      // Lists and reader
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
      KeyCode::PageUp => self.move_cursor(-10),
      KeyCode::PageDown | KeyCode::Char(' ') => self.move_cursor(10),
      KeyCode::Enter => self.enter_selected(),

      // Chapters
      KeyCode::Right | KeyCode::Char('n') => self.dispatch(Action::NextChapter),
      KeyCode::Left | KeyCode::Char('p') => self.dispatch(Action::PreviousChapter),
      KeyCode::Char('u') => self.dispatch(Action::BackToSeries),
      KeyCode::Char('t') => self.open_toc(),

      // History and page
      KeyCode::Char('g') => self.dispatch(Action::GoHome),
      KeyCode::Char('r') => self.navigator.refresh(),
      KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => {
        self.navigator.back();
      }
      KeyCode::Char('f') => {
        self.navigator.forward();
      }

      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.palette.activate();
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match self.palette.handle_key(key) {
      KeyResult::Event(CommandEvent::Submitted(line)) => {
        self.mode = Mode::Normal;
        self.execute_command(&line);
      }
      KeyResult::Event(CommandEvent::Cancelled) => self.mode = Mode::Normal,
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
  }

  fn handle_toc_mode_key(&mut self, key: KeyEvent) {
    let count = self.navigator.chapter_count().unwrap_or(0);
    match key.code {
      KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('q') => self.mode = Mode::Normal,
      KeyCode::Up | KeyCode::Char('k') => self.view_state.toc.select_previous(),
      KeyCode::Down | KeyCode::Char('j') => {
        let next = self.view_state.toc.selected().map_or(0, |i| i + 1);
        if next < count {
          self.view_state.toc.select(Some(next));
        }
      }
      KeyCode::Enter => {
        self.mode = Mode::Normal;
        if let Some(index) = self.view_state.toc.selected() {
          self.dispatch(Action::JumpToChapter(index));
        }
      }
      _ => {}
    }
  }

  fn execute_command(&mut self, line: &str) {
    let invocation = match commands::parse(line) {
      Ok(invocation) => invocation,
      Err(message) => {
        self.set_error(message);
        return;
      }
    };

    match invocation {
      Invocation::Home => self.dispatch(Action::GoHome),
      Invocation::Open(location) => self.navigator.open_location(&location),
      Invocation::Back => {
        if !self.navigator.back() {
          self.set_error("no earlier page");
        }
      }
      Invocation::Forward => {
        if !self.navigator.forward() {
          self.set_error("no later page");
        }
      }
      Invocation::Toc => self.open_toc(),
      Invocation::Refresh => self.navigator.refresh(),
      Invocation::ClearCache => {
        let removed = self.navigator.client().clear_cache();
        self.set_info(format!("removed {} cached resources", removed));
      }
      Invocation::Quit => self.should_quit = true,
    }
  }

  fn dispatch(&mut self, action: Action) {
    self.navigator.dispatch(action);
  }

  fn open_toc(&mut self) {
    let current = match self.navigator.view() {
      ViewDescriptor::VolumeRead { chapter, .. } => *chapter,
      _ => return,
    };
    let Some(count) = self.navigator.chapter_count() else {
      self.set_error("chapter list is not loaded");
      return;
    };
    self.view_state.toc.select(Some(current.min(count.saturating_sub(1))));
    self.mode = Mode::Toc;
  }

  /// Number of selectable rows on the current page.
  fn list_len(&self) -> usize {
    match self.navigator.state().data() {
      Some(ViewData::Home { series }) => series.len(),
      Some(ViewData::SeriesDetail { volumes, .. }) => volumes.len(),
      _ => 0,
    }
  }

  fn move_cursor(&mut self, delta: i32) {
    if let ViewDescriptor::VolumeRead { .. } = self.navigator.view() {
      let scroll = &mut self.view_state.scroll;
      *scroll = if delta < 0 {
        scroll.saturating_sub(delta.unsigned_abs() as u16)
      } else {
        scroll.saturating_add(delta as u16)
      };
      return;
    }

    let len = self.list_len();
    if len > 0 {
      let selected = self.view_state.list.selected().unwrap_or(0);
      let next = (selected as i32 + delta).rem_euclid(len as i32) as usize;
      self.view_state.list.select(Some(next));
    }
  }

  fn enter_selected(&mut self) {
    let selected = self.view_state.list.selected().unwrap_or(0);
    let action = match self.navigator.state().data() {
      Some(ViewData::Home { series }) => series
        .get(selected)
        .map(|s| Action::OpenSeries(s.id.clone())),
      Some(ViewData::SeriesDetail { volumes, .. }) => match volumes.get(selected) {
        Some(volume) => match resources::volume_number(&volume.id) {
          Some(n) => Some(Action::OpenVolume(n)),
          None => {
            warn!(volume_id = %volume.id, "volume id has no number, going home");
            Some(Action::GoHome)
          }
        },
        None => None,
      },
      _ => None,
    };

    if let Some(action) = action {
      self.dispatch(action);
    }
  }

  /// Reset per-page state once the navigator has moved on.
  fn sync_view_state(&mut self) {
    if self.navigator.view() == &self.shown {
      return;
    }
    self.shown = self.navigator.view().clone();
    self.view_state = ViewState::default();
    if self.mode == Mode::Toc {
      self.mode = Mode::Normal;
    }
    info!(location = self.navigator.location(), "page changed");
  }

  fn set_error(&mut self, text: impl Into<String>) {
    self.status = Some(StatusMessage {
      text: text.into(),
      is_error: true,
    });
  }

  fn set_info(&mut self, text: impl Into<String>) {
    self.status = Some(StatusMessage {
      text: text.into(),
      is_error: false,
    });
  }

  // Accessors for UI rendering
  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn navigator(&self) -> &Navigator {
    &self.navigator
  }

  pub fn palette(&self) -> &CommandPalette {
    &self.palette
  }

  pub fn status(&self) -> Option<&StatusMessage> {
    self.status.as_ref()
  }

  #[cfg(test)]
  pub fn page_state(&self) -> &PageState {
    self.navigator.state()
  }

  /// Navigator for reading and page UI state for writing, borrowed together.
  pub fn render_parts(&mut self) -> (&Navigator, &mut ViewState) {
    (&self.navigator, &mut self.view_state)
  }

  #[cfg(test)]
  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  /// Wait for the current page to load.
  #[cfg(test)]
  async fn settle(&mut self) {
    self.navigator.settle().await;
    self.sync_view_state();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::router::test_support::*;
  use wiremock::MockServer;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  async fn app_at(server: &MockServer, location: &str) -> App {
    mount_library(server).await;
    let navigator = Navigator::start(client_for(server), location);
    let mut app = App::new(&Config::default(), navigator);
    app.settle().await;
    app
  }

  fn type_command(app: &mut App, line: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in line.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_enter_opens_series_then_volume() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/").await;

    app.handle_key(key(KeyCode::Enter));
    app.settle().await;
    assert_eq!(app.navigator().location(), "/demo");

    app.handle_key(key(KeyCode::Enter));
    app.settle().await;
    assert_eq!(app.navigator().location(), "/demo/1/0");
    assert!(app.page_state().is_success());
  }

  #[tokio::test]
  async fn test_reader_keys() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/demo/1/0").await;

    app.handle_key(key(KeyCode::Char('j')));
    assert_eq!(app.view_state.scroll, 1);

    app.handle_key(key(KeyCode::Char('n')));
    assert_eq!(app.navigator().location(), "/demo/1/1");
    assert_eq!(app.view_state.scroll, 0);
    app.settle().await;

    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.navigator().location(), "/demo/1/0");
    app.settle().await;

    app.handle_key(key(KeyCode::Char('u')));
    assert_eq!(app.navigator().location(), "/demo");
  }

  #[tokio::test]
  async fn test_toc_opens_from_chapter_not_found() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/demo/1/99").await;
    assert!(app.page_state().is_error());

    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.mode(), Mode::Toc);
    app.handle_key(key(KeyCode::Enter));
    app.settle().await;
    assert_eq!(app.navigator().location(), "/demo/1/2");
  }

  #[tokio::test]
  async fn test_toc_jumps_to_chapter() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/demo/1/0").await;

    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.mode(), Mode::Toc);
    app.handle_key(key(KeyCode::Char('j')));
    app.handle_key(key(KeyCode::Char('j')));
    app.handle_key(key(KeyCode::Char('j')));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.mode(), Mode::Normal);
    assert_eq!(app.navigator().location(), "/demo/1/2");
  }

  #[tokio::test]
  async fn test_q_goes_back_then_quits() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/demo").await;

    app.handle_key(key(KeyCode::Char('q')));
    assert_eq!(app.navigator().location(), "/");
    assert!(!app.should_quit());

    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_commands() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/").await;

    type_command(&mut app, "/demo/1");
    assert_eq!(app.navigator().location(), "/demo/1/0");
    app.settle().await;

    type_command(&mut app, "home");
    assert_eq!(app.navigator().location(), "/");
    app.settle().await;

    type_command(&mut app, "frobnicate now");
    assert!(app.status().map(|s| s.is_error).unwrap_or(false));

    type_command(&mut app, "cc");
    assert_eq!(
      app.status().map(|s| s.text.as_str()),
      Some("removed 3 cached resources")
    );

    type_command(&mut app, "quit");
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_from_command_mode() {
    let server = MockServer::start().await;
    let mut app = app_at(&server, "/").await;

    app.handle_key(key(KeyCode::Char(':')));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
  }
}
