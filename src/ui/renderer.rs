use std::io;

use crate::app::ViewState;
use crate::render::Renderer;
use crate::router::{PageState, ViewData, ViewDescriptor};
use ratatui::prelude::*;

use super::views::{self, ReaderPosition};

/// Renders a page into one area of a ratatui frame.
pub struct TuiRenderer<'a, 'f> {
  frame: &'a mut Frame<'f>,
  area: Rect,
  location: &'a str,
  view_state: &'a mut ViewState,
}

impl<'a, 'f> TuiRenderer<'a, 'f> {
  pub fn new(
    frame: &'a mut Frame<'f>,
    area: Rect,
    location: &'a str,
    view_state: &'a mut ViewState,
  ) -> Self {
    Self {
      frame,
      area,
      location,
      view_state,
    }
  }
}

impl Renderer for TuiRenderer<'_, '_> {
  fn render(&mut self, view: &ViewDescriptor, state: &PageState) -> io::Result<()> {
    match (view, state) {
      (_, PageState::Idle) | (_, PageState::Loading) => {
        views::draw_loading(self.frame, self.area, self.location)
      }
      (_, PageState::Error(error)) => views::draw_error(self.frame, self.area, error),

      (_, PageState::Success(ViewData::Home { series })) => {
        views::draw_home(self.frame, self.area, series, &mut self.view_state.list)
      }
      (_, PageState::Success(ViewData::SeriesDetail { info, volumes })) => {
        views::draw_series(self.frame, self.area, info, volumes, &mut self.view_state.list)
      }
      (
        ViewDescriptor::VolumeRead {
          series_id,
          volume,
          chapter: index,
        },
        PageState::Success(ViewData::VolumeRead { manifest, chapter }),
      ) => {
        let position = ReaderPosition {
          series_id: series_id.as_str(),
          volume: *volume,
          chapter: *index,
        };
        views::draw_reader(
          self.frame,
          self.area,
          position,
          manifest,
          chapter,
          &mut self.view_state.scroll,
        )
      }
      // A page's data always matches its view.
      (_, PageState::Success(ViewData::VolumeRead { .. })) => {
        views::draw_loading(self.frame, self.area, self.location)
      }
    }
    Ok(())
  }
}
