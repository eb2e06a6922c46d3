use super::route::ViewDescriptor;

/// A navigation request from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  GoHome,
  OpenSeries(String),
  OpenVolume(u32),
  BackToSeries,
  NextChapter,
  PreviousChapter,
  JumpToChapter(usize),
  NavigateTo(ViewDescriptor),
}

/// The view an action leads to, or `None` if the action does not apply.
///
/// `chapter_count` is the length of the loaded volume manifest; chapter
/// moves are refused while it is unknown.
pub fn transition(
  current: &ViewDescriptor,
  action: &Action,
  chapter_count: Option<usize>,
) -> Option<ViewDescriptor> {
  use ViewDescriptor::*;

  match (current, action) {
    (_, Action::GoHome) => Some(Home),
    (_, Action::NavigateTo(view)) => Some(view.clone()),

    (Home, Action::OpenSeries(series_id)) => Some(SeriesDetail {
      series_id: series_id.clone(),
    }),

    (SeriesDetail { series_id }, Action::OpenVolume(volume)) => Some(VolumeRead {
      series_id: series_id.clone(),
      volume: *volume,
      chapter: 0,
    }),

    (
      VolumeRead {
        series_id,
        volume,
        chapter,
      },
      _,
    ) => {
      let chapter = match action {
        Action::BackToSeries => {
          return Some(SeriesDetail {
            series_id: series_id.clone(),
          })
        }
        Action::NextChapter => {
          let next = chapter.checked_add(1)?;
          (next < chapter_count?).then_some(next)?
        }
        Action::PreviousChapter => chapter.checked_sub(1)?,
        Action::JumpToChapter(index) => (*index < chapter_count?).then_some(*index)?,
        _ => return None,
      };
      Some(VolumeRead {
        series_id: series_id.clone(),
        volume: *volume,
        chapter,
      })
    }

    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn read(chapter: usize) -> ViewDescriptor {
    ViewDescriptor::VolumeRead {
      series_id: "demo".to_string(),
      volume: 1,
      chapter,
    }
  }

  fn series() -> ViewDescriptor {
    ViewDescriptor::SeriesDetail {
      series_id: "demo".to_string(),
    }
  }

  #[test]
  fn test_home_to_series_to_volume() {
    let next = transition(
      &ViewDescriptor::Home,
      &Action::OpenSeries("demo".to_string()),
      None,
    );
    assert_eq!(next, Some(series()));

    let next = transition(&series(), &Action::OpenVolume(1), None);
    assert_eq!(next, Some(read(0)));
  }

  #[test]
  fn test_chapter_bounds() {
    assert_eq!(transition(&read(0), &Action::NextChapter, Some(3)), Some(read(1)));
    assert_eq!(transition(&read(2), &Action::NextChapter, Some(3)), None);
    assert_eq!(transition(&read(0), &Action::NextChapter, None), None);
    assert_eq!(transition(&read(0), &Action::PreviousChapter, Some(3)), None);
    assert_eq!(transition(&read(2), &Action::PreviousChapter, Some(3)), Some(read(1)));
  }

  #[test]
  fn test_jump_to_chapter() {
    assert_eq!(transition(&read(0), &Action::JumpToChapter(2), Some(3)), Some(read(2)));
    assert_eq!(transition(&read(0), &Action::JumpToChapter(3), Some(3)), None);
    assert_eq!(transition(&read(0), &Action::JumpToChapter(0), None), None);
  }

  #[test]
  fn test_back_to_series_and_home() {
    assert_eq!(transition(&read(4), &Action::BackToSeries, Some(5)), Some(series()));
    assert_eq!(
      transition(&read(4), &Action::GoHome, None),
      Some(ViewDescriptor::Home)
    );
    assert_eq!(
      transition(&series(), &Action::GoHome, None),
      Some(ViewDescriptor::Home)
    );
  }

  #[test]
  fn test_actions_outside_their_view_are_refused() {
    assert_eq!(transition(&ViewDescriptor::Home, &Action::NextChapter, Some(3)), None);
    assert_eq!(transition(&ViewDescriptor::Home, &Action::OpenVolume(1), None), None);
    assert_eq!(transition(&series(), &Action::BackToSeries, None), None);
    assert_eq!(
      transition(&read(0), &Action::OpenSeries("other".to_string()), None),
      None
    );
  }

  #[test]
  fn test_navigate_to_from_anywhere() {
    for current in [ViewDescriptor::Home, series(), read(1)] {
      assert_eq!(
        transition(&current, &Action::NavigateTo(read(7)), None),
        Some(read(7))
      );
    }
  }
}
