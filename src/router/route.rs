//! URL grammar for the three views.
//!
//! | path                          | view                              |
//! |-------------------------------|-----------------------------------|
//! | `/`, `/index.html`            | `Home`                            |
//! | `/{series}`                   | `SeriesDetail`                    |
//! | `/{series}/{volume}`          | `VolumeRead` at chapter 0 (redirect) |
//! | `/{series}/{volume}/{chapter}`| `VolumeRead`                      |
//!
//! Anything else lands on `Home` and is rewritten to `/`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static SERIES_ROUTE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^/([a-zA-Z0-9_-]+)$").expect("valid series route"));
static VOLUME_ROUTE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^/([a-zA-Z0-9_-]+)/([0-9]+)$").expect("valid volume route"));
static CHAPTER_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^/([a-zA-Z0-9_-]+)/([0-9]+)/([0-9]+)$").expect("valid chapter route")
});

/// What to show. Replaced wholesale on every navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewDescriptor {
  Home,
  SeriesDetail {
    series_id: String,
  },
  VolumeRead {
    series_id: String,
    /// URL volume number; the resource id is `volume{n}`
    volume: u32,
    /// Zero-based index into the volume manifest
    chapter: usize,
  },
}

impl ViewDescriptor {
  pub fn series_id(&self) -> Option<&str> {
    match self {
      Self::Home => None,
      Self::SeriesDetail { series_id } | Self::VolumeRead { series_id, .. } => Some(series_id),
    }
  }

  pub fn to_url(&self) -> String {
    to_url(self)
  }
}

impl fmt::Display for ViewDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&to_url(self))
  }
}

/// A parsed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
  pub view: ViewDescriptor,
  /// The URL the history entry should hold for this view
  pub canonical: String,
  /// The input has to be rewritten to `canonical`
  pub redirected: bool,
}

impl Location {
  fn exact(view: ViewDescriptor, path: &str) -> Self {
    Self {
      view,
      canonical: path.to_string(),
      redirected: false,
    }
  }

  fn redirect(view: ViewDescriptor) -> Self {
    Self {
      canonical: to_url(&view),
      view,
      redirected: true,
    }
  }
}

/// Reduce user input to a path: full URLs keep their path, query and
/// fragment are dropped, and a missing leading `/` is added.
fn path_of(input: &str) -> String {
  let input = input.trim();
  let path = match url::Url::parse(input) {
    Ok(url) if url.has_host() => url.path().to_string(),
    _ => input.to_string(),
  };
  let path = path.split(['?', '#']).next().unwrap_or_default();
  if path.starts_with('/') {
    path.to_string()
  } else {
    format!("/{}", path)
  }
}

pub fn parse(input: &str) -> Location {
  let path = path_of(input);

  if path == "/" {
    return Location::exact(ViewDescriptor::Home, "/");
  }
  if path == "/index.html" {
    return Location {
      view: ViewDescriptor::Home,
      canonical: "/".to_string(),
      redirected: false,
    };
  }

  if let Some(caps) = SERIES_ROUTE.captures(&path) {
    let view = ViewDescriptor::SeriesDetail {
      series_id: caps[1].to_string(),
    };
    return Location::exact(view, &path);
  }

  if let Some(caps) = VOLUME_ROUTE.captures(&path) {
    if let Ok(volume) = caps[2].parse() {
      return Location::redirect(ViewDescriptor::VolumeRead {
        series_id: caps[1].to_string(),
        volume,
        chapter: 0,
      });
    }
  }

  if let Some(caps) = CHAPTER_ROUTE.captures(&path) {
    if let (Ok(volume), Ok(chapter)) = (caps[2].parse(), caps[3].parse()) {
      let view = ViewDescriptor::VolumeRead {
        series_id: caps[1].to_string(),
        volume,
        chapter,
      };
      // Leading zeros parse fine but are not the canonical spelling.
      let canonical = to_url(&view);
      if canonical == path {
        return Location::exact(view, &path);
      }
      return Location::redirect(view);
    }
  }

  Location::redirect(ViewDescriptor::Home)
}

pub fn to_url(view: &ViewDescriptor) -> String {
  match view {
    ViewDescriptor::Home => "/".to_string(),
    ViewDescriptor::SeriesDetail { series_id } => format!("/{}", series_id),
    ViewDescriptor::VolumeRead {
      series_id,
      volume,
      chapter,
    } => format!("/{}/{}/{}", series_id, volume, chapter),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn read(series_id: &str, volume: u32, chapter: usize) -> ViewDescriptor {
    ViewDescriptor::VolumeRead {
      series_id: series_id.to_string(),
      volume,
      chapter,
    }
  }

  #[test]
  fn test_home_paths() {
    assert_eq!(parse("/"), Location::exact(ViewDescriptor::Home, "/"));
    let index = parse("/index.html");
    assert_eq!(index.view, ViewDescriptor::Home);
    assert!(!index.redirected);
  }

  #[test]
  fn test_series_detail() {
    let location = parse("/my_series-2");
    assert_eq!(
      location.view,
      ViewDescriptor::SeriesDetail {
        series_id: "my_series-2".to_string()
      }
    );
    assert!(!location.redirected);
  }

  #[test]
  fn test_volume_only_redirects_to_first_chapter() {
    let location = parse("/demo/2");
    assert_eq!(location.view, read("demo", 2, 0));
    assert_eq!(location.canonical, "/demo/2/0");
    assert!(location.redirected);
  }

  #[test]
  fn test_chapter_route() {
    let location = parse("/demo/1/3");
    assert_eq!(location.view, read("demo", 1, 3));
    assert_eq!(location.canonical, "/demo/1/3");
    assert!(!location.redirected);
  }

  #[test]
  fn test_unmatched_paths_go_home() {
    for path in [
      "/demo/",
      "/demo/1/",
      "/demo/one",
      "/demo/1/2/3",
      "/de mo",
      "/demo.html",
      "/demo/-1/0",
      "/demo/1/99999999999999999999999",
      "/demo/٣/0",
    ] {
      let location = parse(path);
      assert_eq!(location.view, ViewDescriptor::Home, "{}", path);
      assert_eq!(location.canonical, "/");
      assert!(location.redirected, "{}", path);
    }
  }

  #[test]
  fn test_leading_zeros_are_canonicalised() {
    let location = parse("/demo/01/002");
    assert_eq!(location.view, read("demo", 1, 2));
    assert_eq!(location.canonical, "/demo/1/2");
    assert!(location.redirected);
  }

  #[test]
  fn test_input_forms() {
    assert_eq!(parse("demo/1/0").view, read("demo", 1, 0));
    assert_eq!(parse("/demo/1/0?x=1#top").view, read("demo", 1, 0));
    assert_eq!(
      parse("https://novels.example.org/demo/4/1").view,
      read("demo", 4, 1)
    );
  }

  #[test]
  fn test_to_url_round_trips() {
    let views = [
      ViewDescriptor::Home,
      ViewDescriptor::SeriesDetail {
        series_id: "a-b_c9".to_string(),
      },
      read("x", 0, 0),
      read("Series_1", 12, 140),
      read("s", u32::MAX, usize::MAX),
    ];
    for view in views {
      let location = parse(&to_url(&view));
      assert_eq!(location.view, view);
      assert!(!location.redirected);
    }
  }
}
