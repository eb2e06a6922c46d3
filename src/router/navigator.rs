use tracing::{debug, info};

use crate::error::NavigationError;
use crate::query::{Query, QueryState};
use crate::site::types::VolumeManifest;
use crate::site::CachedSiteClient;

use super::action::{transition, Action};
use super::history::History;
use super::resolve::{resolve, ViewData};
use super::route::{self, ViewDescriptor};

pub type PageState = QueryState<ViewData, NavigationError>;

/// The view on screen and the query loading it.
struct Page {
  view: ViewDescriptor,
  query: Query<ViewData, NavigationError>,
}

impl Page {
  fn load(client: &CachedSiteClient, view: ViewDescriptor) -> Self {
    let fetch_client = client.clone();
    let fetch_view = view.clone();
    let mut query = Query::new(move || {
      let client = fetch_client.clone();
      let view = fetch_view.clone();
      async move { resolve(&client, &view).await }
    });
    query.fetch();
    Self { view, query }
  }
}

/// Owns navigation state: the current page, session history, and the client.
///
/// Each navigation builds a fresh `Page`; the one it replaces is dropped along
/// with its in-flight query, so only the latest navigation can ever land.
pub struct Navigator {
  client: CachedSiteClient,
  history: History,
  page: Page,
}

impl Navigator {
  /// Start at `location`. A deep link is placed after `/` in history.
  pub fn start(client: CachedSiteClient, location: &str) -> Self {
    let location = route::parse(location);
    info!(location = %location.canonical, "starting");
    let history = History::deep_link(location.canonical.clone());
    let page = Page::load(&client, location.view);
    Self {
      client,
      history,
      page,
    }
  }

  pub fn client(&self) -> &CachedSiteClient {
    &self.client
  }

  pub fn view(&self) -> &ViewDescriptor {
    &self.page.view
  }

  pub fn state(&self) -> &PageState {
    self.page.query.state()
  }

  /// The history entry for the current page.
  pub fn location(&self) -> &str {
    self.history.current()
  }

  #[cfg(test)]
  pub fn history(&self) -> &History {
    &self.history
  }

  /// Manifest of the volume being read, once it has loaded. A page that
  /// failed on its chapter still knows it.
  pub fn manifest(&self) -> Option<&VolumeManifest> {
    match self.page.query.state() {
      QueryState::Success(data) => data.manifest(),
      QueryState::Error(error) => error.manifest(),
      QueryState::Idle | QueryState::Loading => None,
    }
  }

  /// Chapter count of the loaded volume, once it is known.
  pub fn chapter_count(&self) -> Option<usize> {
    self.manifest().map(|m| m.chapters.len())
  }

  /// Go to a typed or linked location. The canonical form is recorded.
  pub fn open_location(&mut self, input: &str) {
    let location = route::parse(input);
    if location.redirected {
      debug!(input, canonical = %location.canonical, "location rewritten");
    }
    self.dispatch(Action::NavigateTo(location.view));
  }

  /// Apply a UI action. Returns `false` if it does not apply to this view.
  pub fn dispatch(&mut self, action: Action) -> bool {
    match transition(&self.page.view, &action, self.chapter_count()) {
      Some(view) => {
        self.history.push(view.to_url());
        self.show(view);
        true
      }
      None => {
        debug!(?action, view = %self.page.view, "action ignored");
        false
      }
    }
  }

  pub fn back(&mut self) -> bool {
    let Some(entry) = self.history.back().map(String::from) else {
      return false;
    };
    self.restore(&entry);
    true
  }

  pub fn forward(&mut self) -> bool {
    let Some(entry) = self.history.forward().map(String::from) else {
      return false;
    };
    self.restore(&entry);
    true
  }

  /// Load the current view again. Stale in-flight results are discarded.
  pub fn refresh(&mut self) {
    self.page.query.refetch();
  }

  /// Pick up a finished load. Returns `true` if the page state changed.
  pub fn tick(&mut self) -> bool {
    self.page.query.poll()
  }

  /// Wait for the current page to finish loading.
  pub async fn settle(&mut self) -> &PageState {
    self.page.query.settle().await
  }

  fn restore(&mut self, entry: &str) {
    let location = route::parse(entry);
    if location.canonical != entry {
      self.history.replace(location.canonical);
    }
    self.show(location.view);
  }

  fn show(&mut self, view: ViewDescriptor) {
    debug!(%view, "navigating");
    self.page = Page::load(&self.client, view);
  }
}
