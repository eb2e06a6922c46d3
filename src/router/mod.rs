//! View routing: URL grammar, navigation actions, history, and the
//! navigator that loads each view.

mod action;
mod history;
mod navigator;
mod resolve;
pub mod route;

pub use action::Action;
pub use navigator::{Navigator, PageState};
pub use resolve::ViewData;
pub use route::ViewDescriptor;

#[cfg(test)]
pub(crate) use resolve::test_support;
