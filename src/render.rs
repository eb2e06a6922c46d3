//! Output surfaces for a loaded page.
//!
//! The navigator only produces a `ViewDescriptor` and its `PageState`; a
//! `Renderer` turns that into something a reader can see. `TextRenderer`
//! writes plain text (print mode); the terminal UI has its own renderer in
//! `ui`.

use std::io::{self, Write};

use crate::error::{NavigationError, SiteError};
use crate::router::{PageState, ViewData, ViewDescriptor};
use crate::site::resources;
use crate::site::types::{ContentBlock, SeriesInfo};

pub trait Renderer {
  fn render(&mut self, view: &ViewDescriptor, state: &PageState) -> io::Result<()>;
}

/// Headline and explanation for a failed page.
pub fn error_message(error: &NavigationError) -> (&'static str, String) {
  match error {
    NavigationError::ChapterNotFound { index, count, .. } => (
      "Chapter not found",
      format!(
        "This volume has {} chapters; there is no chapter at index {}.",
        count, index
      ),
    ),
    NavigationError::ResourceUnavailable { kind, source, .. } => {
      let detail = match source {
        SiteError::NotAvailable { source, .. } => format!(
          "The {} could not be loaded and no cached copy exists ({}).",
          kind, source
        ),
        SiteError::Malformed { .. } => format!("The {} has an unexpected format.", kind),
      };
      ("Content unavailable", detail)
    }
  }
}

/// Root-relative path of an image referenced from a chapter.
pub fn image_path(series_id: &str, volume: u32, name: &str) -> String {
  format!("/{}", resources::chapter_image(series_id, volume, name))
}

/// Metadata rows for a series, skipping fields the site left out.
pub fn series_metadata(info: &SeriesInfo) -> Vec<(&'static str, String)> {
  let cover = info.cover.as_deref().and_then(resources::cover_path);
  [
    ("Author", info.author.clone()),
    ("Released", info.release_date.clone()),
    ("Genre", info.genre.clone()),
    ("Status", info.status.clone()),
    ("Cover", cover),
  ]
  .into_iter()
  .filter_map(|(label, value)| value.map(|v| (label, v)))
  .collect()
}

/// Plain text renderer.
pub struct TextRenderer<W: Write> {
  out: W,
}

impl<W: Write> TextRenderer<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  #[cfg(test)]
  pub fn into_inner(self) -> W {
    self.out
  }

  fn write_data(&mut self, view: &ViewDescriptor, data: &ViewData) -> io::Result<()> {
    match data {
      ViewData::Home { series } => {
        writeln!(self.out, "Series")?;
        for s in series {
          match &s.format {
            Some(format) => writeln!(self.out, "  /{:<20} {} [{}]", s.id, s.title, format)?,
            None => writeln!(self.out, "  /{:<20} {}", s.id, s.title)?,
          }
        }
      }

      ViewData::SeriesDetail { info, volumes } => {
        writeln!(self.out, "{}", info.title)?;
        for (label, value) in series_metadata(info) {
          writeln!(self.out, "{}: {}", label, value)?;
        }
        if let Some(description) = &info.description {
          writeln!(self.out)?;
          writeln!(self.out, "{}", description)?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Volumes")?;
        let series_id = view.series_id().unwrap_or_default();
        for volume in volumes {
          match resources::volume_number(&volume.id) {
            Some(n) => writeln!(self.out, "  /{}/{:<10} {}", series_id, n, volume.title)?,
            None => writeln!(self.out, "  {:<12} {}", volume.id, volume.title)?,
          }
        }
      }

      ViewData::VolumeRead { manifest, chapter } => {
        let (series_id, volume, index) = match view {
          ViewDescriptor::VolumeRead {
            series_id,
            volume,
            chapter,
          } => (series_id.as_str(), *volume, *chapter),
          _ => ("", 0, 0),
        };
        writeln!(self.out, "{}", chapter.title)?;
        writeln!(
          self.out,
          "(chapter {} of {})",
          index + 1,
          manifest.chapters.len()
        )?;
        for block in &chapter.content {
          match block {
            ContentBlock::Paragraph { paragraph } => {
              writeln!(self.out)?;
              writeln!(self.out, "{}", paragraph)?;
            }
            ContentBlock::Image { image } => {
              writeln!(self.out)?;
              writeln!(self.out, "[image: {}]", image_path(series_id, volume, image))?;
            }
            ContentBlock::Quote { quote } => {
              writeln!(self.out)?;
              writeln!(self.out, "> {}", quote)?;
            }
            ContentBlock::Dialogue { dialogue } => {
              writeln!(self.out)?;
              for line in dialogue {
                writeln!(self.out, "{}: {}", line.character, line.speech)?;
              }
            }
            ContentBlock::Other(_) => {}
          }
        }
      }
    }
    Ok(())
  }
}

impl<W: Write> Renderer for TextRenderer<W> {
  fn render(&mut self, view: &ViewDescriptor, state: &PageState) -> io::Result<()> {
    match state {
      PageState::Idle => Ok(()),
      PageState::Loading => writeln!(self.out, "Loading {}...", view),
      PageState::Success(data) => self.write_data(view, data),
      PageState::Error(error) => {
        let (headline, detail) = error_message(error);
        writeln!(self.out, "Error: {}", headline)?;
        writeln!(self.out, "{}", detail)
      }
    }?;
    self.out.flush()
  }
}
