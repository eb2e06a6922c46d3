//! Site resource types.
//!
//! Keys follow the English schema; Indonesian keys published by some sites
//! (`judul`, `bab`, `konten`, ...) are accepted as aliases.

use serde::{Deserialize, Deserializer};

/// Entry in `series/series-index.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesSummary {
  pub id: String,
  #[serde(alias = "judul")]
  pub title: String,
  #[serde(default)]
  pub cover: Option<String>,
  /// "Light Novel", "Web Novel", "Manga", ...
  #[serde(default)]
  pub format: Option<String>,
}

/// `series/{id}/info.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesInfo {
  #[serde(alias = "judul")]
  pub title: String,
  #[serde(default, alias = "penulis")]
  pub author: Option<String>,
  #[serde(default, rename = "releaseDate", alias = "release_date", alias = "rilis")]
  pub release_date: Option<String>,
  #[serde(default, deserialize_with = "deserialize_genre")]
  pub genre: Option<String>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default, alias = "deskripsi")]
  pub description: Option<String>,
  #[serde(default)]
  pub cover: Option<String>,
}

/// Genre is published either as one string or as a list of strings.
fn deserialize_genre<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Genre {
    One(String),
    Many(Vec<String>),
  }

  let genre: Option<Genre> = Option::deserialize(deserializer)?;
  Ok(genre.map(|g| match g {
    Genre::One(s) => s,
    Genre::Many(v) => v.join(", "),
  }))
}

/// Entry in `series/{id}/volumes.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolumeSummary {
  /// Resource id, e.g. "volume1"
  pub id: String,
  #[serde(alias = "judul")]
  pub title: String,
  #[serde(default)]
  pub cover: Option<String>,
}

/// `series/{id}/{volumeId}/{volumeId}.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolumeManifest {
  #[serde(alias = "bab")]
  pub chapters: Vec<ChapterRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChapterRef {
  #[serde(alias = "judul")]
  pub title: String,
  /// Chapter file name relative to the volume directory
  pub file: String,
}

/// `series/{id}/{volumeId}/{chapterFile}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chapter {
  #[serde(alias = "judul")]
  pub title: String,
  #[serde(alias = "konten")]
  pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
  Paragraph {
    #[serde(alias = "paragraf")]
    paragraph: String,
  },
  Image {
    /// Image name under `images/{seriesId}/{volumeId}/`
    #[serde(alias = "gambar")]
    image: String,
  },
  Quote {
    #[serde(alias = "kutipan")]
    quote: String,
  },
  Dialogue {
    #[serde(alias = "dialog")]
    dialogue: Vec<DialogueLine>,
  },
  /// Block kinds this reader does not know; skipped when rendering
  Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueLine {
  #[serde(alias = "karakter")]
  pub character: String,
  #[serde(alias = "ucapan")]
  pub speech: String,
}
