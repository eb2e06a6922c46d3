//! Resource paths on the static site.
//!
//! URLs carry a volume *number* (`/demo/2/0`) while the JSON tree uses the
//! volume *id* (`series/demo/volume2/...`).

pub const SERIES_INDEX: &str = "series/series-index.json";

pub fn series_info(series_id: &str) -> String {
  format!("series/{}/info.json", series_id)
}

pub fn volume_list(series_id: &str) -> String {
  format!("series/{}/volumes.json", series_id)
}

pub fn volume_manifest(series_id: &str, volume: u32) -> String {
  let volume_id = volume_id(volume);
  format!("series/{}/{}/{}.json", series_id, volume_id, volume_id)
}

pub fn chapter(series_id: &str, volume: u32, file: &str) -> String {
  format!("series/{}/{}/{}", series_id, volume_id(volume), file)
}

pub fn chapter_image(series_id: &str, volume: u32, name: &str) -> String {
  format!("images/{}/{}/{}", series_id, volume_id(volume), name)
}

/// Volume number to resource id: `3` -> `"volume3"`.
pub fn volume_id(volume: u32) -> String {
  format!("volume{}", volume)
}

/// Resource id to volume number: `"volume3"` -> `Some(3)`.
pub fn volume_number(volume_id: &str) -> Option<u32> {
  let digits = volume_id.strip_prefix("volume")?;
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  digits.parse().ok()
}

/// Make a cover reference root-relative unless it already is absolute.
pub fn cover_path(relative: &str) -> Option<String> {
  if relative.is_empty() {
    return None;
  }
  if relative.starts_with('/') || relative.starts_with("http://") || relative.starts_with("https://")
  {
    return Some(relative.to_string());
  }
  Some(format!("/{}", relative))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_paths() {
    assert_eq!(SERIES_INDEX, "series/series-index.json");
    assert_eq!(series_info("demo"), "series/demo/info.json");
    assert_eq!(volume_list("demo"), "series/demo/volumes.json");
    assert_eq!(
      volume_manifest("demo", 1),
      "series/demo/volume1/volume1.json"
    );
    assert_eq!(chapter("demo", 1, "c01.json"), "series/demo/volume1/c01.json");
    assert_eq!(
      chapter_image("demo", 2, "art.png"),
      "images/demo/volume2/art.png"
    );
  }

  #[test]
  fn test_volume_id_conversion() {
    assert_eq!(volume_id(12), "volume12");
    assert_eq!(volume_number("volume12"), Some(12));
    assert_eq!(volume_number("volume"), None);
    assert_eq!(volume_number("vol1"), None);
    assert_eq!(volume_number("volume+1"), None);
    assert_eq!(volume_number("volume99999999999"), None);
  }

  #[test]
  fn test_cover_path() {
    assert_eq!(cover_path(""), None);
    assert_eq!(cover_path("covers/a.jpg").as_deref(), Some("/covers/a.jpg"));
    assert_eq!(cover_path("/covers/a.jpg").as_deref(), Some("/covers/a.jpg"));
    assert_eq!(
      cover_path("https://cdn.example.org/a.jpg").as_deref(),
      Some("https://cdn.example.org/a.jpg")
    );
  }
}
