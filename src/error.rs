//! Error types for the storage, network and navigation layers.
//!
//! - [`StorageError`] - key-value backend failures, absorbed by the cache store
//! - [`FetchError`] - a single network attempt that did not produce JSON
//! - [`SiteError`] - a resource that neither the network nor the cache could supply
//! - [`NavigationError`] - a view that cannot be shown

use std::fmt;

use thiserror::Error;

use crate::site::types::VolumeManifest;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),
  #[error("storage quota exceeded ({used} of {quota} bytes)")]
  QuotaExceeded { used: usize, quota: usize },
  #[error("storage lock poisoned")]
  LockPoisoned,
  #[error("failed to prepare storage: {0}")]
  Io(#[from] std::io::Error),
}

/// Why a network attempt failed. Every variant is recoverable through the cache.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("invalid resource url {path}: {source}")]
  InvalidUrl {
    path: String,
    #[source]
    source: url::ParseError,
  },
  #[error("request timed out")]
  Timeout,
  #[error("network error: {0}")]
  Network(#[source] reqwest::Error),
  #[error("HTTP error: {0}")]
  Status(u16),
  #[error("expected JSON but received {0}")]
  ContentType(String),
  #[error("JSON parse error: {0}")]
  Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      Self::Timeout
    } else {
      Self::Network(err)
    }
  }
}

#[derive(Debug, Error)]
pub enum SiteError {
  #[error("{path} is not available: {source}")]
  NotAvailable {
    path: String,
    #[source]
    source: FetchError,
  },
  #[error("{path} has an unexpected shape: {source}")]
  Malformed {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

impl SiteError {
  #[cfg(test)]
  pub fn path(&self) -> &str {
    match self {
      Self::NotAvailable { path, .. } | Self::Malformed { path, .. } => path,
    }
  }
}

/// The resource a view was waiting on when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
  SeriesIndex,
  SeriesInfo,
  VolumeList,
  VolumeManifest,
  Chapter,
}

impl fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::SeriesIndex => "series index",
      Self::SeriesInfo => "series info",
      Self::VolumeList => "volume list",
      Self::VolumeManifest => "volume",
      Self::Chapter => "chapter content",
    };
    f.write_str(label)
  }
}

/// Terminal failure for a navigation. No partial page is shown.
///
/// Failures past the volume manifest keep it, so chapter navigation still
/// works from the error page.
#[derive(Debug, Error)]
pub enum NavigationError {
  #[error("{kind} is not available")]
  ResourceUnavailable {
    kind: ResourceKind,
    #[source]
    source: SiteError,
    manifest: Option<Box<VolumeManifest>>,
  },
  #[error("chapter {index} not found (volume has {count} chapters)")]
  ChapterNotFound {
    index: usize,
    count: usize,
    manifest: Box<VolumeManifest>,
  },
}

impl NavigationError {
  pub fn unavailable(kind: ResourceKind, source: SiteError) -> Self {
    Self::ResourceUnavailable {
      kind,
      source,
      manifest: None,
    }
  }

  pub fn chapter_not_found(index: usize, manifest: VolumeManifest) -> Self {
    Self::ChapterNotFound {
      index,
      count: manifest.chapters.len(),
      manifest: Box::new(manifest),
    }
  }

  /// Attach the manifest of the volume the failed chapter belongs to.
  pub fn with_manifest(self, manifest: VolumeManifest) -> Self {
    match self {
      Self::ResourceUnavailable { kind, source, .. } => Self::ResourceUnavailable {
        kind,
        source,
        manifest: Some(Box::new(manifest)),
      },
      other => other,
    }
  }

  /// The volume manifest, when it loaded before the failure.
  pub fn manifest(&self) -> Option<&VolumeManifest> {
    match self {
      Self::ResourceUnavailable { manifest, .. } => manifest.as_deref(),
      Self::ChapterNotFound { manifest, .. } => Some(manifest.as_ref()),
    }
  }

  pub fn is_chapter_not_found(&self) -> bool {
    matches!(self, Self::ChapterNotFound { .. })
  }

  /// The resource kind that failed, if the failure was a missing resource.
  #[cfg(test)]
  pub fn resource_kind(&self) -> Option<ResourceKind> {
    match self {
      Self::ResourceUnavailable { kind, .. } => Some(*kind),
      Self::ChapterNotFound { .. } => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::site::types::ChapterRef;

  fn manifest(count: usize) -> VolumeManifest {
    VolumeManifest {
      chapters: (0..count)
        .map(|i| ChapterRef {
          title: format!("Chapter {}", i),
          file: format!("c{}.json", i),
        })
        .collect(),
    }
  }

  #[test]
  fn test_navigation_error_messages() {
    let err = NavigationError::chapter_not_found(99, manifest(3));
    assert_eq!(
      err.to_string(),
      "chapter 99 not found (volume has 3 chapters)"
    );
    assert!(err.is_chapter_not_found());
    assert_eq!(err.resource_kind(), None);
    assert_eq!(err.manifest().map(|m| m.chapters.len()), Some(3));

    let err = NavigationError::unavailable(
      ResourceKind::VolumeManifest,
      SiteError::NotAvailable {
        path: "series/a/volume1/volume1.json".to_string(),
        source: FetchError::Status(404),
      },
    );
    assert_eq!(err.to_string(), "volume is not available");
    assert_eq!(err.resource_kind(), Some(ResourceKind::VolumeManifest));
    assert!(err.manifest().is_none());
  }

  #[test]
  fn test_chapter_failure_keeps_manifest() {
    let err = NavigationError::unavailable(
      ResourceKind::Chapter,
      SiteError::NotAvailable {
        path: "series/a/volume1/c1.json".to_string(),
        source: FetchError::Timeout,
      },
    )
    .with_manifest(manifest(2));
    assert_eq!(err.resource_kind(), Some(ResourceKind::Chapter));
    assert_eq!(err.manifest().map(|m| m.chapters[1].file.as_str()), Some("c1.json"));
  }

  #[test]
  fn test_site_error_path() {
    let err = SiteError::NotAvailable {
      path: "series/demo/info.json".to_string(),
      source: FetchError::Timeout,
    };
    assert_eq!(err.path(), "series/demo/info.json");
    assert_eq!(
      err.to_string(),
      "series/demo/info.json is not available: request timed out"
    );
  }
}
