use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::cache::FallbackPolicy;

/// Environment variable that overrides `site.url`.
pub const SITE_URL_ENV: &str = "RANOBE_SITE_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to the site host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub site: SiteConfig,
  #[serde(default)]
  pub fetch: FetchConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
  /// Base URL the static JSON tree is served from
  pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for FetchConfig {
  fn default() -> Self {
    Self {
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_timeout_secs() -> u64 {
  10
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
  /// Any cached copy may replace a failed fetch
  #[default]
  Always,
  /// Only copies younger than `max_age_secs`
  MaxAge,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
  /// SQLite file that survives restarts
  #[default]
  Sqlite,
  /// Process memory, gone on exit
  Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
  #[serde(default)]
  pub backend: CacheBackend,
  /// Byte limit for the memory backend; writes past it are dropped
  pub quota_bytes: Option<usize>,
  /// Database location (default: $XDG_DATA_HOME/ranobe/cache.db)
  pub path: Option<PathBuf>,
  #[serde(default = "default_max_age_secs")]
  pub max_age_secs: u64,
  #[serde(default)]
  pub fallback: FallbackMode,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      backend: CacheBackend::default(),
      quota_bytes: None,
      path: None,
      max_age_secs: default_max_age_secs(),
      fallback: FallbackMode::default(),
    }
  }
}

fn default_true() -> bool {
  true
}

fn default_max_age_secs() -> u64 {
  300
}

impl CacheConfig {
  /// `max_age_secs` as a duration, if chrono can represent it.
  fn max_age(&self) -> Option<chrono::Duration> {
    i64::try_from(self.max_age_secs)
      .ok()
      .and_then(chrono::Duration::try_seconds)
  }

  pub fn policy(&self) -> FallbackPolicy {
    match self.fallback {
      FallbackMode::Always => FallbackPolicy::Always,
      FallbackMode::MaxAge => {
        FallbackPolicy::MaxAge(self.max_age().unwrap_or(chrono::Duration::MAX))
      }
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./ranobe.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/ranobe/config.yaml
  ///
  /// No file at all means defaults; an explicit path that is missing is an error.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Ok(url) = std::env::var(SITE_URL_ENV) {
      config.site.url = Some(url);
    }

    config.validate()?;
    Ok(config)
  }

  /// Reject values that parse but cannot work.
  pub fn validate(&self) -> Result<()> {
    if self.fetch.timeout_secs == 0 {
      return Err(eyre!("fetch.timeout_secs must be at least 1"));
    }
    if self.cache.max_age().is_none() {
      return Err(eyre!(
        "cache.max_age_secs is too large: {}",
        self.cache.max_age_secs
      ));
    }
    Ok(())
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("ranobe.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("ranobe").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// The site base URL, normalised to end with `/` so resource paths join under it.
  pub fn site_url(&self) -> Result<Url> {
    let raw = self.site.url.as_deref().ok_or_else(|| {
      eyre!(
        "No site URL configured. Set site.url in ~/.config/ranobe/config.yaml, \
         pass --site, or set {}.",
        SITE_URL_ENV
      )
    })?;

    let mut url = Url::parse(raw).map_err(|e| eyre!("Invalid site URL {}: {}", raw, e))?;
    if !url.path().ends_with('/') {
      let path = format!("{}/", url.path());
      url.set_path(&path);
    }
    Ok(url)
  }

  pub fn fetch_timeout(&self) -> Duration {
    Duration::from_secs(self.fetch.timeout_secs)
  }

  /// Header title: the configured title, else the site host.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    self
      .site_url()
      .ok()
      .and_then(|u| u.host_str().map(String::from))
      .unwrap_or_else(|| "ranobe".to_string())
  }
}

/// Application data directory (`$XDG_DATA_HOME/ranobe`).
pub fn data_dir() -> PathBuf {
  dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .unwrap_or_else(|| PathBuf::from("."))
    .join("ranobe")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_from_empty_document() {
    let config = Config::from_yaml("{}").unwrap();
    assert!(config.site.url.is_none());
    assert_eq!(config.fetch.timeout_secs, 10);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.max_age_secs, 300);
    assert_eq!(config.cache.backend, CacheBackend::Sqlite);
    assert_eq!(config.cache.policy(), FallbackPolicy::Always);
  }

  #[test]
  fn test_full_document() {
    let config = Config::from_yaml(
      r#"
title: Shelf
site:
  url: https://novels.example.org/library
fetch:
  timeout_secs: 3
cache:
  enabled: false
  backend: memory
  quota_bytes: 4096
  path: /tmp/ranobe.db
  max_age_secs: 60
  fallback: max_age
"#,
    )
    .unwrap();

    assert_eq!(config.display_title(), "Shelf");
    assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.backend, CacheBackend::Memory);
    assert_eq!(config.cache.quota_bytes, Some(4096));
    assert_eq!(config.cache.path, Some(PathBuf::from("/tmp/ranobe.db")));
    assert_eq!(
      config.cache.policy(),
      FallbackPolicy::MaxAge(chrono::Duration::seconds(60))
    );
    assert_eq!(
      config.site_url().unwrap().as_str(),
      "https://novels.example.org/library/"
    );
  }

  #[test]
  fn test_missing_site_url_is_an_error() {
    let config = Config::default();
    assert!(config.site_url().is_err());
    assert_eq!(config.display_title(), "ranobe");
  }

  #[test]
  fn test_title_defaults_to_host() {
    let mut config = Config::default();
    config.site.url = Some("http://localhost:8080".to_string());
    assert_eq!(config.display_title(), "localhost");
  }

  #[test]
  fn test_explicit_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(Some(&dir.path().join("nope.yaml")));
    assert!(result.is_err());
  }

  #[test]
  fn test_load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranobe.yaml");
    std::fs::write(&path, "site:\n  url: http://127.0.0.1:9000/\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    if std::env::var(SITE_URL_ENV).is_err() {
      assert_eq!(config.site.url.as_deref(), Some("http://127.0.0.1:9000/"));
    }
  }

  #[test]
  fn test_zero_timeout_is_rejected() {
    let config = Config::from_yaml("fetch:\n  timeout_secs: 0\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("timeout_secs"));
  }

  #[test]
  fn test_huge_max_age_is_rejected_without_panicking() {
    let config =
      Config::from_yaml("cache:\n  max_age_secs: 100000000000000000\n  fallback: max_age\n")
        .unwrap();
    assert!(config.validate().is_err());
    assert_eq!(
      config.cache.policy(),
      FallbackPolicy::MaxAge(chrono::Duration::MAX)
    );

    let config = Config::from_yaml("cache:\n  max_age_secs: 18446744073709551615\n").unwrap();
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranobe.yaml");
    std::fs::write(&path, "fetch:\n  timeout_secs: 0\n").unwrap();
    assert!(Config::load(Some(&path)).is_err());
  }

  #[test]
  fn test_default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
  }
}
