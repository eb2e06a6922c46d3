//! Cached site client that wraps SiteClient with transparent caching.

use color_eyre::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CacheSource, CacheStore, KvStorage, MemoryStorage, NoopStorage, SqliteStorage};
use crate::config::{CacheBackend, CacheConfig, Config};
use crate::error::SiteError;

use super::client::SiteClient;
use super::resources;
use super::types::{Chapter, SeriesInfo, SeriesSummary, VolumeManifest, VolumeSummary};

/// Site client with transparent caching support.
///
/// Every fetch goes to the network first. Successful responses refresh the
/// cache; failed ones are answered from the cache when a copy exists.
#[derive(Clone)]
pub struct CachedSiteClient {
  inner: SiteClient,
  cache: CacheStore,
}

impl CachedSiteClient {
  pub fn new(config: &Config) -> Result<Self> {
    let inner = SiteClient::new(config)?;
    let cache = CacheStore::new(Self::storage_for(&config.cache)).with_policy(config.cache.policy());

    Ok(Self { inner, cache })
  }

  /// Pick the storage backend. A durable store that cannot be opened leaves
  /// the client running without a cache.
  fn storage_for(config: &CacheConfig) -> Arc<dyn KvStorage> {
    if !config.enabled {
      info!("cache disabled");
      return Arc::new(NoopStorage);
    }

    match config.backend {
      CacheBackend::Memory => {
        info!(quota = ?config.quota_bytes, "using in-memory cache");
        match config.quota_bytes {
          Some(quota) => Arc::new(MemoryStorage::with_quota(quota)),
          None => Arc::new(MemoryStorage::new()),
        }
      }
      CacheBackend::Sqlite => {
        let opened = match &config.path {
          Some(path) => SqliteStorage::open_at(path),
          None => SqliteStorage::open(),
        };
        match opened {
          Ok(storage) => Arc::new(storage),
          Err(e) => {
            warn!(error = %e, "cache unavailable, continuing without it");
            Arc::new(NoopStorage)
          }
        }
      }
    }
  }

  pub fn with_parts(inner: SiteClient, cache: CacheStore) -> Self {
    Self { inner, cache }
  }

  pub fn site(&self) -> &SiteClient {
    &self.inner
  }

  /// Fetch a resource as raw JSON, falling back to the cache on failure.
  pub async fn fetch(&self, path: &str) -> Result<Value, SiteError> {
    let result = self
      .cache
      .fetch_through(path, || self.inner.get_json(path))
      .await
      .map_err(|source| SiteError::NotAvailable {
        path: path.to_string(),
        source,
      })?;

    if result.source == CacheSource::CacheFallback {
      debug!(path, cached_at = ?result.cached_at, "served from cache");
    }

    Ok(result.data)
  }

  async fn fetch_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, SiteError> {
    let data = self.fetch(path).await?;
    serde_json::from_value(data).map_err(|source| SiteError::Malformed {
      path: path.to_string(),
      source,
    })
  }

  pub async fn series_index(&self) -> Result<Vec<SeriesSummary>, SiteError> {
    self.fetch_as(resources::SERIES_INDEX).await
  }

  pub async fn series_info(&self, series_id: &str) -> Result<SeriesInfo, SiteError> {
    self.fetch_as(&resources::series_info(series_id)).await
  }

  pub async fn volumes(&self, series_id: &str) -> Result<Vec<VolumeSummary>, SiteError> {
    self.fetch_as(&resources::volume_list(series_id)).await
  }

  pub async fn volume_manifest(
    &self,
    series_id: &str,
    volume: u32,
  ) -> Result<VolumeManifest, SiteError> {
    self
      .fetch_as(&resources::volume_manifest(series_id, volume))
      .await
  }

  pub async fn chapter(
    &self,
    series_id: &str,
    volume: u32,
    file: &str,
  ) -> Result<Chapter, SiteError> {
    self
      .fetch_as(&resources::chapter(series_id, volume, file))
      .await
  }

  /// Drop every cached resource. Returns the number of entries removed.
  pub fn clear_cache(&self) -> usize {
    let removed = self.cache.clear();
    info!(removed, "cache cleared");
    removed
  }
}
