//! Cache store that sits between the data fetcher and a storage backend.

use chrono::Utc;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::KvStorage;
use super::traits::{CacheEntry, CacheResult, FallbackPolicy};

/// Namespace for every key this application writes.
pub const CACHE_PREFIX: &str = "app_data_cache_";

/// Cache store over a shared storage backend.
///
/// Storage failures never escape: unreadable entries are deleted, and failed
/// writes are logged and dropped, so callers keep working network-first.
pub struct CacheStore {
  storage: Arc<dyn KvStorage>,
  prefix: String,
  policy: FallbackPolicy,
}

impl CacheStore {
  pub fn new(storage: Arc<dyn KvStorage>) -> Self {
    Self {
      storage,
      prefix: CACHE_PREFIX.to_string(),
      policy: FallbackPolicy::default(),
    }
  }

  /// Set which cached entries may stand in for a failed fetch.
  pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
    self.policy = policy;
    self
  }

  fn storage_key(&self, key: &str) -> String {
    format!("{}{}", self.prefix, key)
  }

  pub fn get(&self, key: &str) -> Option<CacheEntry> {
    let storage_key = self.storage_key(key);

    let raw = match self.storage.get(&storage_key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        warn!(key, error = %e, "failed to read cache entry");
        return None;
      }
    };

    match serde_json::from_str::<CacheEntry>(&raw) {
      Ok(entry) => Some(entry),
      Err(e) => {
        warn!(key, error = %e, "removing malformed cache entry");
        if let Err(e) = self.storage.remove(&storage_key) {
          warn!(key, error = %e, "failed to remove malformed cache entry");
        }
        None
      }
    }
  }

  /// Overwrite the entry for `key` with `data` stamped now.
  pub fn set(&self, key: &str, data: &Value) {
    let entry = CacheEntry::now(data.clone());
    let raw = match serde_json::to_string(&entry) {
      Ok(raw) => raw,
      Err(e) => {
        warn!(key, error = %e, "failed to serialize cache entry");
        return;
      }
    };

    if let Err(e) = self.storage.set(&self.storage_key(key), &raw) {
      warn!(key, error = %e, "failed to write cache entry");
    }
  }

  /// Remove every entry this store owns. Returns the number removed.
  pub fn clear(&self) -> usize {
    match self.storage.remove_prefixed(&self.prefix) {
      Ok(removed) => removed,
      Err(e) => {
        warn!(error = %e, "failed to clear cache");
        0
      }
    }
  }

  /// An entry usable as a fallback under the configured policy.
  fn fallback(&self, key: &str) -> Option<CacheEntry> {
    let entry = self.get(key)?;
    if self.policy.allows(&entry, Utc::now()) {
      Some(entry)
    } else {
      debug!(key, "cached entry too old to use as fallback");
      None
    }
  }

  /// Fetch with network-first strategy.
  ///
  /// 1. Run the fetcher
  /// 2. On success, overwrite the cache entry and return the fresh data
  /// 3. On failure, return the cached data if the policy allows it
  /// 4. Otherwise return the fetch error
  pub async fn fetch_through<F, Fut, E>(&self, key: &str, fetcher: F) -> Result<CacheResult<Value>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: Display,
  {
    match fetcher().await {
      Ok(data) => {
        self.set(key, &data);
        Ok(CacheResult::from_network(data))
      }
      Err(e) => {
        warn!(key, error = %e, "network fetch failed, trying cache");
        match self.fallback(key) {
          Some(entry) => {
            let cached_at = entry.cached_at();
            Ok(CacheResult::from_cache(entry.data, cached_at))
          }
          None => Err(e),
        }
      }
    }
  }
}

impl Clone for CacheStore {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      prefix: self.prefix.clone(),
      policy: self.policy,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::{MemoryStorage, NoopStorage};
  use crate::cache::traits::CacheSource;
  use serde_json::json;

  fn store_with(storage: Arc<dyn KvStorage>) -> CacheStore {
    CacheStore::new(storage)
  }

  #[test]
  fn test_set_then_get_round_trip() {
    let store = store_with(Arc::new(MemoryStorage::new()));
    let data = json!({
      "title": "Demo",
      "chapters": [{"title": "One", "file": "c1.json"}],
      "rating": 4.5,
      "tags": null,
    });

    store.set("series/demo/info.json", &data);

    let entry = store.get("series/demo/info.json").unwrap();
    assert_eq!(entry.data, data);
    assert!(entry.cached_at().is_some());
  }

  #[test]
  fn test_keys_are_prefixed() {
    let storage = Arc::new(MemoryStorage::new());
    let store = store_with(storage.clone());

    store.set("series/series-index.json", &json!([]));

    let raw = storage
      .get("app_data_cache_series/series-index.json")
      .unwrap()
      .unwrap();
    let entry: CacheEntry = serde_json::from_str(&raw).unwrap();
    assert_eq!(entry.data, json!([]));
  }

  #[test]
  fn test_malformed_entry_is_removed() {
    let storage = Arc::new(MemoryStorage::new());
    storage
      .set("app_data_cache_broken.json", "{\"timestamp\": 5")
      .unwrap();
    let store = store_with(storage.clone());

    assert_eq!(store.get("broken.json"), None);
    assert_eq!(storage.get("app_data_cache_broken.json").unwrap(), None);
  }

  #[test]
  fn test_write_failure_is_absorbed() {
    let store = store_with(Arc::new(MemoryStorage::with_quota(16)));
    store.set("series/demo/info.json", &json!({"title": "Demo"}));
    assert_eq!(store.get("series/demo/info.json"), None);
  }

  #[test]
  fn test_clear_only_touches_prefix() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set("unrelated", "keep").unwrap();
    let store = store_with(storage.clone());
    store.set("a.json", &json!(1));
    store.set("b.json", &json!(2));

    assert_eq!(store.clear(), 2);
    assert_eq!(storage.get("unrelated").unwrap().as_deref(), Some("keep"));
  }

  #[tokio::test]
  async fn test_fetch_through_refreshes_cache() {
    let store = store_with(Arc::new(MemoryStorage::new()));

    let result = store
      .fetch_through("a.json", || async { Ok::<_, String>(json!({"v": 1})) })
      .await
      .unwrap();
    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(store.get("a.json").unwrap().data, json!({"v": 1}));

    store
      .fetch_through("a.json", || async { Ok::<_, String>(json!({"v": 2})) })
      .await
      .unwrap();
    assert_eq!(store.get("a.json").unwrap().data, json!({"v": 2}));
  }

  #[tokio::test]
  async fn test_fetch_through_falls_back_to_cache() {
    let store = store_with(Arc::new(MemoryStorage::new()));
    store.set("a.json", &json!({"title": "Demo"}));

    let result = store
      .fetch_through("a.json", || async { Err::<Value, _>("offline".to_string()) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::CacheFallback);
    assert_eq!(result.data, json!({"title": "Demo"}));
  }

  #[tokio::test]
  async fn test_fetch_through_without_cache_fails() {
    let store = store_with(Arc::new(NoopStorage));

    let err = store
      .fetch_through("a.json", || async { Err::<Value, _>("offline".to_string()) })
      .await
      .unwrap_err();
    assert_eq!(err, "offline");
  }

  #[tokio::test]
  async fn test_max_age_policy_skips_old_entries() {
    let storage = Arc::new(MemoryStorage::new());
    let old = CacheEntry {
      data: json!("old"),
      timestamp: (Utc::now() - chrono::Duration::hours(2)).timestamp_millis(),
    };
    storage
      .set(
        "app_data_cache_a.json",
        &serde_json::to_string(&old).unwrap(),
      )
      .unwrap();

    let store = store_with(storage.clone())
      .with_policy(FallbackPolicy::MaxAge(chrono::Duration::hours(1)));

    let result = store
      .fetch_through("a.json", || async { Err::<Value, _>("offline".to_string()) })
      .await;
    assert!(result.is_err());
    // The stale entry is still there for a more permissive policy
    assert!(store.get("a.json").is_some());
  }
}
