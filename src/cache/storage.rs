//! Key-value storage backends for the resource cache.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for cache storage backends.
///
/// Values are opaque strings; the cache store owns their format.
pub trait KvStorage: Send + Sync {
  fn get(&self, key: &str) -> StorageResult<Option<String>>;

  /// Insert or overwrite the value for `key`.
  fn set(&self, key: &str, value: &str) -> StorageResult<()>;

  fn remove(&self, key: &str) -> StorageResult<()>;

  /// Remove every key starting with `prefix`, returning how many went.
  fn remove_prefixed(&self, prefix: &str) -> StorageResult<usize>;
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl KvStorage for NoopStorage {
  fn get(&self, _key: &str) -> StorageResult<Option<String>> {
    Ok(None)
  }

  fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
    Ok(())
  }

  fn remove(&self, _key: &str) -> StorageResult<()> {
    Ok(())
  }

  fn remove_prefixed(&self, _prefix: &str) -> StorageResult<usize> {
    Ok(0)
  }
}

/// In-process storage with an optional byte quota, counted over keys and values.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, String>>,
  quota: Option<usize>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_quota(quota: usize) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      quota: Some(quota),
    }
  }

  fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
    self.entries.lock().map_err(|_| StorageError::LockPoisoned)
  }
}

impl KvStorage for MemoryStorage {
  fn get(&self, key: &str) -> StorageResult<Option<String>> {
    Ok(self.lock()?.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> StorageResult<()> {
    let mut entries = self.lock()?;

    if let Some(quota) = self.quota {
      let used: usize = entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
      let needed = used + key.len() + value.len();
      if needed > quota {
        return Err(StorageError::QuotaExceeded {
          used: needed,
          quota,
        });
      }
    }

    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> StorageResult<()> {
    self.lock()?.remove(key);
    Ok(())
  }

  fn remove_prefixed(&self, prefix: &str) -> StorageResult<usize> {
    let mut entries = self.lock()?;
    let before = entries.len();
    entries.retain(|k, _| !k.starts_with(prefix));
    Ok(before - entries.len())
  }
}

/// SQLite-based durable storage.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

/// Schema for the cache table.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_cache (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

impl SqliteStorage {
  /// Open (or create) the database at the default location.
  pub fn open() -> StorageResult<Self> {
    Self::open_at(&Self::default_path())
  }

  pub fn open_at(path: &Path) -> StorageResult<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    Self::with_connection(conn)
  }

  #[cfg(test)]
  pub fn in_memory() -> StorageResult<Self> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> StorageResult<Self> {
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// `$XDG_DATA_HOME/ranobe/cache.db`, falling back to `~/.local/share`.
  pub fn default_path() -> PathBuf {
    crate::config::data_dir().join("cache.db")
  }

  fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_| StorageError::LockPoisoned)
  }
}

impl KvStorage for SqliteStorage {
  fn get(&self, key: &str) -> StorageResult<Option<String>> {
    let conn = self.lock()?;
    let value = conn
      .query_row(
        "SELECT value FROM kv_cache WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> StorageResult<()> {
    let conn = self.lock()?;
    conn.execute(
      "INSERT OR REPLACE INTO kv_cache (key, value) VALUES (?, ?)",
      params![key, value],
    )?;
    Ok(())
  }

  fn remove(&self, key: &str) -> StorageResult<()> {
    let conn = self.lock()?;
    conn.execute("DELETE FROM kv_cache WHERE key = ?", params![key])?;
    Ok(())
  }

  fn remove_prefixed(&self, prefix: &str) -> StorageResult<usize> {
    let conn = self.lock()?;
    // substr keeps LIKE wildcards in the prefix from matching
    let removed = conn.execute(
      "DELETE FROM kv_cache WHERE substr(key, 1, length(?1)) = ?1",
      params![prefix],
    )?;
    Ok(removed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn exercise(storage: &dyn KvStorage) {
    assert_eq!(storage.get("a").unwrap(), None);

    storage.set("a", "1").unwrap();
    storage.set("a", "2").unwrap();
    assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));

    storage.set("p_x", "x").unwrap();
    storage.set("p_y", "y").unwrap();
    assert_eq!(storage.remove_prefixed("p_").unwrap(), 2);
    assert_eq!(storage.get("p_x").unwrap(), None);
    assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));

    storage.remove("a").unwrap();
    assert_eq!(storage.get("a").unwrap(), None);
  }

  #[test]
  fn test_memory_storage() {
    exercise(&MemoryStorage::new());
  }

  #[test]
  fn test_sqlite_storage() {
    exercise(&SqliteStorage::in_memory().unwrap());
  }

  #[test]
  fn test_sqlite_prefix_is_literal() {
    let storage = SqliteStorage::in_memory().unwrap();
    storage.set("a_b", "1").unwrap();
    storage.set("axb", "2").unwrap();
    assert_eq!(storage.remove_prefixed("a_").unwrap(), 1);
    assert_eq!(storage.get("axb").unwrap().as_deref(), Some("2"));
  }

  #[test]
  fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.db");

    {
      let storage = SqliteStorage::open_at(&path).unwrap();
      storage.set("series/demo/info.json", "{}").unwrap();
    }

    let storage = SqliteStorage::open_at(&path).unwrap();
    assert_eq!(
      storage.get("series/demo/info.json").unwrap().as_deref(),
      Some("{}")
    );
  }

  #[test]
  fn test_memory_quota() {
    let storage = MemoryStorage::with_quota(10);
    storage.set("k", "12345").unwrap();
    // Overwriting the same key only counts the new value
    storage.set("k", "123456789").unwrap();
    let err = storage.set("other", "12345").unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));
    assert_eq!(storage.get("other").unwrap(), None);
  }

  #[test]
  fn test_noop_storage_discards() {
    let storage = NoopStorage;
    storage.set("a", "1").unwrap();
    assert_eq!(storage.get("a").unwrap(), None);
  }
}
