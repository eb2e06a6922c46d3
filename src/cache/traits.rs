//! Core types for the resource cache.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached resource as persisted in storage: `{"data": ..., "timestamp": ...}`.
///
/// `timestamp` is epoch milliseconds of the last successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
  pub data: Value,
  pub timestamp: i64,
}

impl CacheEntry {
  /// Create an entry stamped with the current time.
  pub fn now(data: Value) -> Self {
    Self {
      data,
      timestamp: Utc::now().timestamp_millis(),
    }
  }

  /// When the entry was written, if the timestamp is representable.
  pub fn cached_at(&self) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(self.timestamp).single()
  }

  /// Age of the entry relative to `now`. Entries from the future have zero age.
  pub fn age(&self, now: DateTime<Utc>) -> Duration {
    let age = Duration::milliseconds(now.timestamp_millis() - self.timestamp);
    age.max(Duration::zero())
  }

  pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
    self.age(now) >= max_age
  }
}

/// Which cached entries may stand in for a failed network fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
  /// Any cached entry is acceptable, however old.
  #[default]
  Always,
  /// Entries older than the limit are ignored (but kept).
  MaxAge(Duration),
}

impl FallbackPolicy {
  pub fn allows(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
    match self {
      Self::Always => true,
      Self::MaxAge(max_age) => !entry.is_expired(*max_age, now),
    }
  }
}

/// Result from a cache-through fetch, including where the data came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  pub fn from_cache(data: T, cached_at: Option<DateTime<Utc>>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFallback,
      cached_at,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Network failed; served from cache
  CacheFallback,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_entry_wire_format() {
    let entry = CacheEntry {
      data: json!({"title": "Demo"}),
      timestamp: 1_700_000_000_000,
    };
    let raw = serde_json::to_string(&entry).unwrap();
    assert_eq!(raw, r#"{"data":{"title":"Demo"},"timestamp":1700000000000}"#);
  }

  #[test]
  fn test_entry_requires_both_fields() {
    assert!(serde_json::from_str::<CacheEntry>(r#"{"data": 1}"#).is_err());
    assert!(serde_json::from_str::<CacheEntry>(r#"{"timestamp": 1}"#).is_err());
    assert!(serde_json::from_str::<CacheEntry>(r#"{"data": 1, "timestamp": "x"}"#).is_err());
    assert!(serde_json::from_str::<CacheEntry>("not json").is_err());
  }

  #[test]
  fn test_age_and_expiry() {
    let now = Utc::now();
    let entry = CacheEntry {
      data: Value::Null,
      timestamp: (now - Duration::seconds(301)).timestamp_millis(),
    };
    assert!(entry.is_expired(Duration::seconds(300), now));
    assert!(!entry.is_expired(Duration::seconds(600), now));

    let future = CacheEntry {
      data: Value::Null,
      timestamp: (now + Duration::seconds(60)).timestamp_millis(),
    };
    assert_eq!(future.age(now), Duration::zero());
  }

  #[test]
  fn test_fallback_policy() {
    let now = Utc::now();
    let old = CacheEntry {
      data: Value::Null,
      timestamp: (now - Duration::days(30)).timestamp_millis(),
    };
    assert!(FallbackPolicy::Always.allows(&old, now));
    assert!(!FallbackPolicy::MaxAge(Duration::hours(1)).allows(&old, now));
  }
}
