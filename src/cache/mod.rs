//! Resource cache with offline fallback.
//!
//! This module provides a site-agnostic caching mechanism that:
//! - Persists `{data, timestamp}` entries keyed by resource path
//! - Self-heals by deleting entries that no longer parse
//! - Never lets a storage failure interrupt the caller
//! - Serves cached data when the network is unavailable

mod layer;
mod storage;
mod traits;

pub use layer::CacheStore;
pub use storage::{KvStorage, MemoryStorage, NoopStorage, SqliteStorage};
pub use traits::{CacheSource, FallbackPolicy};
