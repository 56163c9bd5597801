//! Cache layer that orchestrates TTL checks with network fetching.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::warn;

use crate::error::FetchError;

use super::traits::{CacheEntry, CacheResult};

/// In-memory TTL cache over upstream JSON responses, keyed by request URL.
///
/// The TTL is a constructor parameter: two instances exist in practice, one
/// for market data (5 minutes) and one for world-state data (1 minute).
///
/// The entry map sits behind a single mutex so the check-TTL / store
/// sequences stay consistent when fetches complete from spawned tasks. The
/// lock is never held across an await.
pub struct TtlCache {
  entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
  ttl: Duration,
}

impl TtlCache {
  /// Create a new cache whose entries are valid for `ttl`.
  pub fn new(ttl: Duration) -> Self {
    Self {
      entries: Arc::new(Mutex::new(HashMap::new())),
      ttl,
    }
  }

  /// Fetch the payload for `url`, consulting the cache first.
  ///
  /// 1. An entry younger than the TTL is returned without network access.
  /// 2. Otherwise `fetcher` performs the real request; on success the entry
  ///    is replaced and the fresh payload returned.
  /// 3. On failure a stale entry, if one exists, is returned as a fallback;
  ///    without one the error propagates.
  pub async fn fetch<F, Fut>(&self, url: &str, fetcher: F) -> Result<CacheResult<Value>, FetchError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, FetchError>>,
  {
    if let Some(entry) = self.lookup(url) {
      if entry.fetched_at.elapsed() < self.ttl {
        return Ok(CacheResult::fresh(entry.payload));
      }
    }

    match fetcher().await {
      Ok(payload) => {
        self.store(url, payload.clone());
        Ok(CacheResult::from_network(payload))
      }
      Err(err) => match self.lookup(url) {
        Some(entry) => {
          warn!(url, error = %err, "fetch failed, serving stale cache entry");
          Ok(CacheResult::stale_fallback(entry.payload))
        }
        None => Err(err),
      },
    }
  }

  fn lookup(&self, url: &str) -> Option<CacheEntry> {
    self.lock().get(url).cloned()
  }

  fn store(&self, url: &str, payload: Value) {
    self.lock().insert(
      url.to_string(),
      CacheEntry {
        payload,
        fetched_at: Instant::now(),
      },
    );
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    // A poisoned lock only means another task panicked between map
    // operations; the map itself is still usable.
    match self.entries.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }
}

impl Clone for TtlCache {
  fn clone(&self) -> Self {
    Self {
      entries: Arc::clone(&self.entries),
      ttl: self.ttl,
    }
  }
}
