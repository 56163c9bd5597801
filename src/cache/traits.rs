//! Core types for the response cache.

use std::time::Instant;

use serde_json::Value;

/// A cached upstream response, keyed by request URL.
///
/// Entries are replaced wholesale when a fetch succeeds, never mutated in
/// place, and never shared outside the cache.
#[derive(Debug, Clone)]
pub(super) struct CacheEntry {
  pub payload: Value,
  pub fetched_at: Instant,
}

/// Result from a cache operation, including metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  /// Create a new cache result from an entry that is still within TTL.
  pub fn fresh(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Fresh,
    }
  }

  /// Create a new cache result from a stale entry served because the live
  /// fetch failed.
  pub fn stale_fallback(data: T) -> Self {
    Self {
      data,
      source: CacheSource::StaleFallback,
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still within TTL
  Fresh,
  /// Data from cache, past TTL, served because the network fetch failed
  StaleFallback,
}
