//! World-state API client with transparent response caching.

use std::time::Duration;

use chrono::Utc;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::FetchError;
use crate::net::{build_http_client, get_json};

use super::api_types::parse_snapshot;
use super::types::WorldSnapshot;

/// Client for the per-platform world-state document.
///
/// The document rolls over roughly once a minute upstream, hence the short
/// TTL relative to market data.
#[derive(Clone)]
pub struct WorldstateClient {
  http: reqwest::Client,
  url: String,
  cache: TtlCache,
}

impl WorldstateClient {
  pub fn new(config: &Config) -> Result<Self, FetchError> {
    Ok(Self {
      http: build_http_client()?,
      url: format!(
        "{}/{}",
        config.worldstate.url.trim_end_matches('/'),
        config.platform
      ),
      cache: TtlCache::new(Duration::from_secs(config.tuning.worldstate_ttl_secs)),
    })
  }

  /// Fetch and parse the current world-state snapshot.
  ///
  /// Parsing never fails: malformed entities degrade to fallback values, so
  /// the only error source is the fetch itself (and then only when no stale
  /// cache entry exists to fall back on).
  pub async fn snapshot(&self) -> Result<WorldSnapshot, FetchError> {
    let result = self
      .cache
      .fetch(&self.url, || async { get_json(&self.http, &self.url, &[]).await })
      .await?;

    Ok(parse_snapshot(&result.data, Utc::now()))
  }
}
