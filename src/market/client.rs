//! Warframe Market API client with transparent response caching.

use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{FetchError, SearchError};
use crate::net::{build_http_client, get_json};

use super::api_types::{ApiItemsBody, ApiOrdersBody, ApiPayload};
use super::types::{Item, Order};

/// Client for the market item catalog and per-item order books.
///
/// Catalog and order-book responses share one cache instance; the catalog
/// changes rarely and order books are refetched on demand, so both live
/// comfortably under the same 5-minute TTL.
#[derive(Clone)]
pub struct MarketClient {
  http: reqwest::Client,
  base_url: String,
  platform: String,
  cache: TtlCache,
}

impl MarketClient {
  pub fn new(config: &Config) -> Result<Self, FetchError> {
    Ok(Self {
      http: build_http_client()?,
      base_url: config.market.url.trim_end_matches('/').to_string(),
      platform: config.platform.clone(),
      cache: TtlCache::new(Duration::from_secs(config.tuning.market_ttl_secs)),
    })
  }

  /// Fetch the full item catalog.
  pub async fn items(&self) -> Result<Vec<Item>, FetchError> {
    let url = format!("{}/items", self.base_url);
    let result = self
      .cache
      .fetch(&url, || async {
        get_json(&self.http, &url, &[("Platform", self.platform.clone())]).await
      })
      .await?;

    let body: ApiPayload<ApiItemsBody> = serde_json::from_value(result.data)?;
    Ok(body.payload.items.into_iter().map(|i| i.into_domain()).collect())
  }

  /// Search the catalog by case-insensitive substring match.
  pub async fn search_items(&self, query: &str) -> Result<Vec<Item>, SearchError> {
    let needle = query.trim().to_lowercase();
    let matches: Vec<Item> = self
      .items()
      .await?
      .into_iter()
      .filter(|item| item.name.to_lowercase().contains(&needle))
      .collect();

    if matches.is_empty() {
      return Err(SearchError::EmptyResult {
        query: query.trim().to_string(),
      });
    }
    Ok(matches)
  }

  /// Fetch the order book for one item.
  pub async fn orders(&self, url_name: &str) -> Result<Vec<Order>, FetchError> {
    let url = format!("{}/items/{}/orders", self.base_url, url_name);
    let result = self
      .cache
      .fetch(&url, || async {
        get_json(&self.http, &url, &[("Platform", self.platform.clone())]).await
      })
      .await?;

    let body: ApiPayload<ApiOrdersBody> = serde_json::from_value(result.data)?;
    Ok(
      body
        .payload
        .orders
        .into_iter()
        .filter_map(|o| o.into_domain())
        .collect(),
    )
  }
}
