use thiserror::Error;

/// Error type for upstream HTTP fetches.
///
/// - `Transport` - network/transport errors (wraps `reqwest::Error`)
/// - `Status` - non-2xx response
/// - `Decode` - response body was not the JSON we expected
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{url} returned HTTP {status}")]
  Status { status: u16, url: String },

  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),
}

/// Error type for item search operations.
#[derive(Debug, Error)]
pub enum SearchError {
  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error("no items match \"{query}\"")]
  EmptyResult { query: String },
}
