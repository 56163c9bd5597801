//! Shared HTTP plumbing for the upstream API clients.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

use crate::error::FetchError;

/// Build the reqwest client both API clients share.
pub fn build_http_client() -> Result<reqwest::Client, FetchError> {
  let mut headers = HeaderMap::new();
  headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

  let client = reqwest::Client::builder()
    .user_agent(concat!("wf9s/", env!("CARGO_PKG_VERSION")))
    .default_headers(headers)
    .build()?;

  Ok(client)
}

/// Perform a GET request and return the response body as opaque JSON.
///
/// Non-2xx statuses become `FetchError::Status`; the body is not consulted
/// for error details because the upstream error shapes are not stable.
pub async fn get_json(
  http: &reqwest::Client,
  url: &str,
  extra_headers: &[(&'static str, String)],
) -> Result<Value, FetchError> {
  let mut request = http.get(url);
  for (name, value) in extra_headers {
    request = request.header(*name, value);
  }

  let response = request.send().await?;
  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::Status {
      status: status.as_u16(),
      url: url.to_string(),
    });
  }

  Ok(response.json::<Value>().await?)
}
