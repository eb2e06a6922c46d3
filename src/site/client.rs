use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::FetchError;

const USER_AGENT_VALUE: &str = concat!("ranobe/", env!("CARGO_PKG_VERSION"));

/// HTTP access to the static site. No caching; see `CachedSiteClient`.
#[derive(Debug, Clone)]
pub struct SiteClient {
  client: reqwest::Client,
  base_url: Url,
}

impl SiteClient {
  pub fn new(config: &Config) -> Result<Self> {
    Self::with_base_url(config.site_url()?, config.fetch_timeout())
  }

  pub fn with_base_url(base_url: Url, timeout: Duration) -> Result<Self> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    let client = reqwest::Client::builder()
      .timeout(timeout)
      .default_headers(default_headers)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Absolute URL of a server-relative resource path.
  pub fn resource_url(&self, path: &str) -> Result<Url, FetchError> {
    self
      .base_url
      .join(path.trim_start_matches('/'))
      .map_err(|source| FetchError::InvalidUrl {
        path: path.to_string(),
        source,
      })
  }

  /// GET a resource and parse it as JSON.
  ///
  /// The response must have a success status and a JSON content type.
  pub async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
    let url = self.resource_url(path)?;
    debug!(%url, "fetching resource");

    let response = self.client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status(status.as_u16()));
    }

    let content_type = response
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or("")
      .to_string();
    if !content_type.contains("application/json") {
      let received = if content_type.is_empty() {
        "unknown type".to_string()
      } else {
        content_type
      };
      return Err(FetchError::ContentType(received));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
  }
}
