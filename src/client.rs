use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TransportError};

/// The transport capability: turn a feed location into raw bytes.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
  async fn fetch(
    &self,
    location: &str,
    timeout: Duration,
  ) -> Result<Vec<u8>, TransportError>;
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
  user_agent: Option<String>,
  accept: Option<String>,
  referer: Option<String>,
  /// Per-fetch timeout used when a request doesn't specify one.
  #[serde(default = "default_timeout")]
  #[serde(deserialize_with = "duration_str::deserialize_duration")]
  timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      user_agent: None,
      accept: None,
      referer: None,
      timeout: default_timeout(),
    }
  }
}

impl ClientConfig {
  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  fn to_builder(&self) -> Result<reqwest::ClientBuilder> {
    let mut builder = reqwest::Client::builder();

    if let Some(user_agent) = &self.user_agent {
      builder = builder.user_agent(user_agent);
    } else {
      builder = builder.user_agent(crate::util::USER_AGENT);
    }

    let mut header_map = HeaderMap::new();
    let accept = self.accept.as_deref().unwrap_or(DEFAULT_ACCEPT);
    header_map.append("Accept", header_value("Accept", accept)?);

    if let Some(referer) = &self.referer {
      header_map.append("Referer", header_value("Referer", referer)?);
    }

    builder = builder.default_headers(header_map).timeout(self.timeout);

    Ok(builder)
  }

  pub fn build(&self) -> Result<Client> {
    let reqwest_client = self.to_builder()?.build()?;
    Ok(Client::new(reqwest_client))
  }
}

const DEFAULT_ACCEPT: &str = "application/rss+xml, application/atom+xml, application/xml;q=0.9, text/xml;q=0.9, */*;q=0.8";

fn header_value(name: &str, value: &str) -> Result<http::HeaderValue> {
  value.try_into().map_err(|_| {
    crate::error::ConfigError::Message(format!("invalid {name} value: {value}"))
      .into()
  })
}

pub struct Client {
  client: reqwest::Client,
}

impl Client {
  fn new(client: reqwest::Client) -> Self {
    Self { client }
  }

  async fn get(
    &self,
    url: &Url,
    timeout: Duration,
  ) -> Result<Vec<u8>, TransportError> {
    #[cfg(test)]
    if url.scheme() == "fixture" {
      return crate::test_utils::read_fixture(url);
    }

    let resp = self.client.get(url.clone()).timeout(timeout).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(TransportError::HttpStatus(status));
    }

    Ok(resp.bytes().await?.to_vec())
  }
}

#[async_trait::async_trait]
impl Transport for Client {
  async fn fetch(
    &self,
    location: &str,
    timeout: Duration,
  ) -> Result<Vec<u8>, TransportError> {
    let url = Url::parse(location.trim())?;
    self.get(&url, timeout).await.map_err(|e| match e {
      TransportError::Request(e) if e.is_timeout() => {
        TransportError::Timeout(timeout)
      }
      e => e,
    })
  }
}

fn default_timeout() -> Duration {
  Duration::from_secs(10)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_config_parse() {
    let config: ClientConfig = serde_yaml::from_str(
      r#"
      user_agent: "roundup-test/1.0"
      timeout: 3s
      "#,
    )
    .unwrap();

    assert_eq!(config.timeout(), Duration::from_secs(3));
    assert_eq!(config.user_agent.as_deref(), Some("roundup-test/1.0"));
    assert!(config.build().is_ok());
  }

  #[test]
  fn test_default_timeout() {
    let config: ClientConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.timeout(), Duration::from_secs(10));
  }

  #[test]
  fn test_invalid_header_is_config_error() {
    let config = ClientConfig {
      referer: Some("bad\nvalue".into()),
      ..Default::default()
    };
    assert!(config.build().is_err());
  }

  #[tokio::test]
  async fn test_invalid_location() {
    let client = ClientConfig::default().build().unwrap();
    let err = client
      .fetch("not a url", Duration::from_secs(1))
      .await
      .unwrap_err();
    assert!(err.to_string().starts_with("InvalidUrl: "));
  }

  #[tokio::test]
  async fn test_fixture_location() {
    let client = ClientConfig::default().build().unwrap();
    let body = client
      .fetch("fixture:///azure_blog.xml", Duration::from_secs(1))
      .await
      .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("<rss"));
  }
}
