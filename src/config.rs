use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  aggregate::Aggregator,
  client::ClientConfig,
  error::{ConfigError, Result},
  feed::XmlFeedParser,
};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RootConfig {
  #[serde(default)]
  pub client: ClientConfig,
  /// Maximum number of fetches in flight at once (default: one per
  /// location)
  #[serde(default)]
  pub parallelism: Option<usize>,
}

impl RootConfig {
  /// A missing file means defaults; an unreadable or invalid one is an
  /// error.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };

    if !path.exists() {
      info!("config file {} not found, using defaults", path.display());
      return Ok(Self::default());
    }

    let f = std::fs::File::open(path).map_err(ConfigError::from)?;
    let config = serde_yaml::from_reader(f).map_err(ConfigError::from)?;
    Ok(config)
  }

  pub fn default_timeout(&self) -> Duration {
    self.client.timeout()
  }

  pub fn build_aggregator(&self) -> Result<Aggregator> {
    let client = self.client.build()?;
    let aggregator = Aggregator::new(Arc::new(client), Arc::new(XmlFeedParser))
      .with_parallelism(self.parallelism);
    Ok(aggregator)
  }
}
