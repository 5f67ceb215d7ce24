use std::time::Duration;

use http::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("YAML parse error")]
  Yaml(#[from] serde_yaml::Error),

  #[error("failed to read config file")]
  Io(#[from] std::io::Error),

  #[error("{0}")]
  Message(String),
}

/// Request-level failures. Any of these aborts the whole invocation
/// before a single fetch is issued.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RequestError {
  #[error("preset={preset} requires '{param}'")]
  MissingParameter {
    preset: &'static str,
    param: &'static str,
  },

  #[error("Unknown preset: {0}")]
  UnknownPreset(String),

  #[error("Provide either url/urlList or a valid preset.")]
  NoLocations,
}

/// Failure of the transport step for a single location. The display
/// form is `<Category>: <detail>` and ends up verbatim in the error
/// report of the response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
  #[error("Timeout: no response within {}s", .0.as_secs())]
  Timeout(Duration),

  #[error("HttpStatus: {0}")]
  HttpStatus(StatusCode),

  #[error("InvalidUrl: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("RequestError: {0}")]
  Request(#[from] reqwest::Error),

  #[error("FixtureError: {0}")]
  Fixture(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
  #[error("not an RSS feed ({rss}) nor an Atom feed ({atom})")]
  Unrecognized {
    rss: rss::Error,
    atom: atom_syndication::Error,
  },

  #[error("feed contains no entries")]
  NoEntries,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("IO error")]
  Io(#[from] std::io::Error),

  #[error("Config error {0:?}")]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Request(#[from] RequestError),

  #[error("Reqwest client error {0:?}")]
  Reqwest(#[from] reqwest::Error),

  #[error("JSON error {0}")]
  Json(#[from] serde_json::Error),
}

pub fn into_http(e: &Error) -> (StatusCode, String) {
  match e {
    Error::Request(_) | Error::Json(_) => (StatusCode::BAD_REQUEST, e.to_string()),
    _ => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:?}")),
  }
}
