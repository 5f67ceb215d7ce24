use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::client::Transport;
use crate::error::TransportError;

fn fixture_path(name: &str) -> PathBuf {
  let name = name.trim_start_matches('/');
  format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name).into()
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
  let path = fixture_path(name);
  std::fs::read(&path)
    .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

/// Serves `fixture:///<name>` from the fixtures directory.
pub fn read_fixture(url: &Url) -> Result<Vec<u8>, TransportError> {
  let path = fixture_path(url.path());
  std::fs::read(&path)
    .map_err(|e| TransportError::Fixture(format!("{}: {e}", path.display())))
}

pub struct TestItem {
  pub title: &'static str,
  pub link: &'static str,
  pub published: Option<DateTime<Utc>>,
  pub description: &'static str,
}

impl TestItem {
  pub fn new(title: &'static str, link: &'static str) -> Self {
    Self {
      title,
      link,
      published: None,
      description: "",
    }
  }

  pub fn published(mut self, at: DateTime<Utc>) -> Self {
    self.published = Some(at);
    self
  }

  pub fn description(mut self, description: &'static str) -> Self {
    self.description = description;
    self
  }
}

/// Build an RSS 2.0 document. Timestamps are usually relative to
/// `Utc::now()` so recency filters behave the same on any day.
pub fn rss_xml(title: &str, items: &[TestItem]) -> Vec<u8> {
  let items: Vec<rss::Item> = items
    .iter()
    .map(|item| rss::Item {
      title: Some(item.title.to_owned()),
      link: Some(item.link.to_owned()).filter(|l| !l.is_empty()),
      pub_date: item.published.map(|t| t.to_rfc2822()),
      description: Some(item.description.to_owned())
        .filter(|d| !d.is_empty()),
      ..Default::default()
    })
    .collect();

  let channel = rss::Channel {
    title: title.to_owned(),
    link: "https://example.com/".to_owned(),
    description: "test feed".to_owned(),
    items,
    ..Default::default()
  };

  channel.write_to(Vec::new()).expect("failed to write channel")
}

pub enum Scripted {
  Body(Vec<u8>),
  Fail(fn() -> TransportError),
  Hang,
}

/// A transport that answers from a fixed script and records every
/// location it was asked for.
#[derive(Default)]
pub struct FakeTransport {
  script: HashMap<String, Scripted>,
  calls: Mutex<Vec<String>>,
}

impl FakeTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn body(mut self, location: &str, body: Vec<u8>) -> Self {
    self.script.insert(location.to_owned(), Scripted::Body(body));
    self
  }

  pub fn fail(mut self, location: &str, err: fn() -> TransportError) -> Self {
    self.script.insert(location.to_owned(), Scripted::Fail(err));
    self
  }

  pub fn hang(mut self, location: &str) -> Self {
    self.script.insert(location.to_owned(), Scripted::Hang);
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
  async fn fetch(
    &self,
    location: &str,
    _timeout: Duration,
  ) -> Result<Vec<u8>, TransportError> {
    self.calls.lock().unwrap().push(location.to_owned());

    match self.script.get(location) {
      Some(Scripted::Body(body)) => Ok(body.clone()),
      Some(Scripted::Fail(err)) => Err(err()),
      Some(Scripted::Hang) => {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(TransportError::Fixture("hang finished".into()))
      }
      None => Err(TransportError::Fixture(format!("unscripted: {location}"))),
    }
  }
}
