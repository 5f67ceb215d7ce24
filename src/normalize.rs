use chrono::{DateTime, Utc};
use scraper::Html;
use serde::Serialize;

use crate::{feed::RawEntry, util::date::parse_date};

/// Where an item came from.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
  pub feed_title: String,
  #[serde(rename = "feedUrl")]
  pub feed_location: String,
}

/// The canonical output unit. Built once per raw entry and never
/// modified afterwards.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NormalizedItem {
  pub title: String,
  pub link: String,
  #[serde(rename = "published")]
  pub published_at: Option<DateTime<Utc>>,
  #[serde(rename = "updated")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  pub source: SourceRef,
}

impl NormalizedItem {
  /// publishedAt, else updatedAt. `None` sorts below every timestamp.
  pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
    self.published_at.or(self.updated_at)
  }
}

pub fn normalize_entry(
  source: &SourceRef,
  entry: &RawEntry,
  include_summary: bool,
) -> NormalizedItem {
  let link = [&entry.link, &entry.id]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
    .cloned()
    .unwrap_or_default();

  let published_at =
    first_timestamp([&entry.published, &entry.pub_date, &entry.updated]);
  let updated_at = first_timestamp([&entry.updated, &entry.modified]);

  let summary = include_summary
    .then(|| clean_summary(entry.summary_or_description().unwrap_or("")));

  NormalizedItem {
    title: entry.title.as_deref().unwrap_or("").trim().to_owned(),
    link,
    published_at,
    updated_at,
    summary,
    source: source.clone(),
  }
}

fn first_timestamp<const N: usize>(
  candidates: [&Option<String>; N],
) -> Option<DateTime<Utc>> {
  candidates.into_iter().flatten().find_map(parse_date)
}

/// Strip markup, decode entities and collapse whitespace.
pub fn clean_summary(html: &str) -> String {
  if html.is_empty() {
    return String::new();
  }

  let fragment = Html::parse_fragment(html);
  let text: String = fragment.root_element().text().collect();
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}
