use super::extension::ExtensionExt;

/// One entry as found in the source document. Every field is optional
/// and carried as text; nothing is validated or normalized yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEntry {
  pub title: Option<String>,
  pub link: Option<String>,
  pub id: Option<String>,
  pub published: Option<String>,
  pub pub_date: Option<String>,
  pub updated: Option<String>,
  pub modified: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
}

impl RawEntry {
  /// The HTML-bearing text of the entry: summary, else description.
  pub fn summary_or_description(&self) -> Option<&str> {
    non_empty(self.summary.as_deref())
      .or_else(|| non_empty(self.description.as_deref()))
  }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
  s.filter(|s| !s.is_empty())
}

fn non_empty_owned(s: &str) -> Option<String> {
  (!s.is_empty()).then(|| s.to_owned())
}

impl From<&rss::Item> for RawEntry {
  fn from(item: &rss::Item) -> Self {
    let dc_date = item
      .dublin_core_ext
      .as_ref()
      .and_then(|dc| dc.dates.first().cloned());

    let modified = item
      .extensions
      .tags_with_names(&["modified", "dcterms:modified"])
      .into_iter()
      .find_map(|tag| tag.value.clone());

    Self {
      title: item.title.clone(),
      link: item.link.clone(),
      id: item.guid.as_ref().and_then(|g| non_empty_owned(&g.value)),
      published: None,
      pub_date: item.pub_date.clone(),
      updated: dc_date,
      modified,
      summary: None,
      description: item.description.clone(),
    }
  }
}

impl From<&atom_syndication::Entry> for RawEntry {
  fn from(entry: &atom_syndication::Entry) -> Self {
    let link = entry
      .links
      .iter()
      .find(|l| l.rel == "alternate")
      .or_else(|| entry.links.first())
      .and_then(|l| non_empty_owned(&l.href));

    Self {
      title: Some(entry.title.value.clone()),
      link,
      id: non_empty_owned(&entry.id),
      published: entry.published.map(|d| d.to_rfc3339()),
      pub_date: None,
      // a missing <updated> is read as the unix epoch
      updated: Some(entry.updated)
        .filter(|d| d.timestamp() != 0)
        .map(|d| d.to_rfc3339()),
      modified: None,
      summary: entry.summary.as_ref().map(|s| s.value.clone()),
      description: entry.content.as_ref().and_then(|c| c.value.clone()),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::feed::Feed;
  use crate::test_utils::fixture_bytes;

  fn rss_entries(xml: &[u8]) -> Vec<RawEntry> {
    Feed::from_xml_content(xml).unwrap().into_parsed().entries
  }

  #[test]
  fn test_rss_item_fields() {
    let entries = rss_entries(&fixture_bytes("azure_blog.xml"));
    let first = &entries[0];
    assert_eq!(
      first.link.as_deref(),
      Some("https://azure.example.com/blog/new-regions")
    );
    assert_eq!(first.pub_date.as_deref(), Some("Mon, 06 May 2024 09:00:00 +0200"));
    assert!(first.description.as_deref().unwrap().contains("<p>"));
    assert_eq!(first.published, None);
  }

  #[test]
  fn test_rss_guid_and_dublin_core() {
    let xml = br#"<?xml version="1.0"?>
      <rss version="2.0"
           xmlns:dc="http://purl.org/dc/elements/1.1/"
           xmlns:dcterms="http://purl.org/dc/terms/">
      <channel><title>t</title><link>l</link><description>d</description>
      <item>
        <title>no link</title>
        <guid isPermaLink="false">urn:post:1</guid>
        <dc:date>2024-05-01T00:00:00Z</dc:date>
        <dcterms:modified>2024-05-02T00:00:00Z</dcterms:modified>
      </item>
      </channel></rss>"#;

    let entries = rss_entries(xml);
    assert_eq!(entries[0].link, None);
    assert_eq!(entries[0].id.as_deref(), Some("urn:post:1"));
    assert_eq!(entries[0].updated.as_deref(), Some("2024-05-01T00:00:00Z"));
    assert_eq!(entries[0].modified.as_deref(), Some("2024-05-02T00:00:00Z"));
  }

  #[test]
  fn test_atom_entry_fields() {
    let entries = rss_entries(&fixture_bytes("zenn_topic.xml"));
    let first = &entries[0];
    assert_eq!(
      first.link.as_deref(),
      Some("https://zenn.dev/alice/articles/functions-mcp")
    );
    assert!(first.published.is_some());
    assert!(first.updated.is_some());
    assert_eq!(
      first.summary_or_description(),
      Some("Building an MCP server on <em>Azure Functions</em>.")
    );
  }

  #[test]
  fn test_atom_entry_without_dates() {
    let xml = br#"<?xml version="1.0"?>
      <feed xmlns="http://www.w3.org/2005/Atom">
        <title>t</title><id>urn:f</id><updated>2024-05-01T00:00:00Z</updated>
        <entry>
          <title>undated</title>
          <id>urn:e</id>
          <link href="https://example.com/undated"/>
        </entry>
      </feed>"#;

    let entries = rss_entries(xml);
    assert_eq!(entries[0].published, None);
    assert_eq!(entries[0].updated, None);

    let source = crate::normalize::SourceRef {
      feed_title: "t".into(),
      feed_location: "urn:f".into(),
    };
    let item = crate::normalize::normalize_entry(&source, &entries[0], false);
    assert_eq!(item.effective_timestamp(), None);
  }

  #[test]
  fn test_summary_falls_back_to_description() {
    let entry = RawEntry {
      summary: Some(String::new()),
      description: Some("body".into()),
      ..Default::default()
    };
    assert_eq!(entry.summary_or_description(), Some("body"));
    assert_eq!(RawEntry::default().summary_or_description(), None);
  }
}
