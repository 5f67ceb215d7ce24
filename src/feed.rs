mod entry;
mod extension;

pub use entry::RawEntry;

use crate::error::ParseError;

#[derive(Clone, Debug, PartialEq)]
pub enum Feed {
  Rss(rss::Channel),
  Atom(atom_syndication::Feed),
}

/// A feed reduced to what the aggregator needs: its own title and the
/// raw entries in document order.
#[derive(Clone, Debug, Default)]
pub struct ParsedFeed {
  pub title: Option<String>,
  pub entries: Vec<RawEntry>,
}

/// The parse capability: turn fetched bytes into a [`ParsedFeed`].
pub trait FeedParser: Send + Sync {
  fn parse(&self, content: &[u8]) -> Result<ParsedFeed, ParseError>;
}

/// Parses RSS 2.0 first and falls back to Atom 1.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlFeedParser;

impl FeedParser for XmlFeedParser {
  fn parse(&self, content: &[u8]) -> Result<ParsedFeed, ParseError> {
    let parsed = Feed::from_xml_content(content)?.into_parsed();
    if parsed.entries.is_empty() {
      return Err(ParseError::NoEntries);
    }
    Ok(parsed)
  }
}

impl Feed {
  pub fn from_rss_content(content: &[u8]) -> Result<Self, rss::Error> {
    let cursor = std::io::Cursor::new(content);
    let channel = rss::Channel::read_from(cursor)?;
    Ok(Feed::Rss(channel))
  }

  pub fn from_atom_content(
    content: &[u8],
  ) -> Result<Self, atom_syndication::Error> {
    let cursor = std::io::Cursor::new(content);
    let feed = atom_syndication::Feed::read_from(cursor)?;
    Ok(Feed::Atom(feed))
  }

  pub fn from_xml_content(content: &[u8]) -> Result<Self, ParseError> {
    match Feed::from_rss_content(content) {
      Ok(feed) => Ok(feed),
      Err(rss) => Feed::from_atom_content(content)
        .map_err(|atom| ParseError::Unrecognized { rss, atom }),
    }
  }

  pub fn title(&self) -> &str {
    match self {
      Feed::Rss(channel) => &channel.title,
      Feed::Atom(feed) => feed.title.as_str(),
    }
  }

  pub fn into_parsed(self) -> ParsedFeed {
    let title = Some(self.title().trim().to_owned()).filter(|t| !t.is_empty());
    let entries = match self {
      Feed::Rss(channel) => channel.items.iter().map(RawEntry::from).collect(),
      Feed::Atom(feed) => feed.entries.iter().map(RawEntry::from).collect(),
    };

    ParsedFeed { title, entries }
  }
}
