use super::{Candidate, FilterContext, ItemFilter};
use crate::normalize::clean_summary;

/// Case-insensitive substring match on the entry's title and cleaned
/// summary text. The source entry is matched, so the summary counts
/// even when it is left out of the output.
#[derive(Clone, Debug)]
pub struct Keyword {
  needle: String,
}

impl Keyword {
  pub fn new(keyword: &str) -> Self {
    Self {
      needle: keyword.to_lowercase(),
    }
  }

  fn haystack(candidate: &Candidate<'_>) -> String {
    let title = candidate.entry.title.as_deref().unwrap_or("");
    let summary =
      clean_summary(candidate.entry.summary_or_description().unwrap_or(""));
    format!("{title} {summary}").to_lowercase()
  }
}

impl ItemFilter for Keyword {
  fn keep(&self, _ctx: &FilterContext, candidate: &Candidate<'_>) -> bool {
    Self::haystack(candidate).contains(&self.needle)
  }
}
