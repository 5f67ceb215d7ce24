use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{
  client::Transport,
  error::{RequestError, TransportError},
  feed::{FeedParser, RawEntry},
  filter::{Candidate, FilterContext, FilterPipeline},
  normalize::{normalize_entry, NormalizedItem, SourceRef},
  request::{FetchArgs, FetchOptions, FetchRequest},
  response::{AggregationResult, ErrorRecord},
};

const PARSE_FAILURE: &str = "No entries or parse failure";

/// A location that was fetched and parsed successfully.
#[derive(Clone, Debug)]
pub struct RawFeedResult {
  pub location: String,
  pub feed_title: String,
  pub entries: Vec<RawEntry>,
}

pub type FetchOutcome = Result<RawFeedResult, ErrorRecord>;

/// Identity used to collapse duplicates across sources.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DedupKey {
  Link(String),
  TitleAndSource(String, String),
}

impl DedupKey {
  fn of(item: &NormalizedItem) -> Self {
    if item.link.is_empty() {
      Self::TitleAndSource(item.title.clone(), item.source.feed_location.clone())
    } else {
      Self::Link(item.link.clone())
    }
  }
}

#[derive(Clone)]
pub struct Aggregator {
  transport: Arc<dyn Transport>,
  parser: Arc<dyn FeedParser>,
  parallelism: Option<usize>,
}

impl Aggregator {
  pub fn new(
    transport: Arc<dyn Transport>,
    parser: Arc<dyn FeedParser>,
  ) -> Self {
    Self {
      transport,
      parser,
      parallelism: None,
    }
  }

  /// Cap the number of fetches in flight at once. `None` means one
  /// per location.
  pub fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
    self.parallelism = parallelism.filter(|n| *n > 0);
    self
  }

  /// Resolve the arguments and run the whole batch. Only request-level
  /// problems are returned as errors; per-location failures end up in
  /// the result.
  pub async fn fetch_rss(
    &self,
    args: &FetchArgs,
    default_timeout: Duration,
  ) -> Result<AggregationResult, RequestError> {
    let request = args.resolve(default_timeout)?;
    Ok(self.aggregate(&request).await)
  }

  pub async fn aggregate(&self, request: &FetchRequest) -> AggregationResult {
    info!(
      locations = request.locations.len(),
      "fetching {} feed location(s)",
      request.locations.len()
    );

    let outcomes =
      self.fetch_all(&request.locations, request.options.timeout).await;

    let mut feeds = Vec::new();
    let mut errors = Vec::new();
    for outcome in outcomes {
      match outcome {
        Ok(feed) => feeds.push(feed),
        Err(e) => errors.push(e),
      }
    }

    let items = merge(feeds, &request.options, &FilterContext::new());
    let result = AggregationResult::new(items, errors);

    info!(
      items = result.count,
      errors = result.error_count(),
      "aggregation finished"
    );
    result
  }

  /// Fetch and parse every location concurrently. Waits for all of
  /// them; outcomes come back in completion order.
  pub async fn fetch_all(
    &self,
    locations: &[String],
    timeout: Duration,
  ) -> Vec<FetchOutcome> {
    let parallelism = self.parallelism.unwrap_or(locations.len()).max(1);

    stream::iter(locations.iter().cloned())
      .map(|location| self.fetch_one(location, timeout))
      .buffer_unordered(parallelism)
      .collect()
      .await
  }

  async fn fetch_one(&self, location: String, timeout: Duration) -> FetchOutcome {
    let fetched =
      tokio::time::timeout(timeout, self.transport.fetch(&location, timeout))
        .await
        .unwrap_or(Err(TransportError::Timeout(timeout)));

    let content = match fetched {
      Ok(content) => content,
      Err(e) => {
        warn!(%location, "fetch failed: {e}");
        return Err(ErrorRecord::new(location, e));
      }
    };

    let parsed = match self.parser.parse(&content) {
      Ok(parsed) if !parsed.entries.is_empty() => parsed,
      Ok(_) => {
        warn!(%location, "feed has no entries");
        return Err(ErrorRecord::new(location, PARSE_FAILURE));
      }
      Err(e) => {
        debug!(%location, "parse error: {e}");
        warn!(%location, "failed to parse feed");
        return Err(ErrorRecord::new(location, PARSE_FAILURE));
      }
    };

    debug!(%location, entries = parsed.entries.len(), "parsed feed");

    let feed_title = parsed
      .title
      .filter(|t| !t.is_empty())
      .unwrap_or_else(|| location.clone());

    Ok(RawFeedResult {
      location,
      feed_title,
      entries: parsed.entries,
    })
  }
}

/// Normalize, filter, dedup, rank and truncate. Feeds are consumed in
/// the order given, which decides which duplicate survives.
pub fn merge(
  feeds: Vec<RawFeedResult>,
  options: &FetchOptions,
  ctx: &FilterContext,
) -> Vec<NormalizedItem> {
  let pipeline = FilterPipeline::from_options(options);
  let mut seen = HashSet::new();
  let mut items = Vec::new();

  for feed in feeds {
    let source = SourceRef {
      feed_title: feed.feed_title,
      feed_location: feed.location,
    };

    for entry in &feed.entries {
      let item = normalize_entry(&source, entry, options.include_summary);

      let candidate = Candidate {
        item: &item,
        entry,
      };
      if !pipeline.keep(ctx, &candidate) {
        debug!(title = %item.title, "filtered out");
        continue;
      }

      if !seen.insert(DedupKey::of(&item)) {
        debug!(link = %item.link, "duplicate dropped");
        continue;
      }

      items.push(item);
    }
  }

  // stable, so equal timestamps keep arrival order
  items.sort_by_key(|item| Reverse(item.effective_timestamp()));
  items.truncate(options.max_items);
  items
}
