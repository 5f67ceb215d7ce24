mod keyword;
mod since;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use keyword::Keyword;
pub use since::Since;

use crate::{feed::RawEntry, normalize::NormalizedItem, request::FetchOptions};

#[derive(Clone, Debug)]
pub struct FilterContext {
  now: DateTime<Utc>,
}

impl FilterContext {
  pub fn new() -> Self {
    Self { now: Utc::now() }
  }

  pub fn now(&self) -> DateTime<Utc> {
    self.now
  }
}

impl Default for FilterContext {
  fn default() -> Self {
    Self::new()
  }
}

/// A normalized item together with the entry it was built from. Some
/// filters look at source data the item itself no longer carries.
pub struct Candidate<'a> {
  pub item: &'a NormalizedItem,
  pub entry: &'a RawEntry,
}

pub trait ItemFilter {
  fn keep(&self, ctx: &FilterContext, candidate: &Candidate<'_>) -> bool;
}

#[derive(Clone)]
pub struct BoxedFilter(Arc<dyn ItemFilter + Send + Sync>);

impl ItemFilter for BoxedFilter {
  fn keep(&self, ctx: &FilterContext, candidate: &Candidate<'_>) -> bool {
    self.0.keep(ctx, candidate)
  }
}

impl BoxedFilter {
  fn from<T>(filter: T) -> Self
  where
    T: ItemFilter + Send + Sync + 'static,
  {
    Self(Arc::new(filter))
  }
}

/// Filters applied to every item before it is accumulated. Order:
/// recency first, then keyword.
#[derive(Clone, Default)]
pub struct FilterPipeline {
  filters: Vec<BoxedFilter>,
}

impl FilterPipeline {
  pub fn from_options(options: &FetchOptions) -> Self {
    let mut filters = Vec::new();

    if let Some(hours) = options.since_hours {
      filters.push(BoxedFilter::from(Since::hours(hours)));
    }
    if let Some(keyword) = &options.keyword {
      filters.push(BoxedFilter::from(Keyword::new(keyword)));
    }

    Self { filters }
  }

  pub fn keep(&self, ctx: &FilterContext, candidate: &Candidate<'_>) -> bool {
    self.filters.iter().all(|f| f.keep(ctx, candidate))
  }
}
