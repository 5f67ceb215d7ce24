use chrono::Duration;

use super::{Candidate, FilterContext, ItemFilter};

/// Only items published within this window are kept. Items with no
/// usable timestamp are dropped. A window reaching past the earliest
/// representable time keeps every dated item.
#[derive(Clone, Debug)]
pub struct Since {
  window: Duration,
}

impl Since {
  pub fn hours(hours: u32) -> Self {
    Self {
      window: Duration::hours(i64::from(hours)),
    }
  }
}

impl ItemFilter for Since {
  fn keep(&self, ctx: &FilterContext, candidate: &Candidate<'_>) -> bool {
    let cutoff = ctx.now().checked_sub_signed(self.window);
    candidate
      .item
      .effective_timestamp()
      .is_some_and(|t| cutoff.is_none_or(|cutoff| t >= cutoff))
  }
}
