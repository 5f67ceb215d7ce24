use serde::Serialize;

use crate::{error::RequestError, normalize::NormalizedItem};

/// One failed location and why it failed.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ErrorRecord {
  #[serde(rename = "url")]
  pub location: String,
  #[serde(rename = "error")]
  pub message: String,
}

impl ErrorRecord {
  pub fn new(location: impl Into<String>, message: impl ToString) -> Self {
    Self {
      location: location.into(),
      message: message.to_string(),
    }
  }
}

/// The outcome of a whole batch. Errors don't imply an empty item
/// list; partial success is normal.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AggregationResult {
  pub count: usize,
  pub items: Vec<NormalizedItem>,
  pub errors: Option<Vec<ErrorRecord>>,
}

impl AggregationResult {
  pub fn new(items: Vec<NormalizedItem>, errors: Vec<ErrorRecord>) -> Self {
    Self {
      count: items.len(),
      items,
      errors: Some(errors).filter(|e| !e.is_empty()),
    }
  }

  pub fn error_count(&self) -> usize {
    self.errors.as_ref().map_or(0, Vec::len)
  }
}

/// What the caller sees: either a batch result or a request-level
/// failure as `{"error": ...}`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ToolResponse {
  Ok(AggregationResult),
  Failed { error: String },
}

impl ToolResponse {
  pub fn is_ok(&self) -> bool {
    matches!(self, Self::Ok(_))
  }
}

impl From<Result<AggregationResult, RequestError>> for ToolResponse {
  fn from(result: Result<AggregationResult, RequestError>) -> Self {
    match result {
      Ok(result) => Self::Ok(result),
      Err(e) => Self::Failed {
        error: e.to_string(),
      },
    }
  }
}
