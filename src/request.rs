use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
  error::RequestError,
  preset::{Preset, PresetParams},
  util::{value_as_bool, value_as_i64, value_as_string},
};

pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Caller-supplied arguments, loosely typed. Every field is optional
/// and malformed values fall back to defaults instead of failing.
/// Aliased keys are folded in by [`FetchArgs::from_payload`].
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchArgs {
  pub url: Option<Value>,
  pub url_list: Option<Value>,
  pub preset: Option<Value>,
  pub zenn_user: Option<Value>,
  pub zenn_topic: Option<Value>,
  pub max_items: Option<Value>,
  pub since_hours: Option<Value>,
  pub keyword: Option<Value>,
  pub include_summary: Option<Value>,
  pub timeout_sec: Option<Value>,
}

/// Alternative spellings accepted for some keys, as (key, alias).
const ALIASES: &[(&str, &str)] = &[
  ("url", "location"),
  ("urlList", "locationList"),
  ("timeoutSec", "timeoutSeconds"),
];

impl FetchArgs {
  /// Accepts either the bare arguments object or one wrapped as
  /// `{"arguments": {...}}`.
  pub fn from_payload(payload: Value) -> serde_json::Result<Self> {
    let args = match payload {
      Value::Object(mut map) if map.contains_key("arguments") => {
        map.remove("arguments").unwrap_or(Value::Null)
      }
      payload => payload,
    };

    match args {
      Value::Null => Ok(Self::default()),
      Value::Object(map) => {
        serde_json::from_value(Value::Object(fold_aliases(map)))
      }
      args => serde_json::from_value(args),
    }
  }
}

/// The canonical key wins when both spellings are present.
fn fold_aliases(mut map: Map<String, Value>) -> Map<String, Value> {
  for (key, alias) in ALIASES {
    if let Some(value) = map.remove(*alias) {
      map.entry(*key).or_insert(value);
    }
  }
  map
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
  pub max_items: usize,
  pub since_hours: Option<u32>,
  pub keyword: Option<String>,
  pub include_summary: bool,
  pub timeout: Duration,
}

/// A validated request: what to fetch and how to post-process it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
  pub locations: Vec<String>,
  pub options: FetchOptions,
}

/// Split a delimited location list on any run of commas or whitespace.
pub fn split_location_list(list: &str) -> Vec<String> {
  lazy_static::lazy_static! {
    static ref SEPARATOR: Regex = Regex::new(r"[,\s]+").unwrap();
  }

  SEPARATOR
    .split(list)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

fn string_arg(value: &Option<Value>) -> Option<String> {
  value.as_ref().and_then(value_as_string)
}

fn positive_arg(value: &Option<Value>) -> Option<i64> {
  value.as_ref().and_then(value_as_i64).filter(|n| *n > 0)
}

impl FetchArgs {
  pub fn resolve(
    &self,
    default_timeout: Duration,
  ) -> Result<FetchRequest, RequestError> {
    let locations = self.resolve_locations()?;

    let options = FetchOptions {
      max_items: positive_arg(&self.max_items)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_MAX_ITEMS),
      since_hours: positive_arg(&self.since_hours)
        .and_then(|n| u32::try_from(n).ok()),
      keyword: string_arg(&self.keyword)
        .map(|k| k.trim().to_owned())
        .filter(|k| !k.is_empty()),
      include_summary: self
        .include_summary
        .as_ref()
        .and_then(value_as_bool)
        .unwrap_or(true),
      timeout: positive_arg(&self.timeout_sec)
        .and_then(|n| u64::try_from(n).ok())
        .map(Duration::from_secs)
        .unwrap_or(default_timeout),
    };

    Ok(FetchRequest { locations, options })
  }

  /// Single location, then the list, then the preset. Identical
  /// locations are kept; duplicates are collapsed later on items.
  fn resolve_locations(&self) -> Result<Vec<String>, RequestError> {
    let mut locations = Vec::new();

    locations.extend(string_arg(&self.url));
    if let Some(list) = string_arg(&self.url_list) {
      locations.extend(split_location_list(&list));
    }

    if let Some(id) = string_arg(&self.preset).filter(|p| !p.trim().is_empty())
    {
      let params = PresetParams {
        zenn_user: string_arg(&self.zenn_user),
        zenn_topic: string_arg(&self.zenn_topic),
      };
      locations.extend(Preset::from_id(&id)?.resolve(&params)?);
    }

    let locations: Vec<String> = locations
      .into_iter()
      .map(|l| l.trim().to_owned())
      .filter(|l| !l.is_empty())
      .collect();

    if locations.is_empty() {
      return Err(RequestError::NoLocations);
    }

    Ok(locations)
  }
}
