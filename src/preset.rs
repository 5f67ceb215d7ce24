use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::RequestError;

/// Built-in feed shortcuts. The registry is closed: adding a preset
/// means adding a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
  AzureBlog,
  AzureUpdatesRc,
  ZennTrend,
  ZennUser,
  ZennTopic,
}

/// Caller-supplied value a parametrized preset needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresetParam {
  ZennUser,
  ZennTopic,
}

impl PresetParam {
  pub fn field(&self) -> &'static str {
    match self {
      Self::ZennUser => "zennUser",
      Self::ZennTopic => "zennTopic",
    }
  }
}

/// Parameter values collected from the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresetParams {
  pub zenn_user: Option<String>,
  pub zenn_topic: Option<String>,
}

impl PresetParams {
  fn get(&self, param: PresetParam) -> Option<&str> {
    let value = match param {
      PresetParam::ZennUser => self.zenn_user.as_deref(),
      PresetParam::ZennTopic => self.zenn_topic.as_deref(),
    };
    value.map(str::trim).filter(|v| !v.is_empty())
  }
}

impl Preset {
  pub const ALL: [Preset; 5] = [
    Preset::AzureBlog,
    Preset::AzureUpdatesRc,
    Preset::ZennTrend,
    Preset::ZennUser,
    Preset::ZennTopic,
  ];

  pub fn id(&self) -> &'static str {
    match self {
      Self::AzureBlog => "azure_blog",
      Self::AzureUpdatesRc => "azure_updates_rc",
      Self::ZennTrend => "zenn_trend",
      Self::ZennUser => "zenn_user",
      Self::ZennTopic => "zenn_topic",
    }
  }

  pub fn from_id(id: &str) -> Result<Self, RequestError> {
    Self::ALL
      .into_iter()
      .find(|p| p.id() == id.trim())
      .ok_or_else(|| RequestError::UnknownPreset(id.to_owned()))
  }

  pub fn description(&self) -> &'static str {
    match self {
      Self::AzureBlog => "Azure Blog RSS (official).",
      Self::AzureUpdatesRc => {
        "Azure updates via Microsoft Release Communications RSS (alt)."
      }
      Self::ZennTrend => "Zenn global trending feed.",
      Self::ZennUser => "Zenn user feed. Requires 'zennUser' argument.",
      Self::ZennTopic => "Zenn topic feed. Requires 'zennTopic' argument.",
    }
  }

  pub fn resolve(
    &self,
    params: &PresetParams,
  ) -> Result<Vec<String>, RequestError> {
    let location = match self {
      Self::AzureBlog => {
        "https://azure.microsoft.com/en-us/blog/feed/".to_owned()
      }
      Self::AzureUpdatesRc => {
        "https://www.microsoft.com/releasecommunications/api/v2/azure/rss"
          .to_owned()
      }
      Self::ZennTrend => "https://zenn.dev/feed".to_owned(),
      Self::ZennUser => format!(
        "https://zenn.dev/{}/feed",
        self.param_value(params, PresetParam::ZennUser)?
      ),
      Self::ZennTopic => format!(
        "https://zenn.dev/topics/{}/feed",
        self.param_value(params, PresetParam::ZennTopic)?
      ),
    };

    Ok(vec![location])
  }

  // percent-encoded, so it can be pasted into a path segment
  fn param_value(
    &self,
    params: &PresetParams,
    param: PresetParam,
  ) -> Result<String, RequestError> {
    params
      .get(param)
      .map(|v| urlencoding::encode(v).into_owned())
      .ok_or(RequestError::MissingParameter {
        preset: self.id(),
        param: param.field(),
      })
  }
}

#[derive(Serialize, Debug)]
pub struct PresetCatalog {
  presets: BTreeMap<&'static str, &'static str>,
  examples: Vec<Example>,
}

#[derive(Serialize, Debug)]
struct Example {
  tool: &'static str,
  arguments: Value,
}

/// The read-only preset listing, with a few example invocations.
pub fn catalog() -> PresetCatalog {
  let presets = Preset::ALL
    .into_iter()
    .map(|p| (p.id(), p.description()))
    .collect();

  let examples = [
    json!({"preset": "azure_blog", "maxItems": 5}),
    json!({"preset": "zenn_user", "zennUser": "yamadakz", "maxItems": 10}),
    json!({"preset": "zenn_topic", "zennTopic": "azure", "sinceHours": 72}),
  ]
  .into_iter()
  .map(|arguments| Example {
    tool: "fetch_rss",
    arguments,
  })
  .collect();

  PresetCatalog { presets, examples }
}
