use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

use crate::{
  config::RootConfig,
  error::Result,
  preset,
  request::FetchArgs,
  response::ToolResponse,
  server::ServerConfig,
};

#[derive(Parser)]
#[clap(version, about = "Aggregate RSS and Atom feeds into one ranked list")]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,

  /// YAML config file; defaults are used when it doesn't exist
  #[clap(long, short, env = "RSS_ROUNDUP_CONFIG")]
  config: Option<PathBuf>,
}

#[derive(Parser)]
enum SubCommand {
  /// Serve the aggregator over HTTP
  Server(ServerConfig),
  /// Run one aggregation and print the JSON result
  Fetch(Box<FetchConfig>),
  /// Print the built-in presets
  Presets,
}

#[derive(Parser)]
struct FetchConfig {
  /// A single feed location
  #[clap(long, short)]
  url: Option<String>,
  /// Comma or whitespace separated feed locations
  #[clap(long)]
  url_list: Option<String>,
  /// A built-in preset (see the `presets` subcommand)
  #[clap(long, short)]
  preset: Option<String>,
  #[clap(long)]
  zenn_user: Option<String>,
  #[clap(long)]
  zenn_topic: Option<String>,
  /// Maximum number of items to return
  #[clap(long, short('n'))]
  max_items: Option<usize>,
  /// Only keep items from the last N hours
  #[clap(long)]
  since_hours: Option<u32>,
  /// Case-insensitive keyword to match in titles and summaries
  #[clap(long, short)]
  keyword: Option<String>,
  /// Leave summaries out of the output
  #[clap(long)]
  no_summary: bool,
  /// Per-feed timeout in seconds
  #[clap(long)]
  timeout_sec: Option<u64>,
  /// Print compact JSON instead of pretty-printing
  #[clap(long, short)]
  compact: bool,
}

impl FetchConfig {
  fn to_args(&self) -> FetchArgs {
    FetchArgs {
      url: self.url.clone().map(Value::from),
      url_list: self.url_list.clone().map(Value::from),
      preset: self.preset.clone().map(Value::from),
      zenn_user: self.zenn_user.clone().map(Value::from),
      zenn_topic: self.zenn_topic.clone().map(Value::from),
      max_items: self.max_items.map(Value::from),
      since_hours: self.since_hours.map(Value::from),
      keyword: self.keyword.clone().map(Value::from),
      include_summary: self.no_summary.then_some(Value::Bool(false)),
      timeout_sec: self.timeout_sec.map(Value::from),
    }
  }
}

impl Cli {
  pub async fn run(self) -> anyhow::Result<()> {
    let config = RootConfig::load(self.config.as_deref()).with_context(|| {
      format!("failed to load config from {:?}", self.config)
    })?;

    match self.subcmd {
      SubCommand::Server(server_config) => {
        server_config.run(config).await.context("server stopped")
      }
      SubCommand::Fetch(fetch_config) => {
        let aggregator = config
          .build_aggregator()
          .context("failed to build the feed client")?;
        let response: ToolResponse = aggregator
          .fetch_rss(&fetch_config.to_args(), config.default_timeout())
          .await
          .into();

        print_json(&response, fetch_config.compact)?;
        if !response.is_ok() {
          std::process::exit(2);
        }
        Ok(())
      }
      SubCommand::Presets => Ok(print_json(&preset::catalog(), false)?),
    }
  }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
  let output = if compact {
    serde_json::to_string(value)?
  } else {
    serde_json::to_string_pretty(value)?
  };
  println!("{output}");
  Ok(())
}
