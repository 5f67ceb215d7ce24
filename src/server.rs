use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
  body::Bytes,
  extract::Query,
  response::{IntoResponse, Response},
  routing::get,
  Extension, Json, Router,
};
use clap::Parser;
use http::StatusCode;
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tracing::info;

use crate::{
  aggregate::Aggregator,
  config::RootConfig,
  error::{into_http, Error, Result},
  preset::{self, PresetCatalog},
  request::FetchArgs,
  response::AggregationResult,
};

#[derive(Parser)]
pub struct ServerConfig {
  #[clap(long, short, default_value = "127.0.0.1:4080")]
  bind: String,
}

impl ServerConfig {
  pub async fn run(self, config: RootConfig) -> Result<()> {
    let state = AppState {
      aggregator: config.build_aggregator()?,
      default_timeout: config.default_timeout(),
    };
    serve(&self.bind, state).await
  }
}

#[derive(Clone)]
pub struct AppState {
  pub aggregator: Aggregator,
  pub default_timeout: Duration,
}

pub async fn serve(bind: &str, state: AppState) -> Result<()> {
  info!("listening on {}", bind);
  let listener = tokio::net::TcpListener::bind(bind).await?;

  info!("starting server");
  Ok(axum::serve(listener, router(state)).await?)
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/fetch_rss", get(fetch_rss_query).post(fetch_rss_json))
    .route("/presets", get(list_presets))
    .route("/", get(|| async { "rss-roundup is up and running!" }))
    .route("/health", get(|| async { "ok" }))
    .fallback(|| async { (StatusCode::NOT_FOUND, "Endpoint not found") })
    .layer(Extension(Arc::new(state)))
    .layer(CompressionLayer::new().gzip(true))
}

async fn fetch_rss_json(
  Extension(state): Extension<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<AggregationResult>, ApiError> {
  let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
    Value::Null
  } else {
    serde_json::from_slice(&body)?
  };
  run_fetch(&state, payload).await
}

async fn fetch_rss_query(
  Extension(state): Extension<Arc<AppState>>,
  Query(params): Query<HashMap<String, String>>,
) -> Result<Json<AggregationResult>, ApiError> {
  let payload = params
    .into_iter()
    .map(|(k, v)| (k, Value::String(v)))
    .collect();
  run_fetch(&state, Value::Object(payload)).await
}

async fn run_fetch(
  state: &AppState,
  payload: Value,
) -> Result<Json<AggregationResult>, ApiError> {
  let args = FetchArgs::from_payload(payload)?;
  let result = state
    .aggregator
    .fetch_rss(&args, state.default_timeout)
    .await?;
  Ok(Json(result))
}

async fn list_presets() -> Json<PresetCatalog> {
  Json(preset::catalog())
}

/// Request-level failures, rendered as `{"error": ...}`.
#[derive(Debug)]
struct ApiError(Error);

impl<E> From<E> for ApiError
where
  E: Into<Error>,
{
  fn from(e: E) -> Self {
    Self(e.into())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = into_http(&self.0);
    info!("request rejected ({status}): {message}");
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod test {
  use axum::body::Body;
  use http::Request;
  use tower::ServiceExt;

  use super::*;
  use crate::feed::XmlFeedParser;
  use crate::test_utils::{rss_xml, FakeTransport, TestItem};

  fn app() -> Router {
    let feed = rss_xml(
      "Example",
      &[
        TestItem::new("Azure update", "https://e.example/1"),
        TestItem::new("Random post", "https://e.example/2"),
      ],
    );
    let transport =
      Arc::new(FakeTransport::new().body("https://e.example/feed", feed));
    let aggregator = Aggregator::new(transport, Arc::new(XmlFeedParser));

    router(AppState {
      aggregator,
      default_timeout: Duration::from_secs(1),
    })
  }

  async fn call(req: Request<Body>) -> (StatusCode, Value) {
    let resp = app().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
  }

  fn post(body: &str) -> Request<Body> {
    Request::post("/fetch_rss")
      .header("content-type", "application/json")
      .body(Body::from(body.to_owned()))
      .unwrap()
  }

  #[tokio::test]
  async fn test_post_fetch() {
    let (status, body) = call(post(
      r#"{"arguments": {"url": "https://e.example/feed", "keyword": "AZURE"}}"#,
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["title"], "Azure update");
    assert_eq!(body["items"][0]["source"]["feedTitle"], "Example");
    assert_eq!(body["errors"], Value::Null);
  }

  #[tokio::test]
  async fn test_get_fetch_with_query() {
    let req = Request::get("/fetch_rss?url=https://e.example/feed&maxItems=1")
      .body(Body::empty())
      .unwrap();
    let (status, body) = call(req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
  }

  #[tokio::test]
  async fn test_partial_failure_is_ok() {
    let (status, body) = call(post(
      r#"{"urlList": "https://e.example/feed,https://missing.example/feed"}"#,
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["errors"][0]["url"], "https://missing.example/feed");
  }

  #[tokio::test]
  async fn test_request_errors() {
    let (status, body) = call(post(r#"{"preset": "zenn_topic"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "preset=zenn_topic requires 'zennTopic'");

    let (status, body) = call(post("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Provide either url/urlList or a valid preset.");

    let (status, body) = call(post("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("JSON error"));
  }

  #[tokio::test]
  async fn test_presets_and_health() {
    let (status, body) =
      call(Request::get("/presets").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["presets"]["zenn_trend"], "Zenn global trending feed.");

    let resp = app()
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app()
      .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
