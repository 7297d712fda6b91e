//! HTTP surface of the proxy.
//!
//! `GET /api/{indicator}?country=&from=&to=&unit_measure=` runs the proxy
//! pipeline for one indicator. Every response, including failures, 404s and
//! the router's own rejections, carries `Access-Control-Allow-Origin: *` so
//! the dashboard can call it from any origin. Repeated query parameters
//! resolve to their first value.

use crate::api::{Client, Upstream};
use crate::config::Config;
use crate::indicators::{ASEAN_COUNTRIES, INDICATORS, find};
use crate::proxy::{self, ApiBody};
use crate::query::IndicatorQuery;
use anyhow::Context;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared, immutable request context. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/indicators", get(indicators_handler))
        .route("/api/countries", get(countries_handler))
        .route("/api/:indicator", get(indicator_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(from_fn(cors_middleware))
}

async fn cors_middleware(req: Request, next: Next) -> Response {
    let mut resp = if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,OPTIONS"),
        );
        resp
    } else {
        next.run(req).await
    };
    resp.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    resp
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ApiBody::Error { error })).into_response()
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn indicators_handler() -> Json<serde_json::Value> {
    Json(json!({ "indicators": INDICATORS }))
}

async fn countries_handler() -> Json<serde_json::Value> {
    Json(json!({ "countries": ASEAN_COUNTRIES }))
}

async fn not_found_handler(uri: Uri) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("not found: {}", uri.path()))
}

async fn indicator_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let Some(spec) = find(&slug) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown indicator: {slug}"));
    };
    let query = match pairs {
        Ok(Query(pairs)) => IndicatorQuery::from_pairs(pairs),
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };
    let resp = proxy::respond(state.upstream.as_ref(), spec, &query).await;
    (resp.status, Json(resp.body)).into_response()
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let upstream: Arc<dyn Upstream> = Arc::new(Client::new(config.upstream_url.clone()));
    let app = build_router(AppState::new(upstream));
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;
    log::info!(
        "listening on {} (upstream {})",
        listener.local_addr()?,
        config.upstream_url
    );
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
