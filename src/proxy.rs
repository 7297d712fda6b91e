//! Presentation contract: the fetch -> normalize -> wrap pipeline and the JSON
//! shapes the dashboard receives.
//!
//! Success is `200 {"data": [...]}`; any adapter or normalization failure is
//! `500 {"error": "API request failed: <message>"}`. A payload with no
//! recognizable envelope is a success with `data: []`.

use crate::api::{Upstream, UpstreamError};
use crate::indicators::IndicatorSpec;
use crate::models::NormalizedRecord;
use crate::normalize::{NormalizeError, normalize};
use crate::query::IndicatorQuery;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every failure message returned to callers.
pub const FAILURE_PREFIX: &str = "API request failed: ";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ProxyError {
    /// Message placed in the `error` field.
    pub fn client_message(&self) -> String {
        format!("{FAILURE_PREFIX}{self}")
    }
}

/// Body of every indicator response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiBody {
    Data { data: Vec<NormalizedRecord> },
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: ApiBody,
}

impl ProxyResponse {
    pub fn ok(data: Vec<NormalizedRecord>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiBody::Data { data },
        }
    }

    pub fn failure(err: &ProxyError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ApiBody::Error {
                error: err.client_message(),
            },
        }
    }
}

/// Run one indicator request: a single upstream call, then normalization.
pub async fn run<U>(
    upstream: &U,
    spec: &IndicatorSpec,
    query: &IndicatorQuery,
) -> Result<Vec<NormalizedRecord>, ProxyError>
where
    U: Upstream + ?Sized,
{
    let resolved = query.resolve(spec);
    log::info!(
        "{} for {} ({}..{})",
        spec.slug,
        resolved.country,
        resolved.from,
        resolved.to
    );
    let payload = upstream.fetch(spec, &resolved).await?;
    Ok(normalize(&payload, spec.tracks_units)?)
}

/// Same as [`run`], folded into the response contract. Never fails.
pub async fn respond<U>(
    upstream: &U,
    spec: &IndicatorSpec,
    query: &IndicatorQuery,
) -> ProxyResponse
where
    U: Upstream + ?Sized,
{
    match run(upstream, spec, query).await {
        Ok(data) => ProxyResponse::ok(data),
        Err(e) => {
            log::warn!("{} request failed: {e}", spec.slug);
            ProxyResponse::failure(&e)
        }
    }
}
