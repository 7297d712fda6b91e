//! Async client for the **World Bank Data360 API** (`/data360/data`).
//!
//! One indicator request maps to exactly one GET; the decoded JSON body is
//! returned untouched for the normalizer to pick apart.
//!
//! ### Notes
//! - No retries and no backoff: the dashboard surfaces a failure immediately.
//! - No explicit timeout; the transport's defaults apply.
//! - Non-2xx responses are failures even when the body happens to be JSON.
//!
//! Typical usage:
//! ```no_run
//! # use asean_indicators::{Client, IndicatorQuery, Upstream, indicators};
//! # async fn demo() -> anyhow::Result<()> {
//! let client = Client::default();
//! let spec = indicators::find("cpi").unwrap();
//! let query = IndicatorQuery::for_country("THA").resolve(spec);
//! let payload = client.fetch(spec, &query).await?;
//! # Ok(()) }
//! ```

use crate::indicators::IndicatorSpec;
use crate::query::ResolvedQuery;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://data360api.worldbank.org/data360/data";

/// Why an upstream call produced no payload.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS, redirect or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream responded with HTTP {0}")]
    Status(StatusCode),
    #[error("upstream returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of raw indicator payloads.
///
/// Implemented by [`Client`] for the real API; tests plug in canned payloads
/// or failures through the same seam.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(
        &self,
        spec: &IndicatorSpec,
        query: &ResolvedQuery,
    ) -> Result<Value, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// Allow -, _, . unescaped (indicator and dataset ids use them)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("asean-indicators/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Full request URL for one indicator query.
    pub fn query_url(&self, spec: &IndicatorSpec, query: &ResolvedQuery) -> String {
        let mut url = format!(
            "{}?DATABASE_ID={}&INDICATOR={}&REF_AREA={}&timePeriodFrom={}&timePeriodTo={}&skip=0",
            self.base_url,
            enc(spec.database_id),
            enc(spec.indicator_code),
            enc(&query.country),
            enc(&query.from),
            enc(&query.to),
        );
        if let Some(unit) = &query.unit_measure {
            url.push_str(&format!("&UNIT_MEASURE={}", enc(unit)));
        }
        url
    }
}

#[async_trait]
impl Upstream for Client {
    async fn fetch(
        &self,
        spec: &IndicatorSpec,
        query: &ResolvedQuery,
    ) -> Result<Value, UpstreamError> {
        let url = self.query_url(spec, query);
        log::debug!("GET {url}");
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
