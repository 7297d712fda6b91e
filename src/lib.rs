//! asean_indicators
//!
//! Fetch, clean, and trend ASEAN economic indicators from the World Bank
//! Data360 API, and serve them to the dashboard in a stable JSON shape.
//! Pairs with the `asean-proxy` server and the `asean` CLI.
//!
//! ### Pipeline
//! - [`api`]: one GET per indicator request against Data360
//! - [`normalize`]: find the observations in the envelope, drop unusable
//!   ones, sort by year
//! - [`proxy`]: wrap as `{ "data": [...] }` or `{ "error": "..." }`
//! - [`trend`]: least-squares trend line for the regression overlay
//! - [`chart`]: chart configuration for the dashboard's line charts
//!
//! ### Example
//! ```no_run
//! use asean_indicators::{Client, IndicatorQuery, indicators, proxy, trend};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = Client::default();
//! let spec = indicators::find("gdp-per-capita").unwrap();
//! let records = proxy::run(&client, spec, &IndicatorQuery::for_country("VNM")).await?;
//! if let Some(line) = trend::trend_line(&records) {
//!     println!("{} points, trend ends at {:.2}", records.len(), line[line.len() - 1].y);
//! }
//! # Ok(()) }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod indicators;
pub mod models;
pub mod normalize;
pub mod proxy;
pub mod query;
pub mod server;
pub mod stats;
pub mod storage;
pub mod trend;

pub use api::{Client, Upstream, UpstreamError};
pub use indicators::IndicatorSpec;
pub use models::{NormalizedRecord, TrendPoint, Year};
pub use proxy::{ApiBody, ProxyError};
pub use query::IndicatorQuery;
