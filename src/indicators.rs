//! Indicator catalogue and the ASEAN reference areas the dashboard offers.
//!
//! Every endpoint runs the same fetch -> normalize -> wrap pipeline; the only
//! differences between indicators live here: which Data360 dataset and code to
//! query, how far back the default range starts, and whether the upstream rows
//! carry a unit dimension worth passing through.

use chrono::{Datelike, Utc};
use serde::Serialize;

/// Reference area used when the caller does not name one.
pub const DEFAULT_COUNTRY: &str = "MYS";

/// Earliest year the WDI and FAS series go back to.
pub const HISTORY_START: i32 = 1960;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorSpec {
    /// Route segment, e.g. `gdp-per-capita` in `/api/gdp-per-capita`.
    pub slug: &'static str,
    pub name: &'static str,
    pub database_id: &'static str,
    pub indicator_code: &'static str,
    pub default_from: i32,
    /// Keep `UNIT_MEASURE` on records and accept a `unit_measure` filter.
    pub tracks_units: bool,
}

impl IndicatorSpec {
    /// Default end of the range: the current calendar year (UTC).
    pub fn default_to(&self) -> i32 {
        current_year()
    }
}

pub const INDICATORS: &[IndicatorSpec] = &[
    IndicatorSpec {
        slug: "gdp-per-capita",
        name: "GDP per capita (current US$)",
        database_id: "WB_WDI",
        indicator_code: "WB_WDI_NY_GDP_PCAP_CD",
        default_from: HISTORY_START,
        tracks_units: false,
    },
    IndicatorSpec {
        slug: "credit-card-usage",
        name: "Credit card usage",
        database_id: "IMF_FAS",
        indicator_code: "IMF_FAS_FCCCC",
        default_from: HISTORY_START,
        tracks_units: true,
    },
    IndicatorSpec {
        slug: "inflation",
        name: "Inflation, consumer prices (annual %)",
        database_id: "WB_WDI",
        indicator_code: "WB_WDI_FP_CPI_TOTL_ZG",
        default_from: HISTORY_START,
        tracks_units: false,
    },
    IndicatorSpec {
        slug: "cpi",
        name: "Consumer price index (2010 = 100)",
        database_id: "WB_WDI",
        indicator_code: "WB_WDI_FP_CPI_TOTL",
        default_from: HISTORY_START,
        tracks_units: false,
    },
    IndicatorSpec {
        slug: "mobile-internet-banking",
        name: "Mobile and internet banking transactions",
        database_id: "IMF_FAS",
        indicator_code: "IMF_FAS_FCMIBT",
        default_from: HISTORY_START,
        tracks_units: true,
    },
];

/// Look up an indicator by its route slug (case-sensitive, as routed).
pub fn find(slug: &str) -> Option<&'static IndicatorSpec> {
    INDICATORS.iter().find(|i| i.slug == slug)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
}

pub const ASEAN_COUNTRIES: &[Country] = &[
    Country { code: "BRN", name: "Brunei" },
    Country { code: "KHM", name: "Cambodia" },
    Country { code: "IDN", name: "Indonesia" },
    Country { code: "LAO", name: "Laos" },
    Country { code: "MYS", name: "Malaysia" },
    Country { code: "MMR", name: "Myanmar" },
    Country { code: "PHL", name: "Philippines" },
    Country { code: "SGP", name: "Singapore" },
    Country { code: "THA", name: "Thailand" },
    Country { code: "VNM", name: "Vietnam" },
];

/// Display name for an ASEAN ISO3 code (case-insensitive).
pub fn country_name(code: &str) -> Option<&'static str> {
    ASEAN_COUNTRIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
        .map(|c| c.name)
}

fn current_year() -> i32 {
    Utc::now().year()
}
