//! Chart configuration handed to the dashboard's line-chart component.
//!
//! Two shapes are understood by the renderer:
//! - single series: `{ data: [{x, y}], label, color?, regressionLine?: {data, label?, color?} }`
//! - multiple series: `{ data: [{label, data: [{x, y}], color}], multi: true }`
//!
//! The trend overlay is attached only when a fit exists and spans more than one
//! point. Styling helpers mirror what the renderer applies: dense year axes
//! are thinned, values print en-US with two decimals, and fills are the line
//! color at 10% opacity.

use crate::models::{NormalizedRecord, TrendPoint, Year};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "rgb(59, 130, 246)";
pub const DEFAULT_TREND_COLOR: &str = "rgba(59,130,246,0.5)";
pub const DEFAULT_TREND_LABEL: &str = "Regression Line";

/// Series colors for multi-series charts (Microsoft Office 2013+ palette).
pub const PALETTE: [&str; 10] = [
    "rgb(68, 114, 196)",
    "rgb(237, 125, 49)",
    "rgb(165, 165, 165)",
    "rgb(255, 192, 0)",
    "rgb(91, 155, 213)",
    "rgb(112, 173, 71)",
    "rgb(38, 68, 120)",
    "rgb(158, 72, 14)",
    "rgb(99, 99, 99)",
    "rgb(153, 115, 0)",
];

#[inline]
pub fn palette_color(idx: usize) -> &'static str {
    PALETTE[idx % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: Year,
    pub y: f64,
}

impl From<&NormalizedRecord> for ChartPoint {
    fn from(r: &NormalizedRecord) -> Self {
        Self {
            x: r.year.clone(),
            y: r.value,
        }
    }
}

impl From<TrendPoint> for ChartPoint {
    fn from(p: TrendPoint) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionOverlay {
    pub data: Vec<ChartPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleSeriesChart {
    pub data: Vec<ChartPoint>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regression_line: Option<RegressionOverlay>,
}

impl SingleSeriesChart {
    pub fn from_records(label: impl Into<String>, records: &[NormalizedRecord]) -> Self {
        Self {
            data: records.iter().map(ChartPoint::from).collect(),
            label: label.into(),
            color: None,
            regression_line: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Attach a trend overlay; `None` or a one-point line leaves the chart bare.
    pub fn with_trend(mut self, trend: Option<Vec<TrendPoint>>) -> Self {
        self.regression_line = trend.filter(|t| t.len() > 1).map(|t| RegressionOverlay {
            data: t.into_iter().map(ChartPoint::from).collect(),
            label: Some(DEFAULT_TREND_LABEL.to_string()),
            color: Some(DEFAULT_TREND_COLOR.to_string()),
        });
        self
    }

    pub fn stroke_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Axis labels with dense year axes thinned out.
    pub fn x_labels(&self) -> Vec<String> {
        let n = self.data.len();
        self.data.iter().map(|p| thin_year_label(&p.x, n)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    pub label: String,
    pub data: Vec<ChartPoint>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesChart {
    pub data: Vec<LabeledSeries>,
    pub multi: bool,
}

impl MultiSeriesChart {
    /// Build from `(label, records)` pairs, coloring series from [`PALETTE`].
    /// Empty series are left out; they have nothing to draw.
    pub fn from_series<I, S>(series: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<NormalizedRecord>)>,
        S: Into<String>,
    {
        let data = series
            .into_iter()
            .filter(|(_, records)| !records.is_empty())
            .enumerate()
            .map(|(idx, (label, records))| LabeledSeries {
                label: label.into(),
                data: records.iter().map(ChartPoint::from).collect(),
                color: palette_color(idx).to_string(),
            })
            .collect();
        Self { data, multi: true }
    }

    /// The renderer labels the shared x axis from the first series.
    pub fn x_labels(&self) -> Vec<String> {
        let Some(first) = self.data.first() else {
            return Vec::new();
        };
        let n = first.data.len();
        first.data.iter().map(|p| thin_year_label(&p.x, n)).collect()
    }
}

/// Either chart shape, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartConfig {
    Multi(MultiSeriesChart),
    Single(SingleSeriesChart),
}

/// Tick label for a year on an axis with `len` points.
///
/// Only four-digit numeric text labels are thinned: above 30 points every
/// tenth year is kept, above 15 every fifth. Everything else is shown as-is;
/// an empty string hides the tick.
pub fn thin_year_label(x: &Year, len: usize) -> String {
    let label = x.to_string();
    let Year::Text(s) = x else {
        return label;
    };
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return label;
    }
    let year = x.as_int().unwrap_or(0);
    let step = if len > 30 {
        10
    } else if len > 15 {
        5
    } else {
        return label;
    };
    if year % step == 0 { label } else { String::new() }
}

/// en-US number with thousands separators and exactly two decimals.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int_part.to_string());
    let sign = if v < 0.0 && fixed.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac}")
}

/// `rgb(r, g, b)` -> `rgba(r, g, b, 0.1)`; other color syntaxes pass through.
pub fn translucent_fill(color: &str) -> String {
    match color.strip_prefix("rgb(") {
        Some(rest) => format!("rgba({}", rest.replacen(')', ", 0.1)", 1)),
        None => color.to_string(),
    }
}
