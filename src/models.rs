use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Upstream field carrying the observation period (a year for annual series).
pub const TIME_PERIOD: &str = "TIME_PERIOD";
/// Upstream field carrying the observed value.
pub const OBS_VALUE: &str = "OBS_VALUE";
/// Upstream field carrying the unit dimension (only some datasets have one).
pub const UNIT_MEASURE: &str = "UNIT_MEASURE";

/// A year exactly as the upstream sent it.
///
/// Data360 usually encodes `TIME_PERIOD` as a string (`"2019"`), but numbers
/// show up too. The original representation is kept so the proxy echoes what
/// it received; ordering goes through [`Year::as_int`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(Number),
    Text(String),
}

impl Year {
    /// Accept a JSON string or number; anything else is not a usable period.
    pub fn from_json(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(Year::Text(s.clone())),
            Value::Number(n) => Some(Year::Number(n.clone())),
            _ => None,
        }
    }

    /// Integer interpretation of the year, `parseInt`-style: optional leading
    /// whitespace and sign, then the leading run of digits (`"2000-Q1"` -> 2000).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Year::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Year::Text(s) => parse_int_prefix(s),
        }
    }

    /// Re-express as a JSON value (used when re-wrapping records as raw observations).
    pub fn to_json(&self) -> Value {
        match self {
            Year::Number(n) => Value::Number(n.clone()),
            Year::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{n}"),
            Year::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Year {
    fn from(s: &str) -> Self {
        Year::Text(s.to_string())
    }
}

impl From<i64> for Year {
    fn from(y: i64) -> Self {
        Year::Number(Number::from(y))
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let n = digits.parse::<i64>().ok()?;
    Some(if neg { -n } else { n })
}

/// Cleaned observation handed to the dashboard (one row = one year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub year: Year,
    /// Always finite; observations without a usable value never become records.
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl NormalizedRecord {
    /// Back to the upstream field names, so a normalized series can be wrapped
    /// in an envelope and fed through the normalizer again.
    pub fn to_raw(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(TIME_PERIOD.into(), self.year.to_json());
        obj.insert(
            OBS_VALUE.into(),
            Number::from_f64(self.value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
        if let Some(unit) = &self.unit {
            obj.insert(UNIT_MEASURE.into(), Value::String(unit.clone()));
        }
        Value::Object(obj)
    }
}

/// One point of a fitted trend line, aligned to a record's x value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub x: Year,
    pub y: f64,
}
