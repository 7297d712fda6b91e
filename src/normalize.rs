//! Record normalizer: raw Data360 payload -> sorted `NormalizedRecord`s.
//!
//! The upstream envelope is not stable. Depending on the dataset and API
//! vintage the observations arrive under `data`, under `value`, or as the
//! top-level array. [`Envelope::probe`] checks those shapes in that order.
//! The `value` branch only checks that the key exists; whether it holds an
//! array is decided later, when the observations are read.

use crate::models::{NormalizedRecord, OBS_VALUE, TIME_PERIOD, UNIT_MEASURE, Year};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("observation envelope `value` holds {found}, not an array")]
    NotAnArray { found: &'static str },
}

/// Where the observation array sits inside a payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    /// `{"data": [...]}`
    Data(&'a [Value]),
    /// `{"value": ...}`, accepted on key presence alone.
    Value(&'a Value),
    /// `[...]`
    TopLevel(&'a [Value]),
    /// None of the above: zero observations, not an error.
    Unrecognized,
}

impl<'a> Envelope<'a> {
    pub fn probe(payload: &'a Value) -> Self {
        if let Some(arr) = payload.get("data").and_then(Value::as_array) {
            Envelope::Data(arr)
        } else if let Some(v) = payload.get("value") {
            Envelope::Value(v)
        } else if let Some(arr) = payload.as_array() {
            Envelope::TopLevel(arr)
        } else {
            Envelope::Unrecognized
        }
    }

    pub fn observations(&self) -> Result<&'a [Value], NormalizeError> {
        match *self {
            Envelope::Data(arr) | Envelope::TopLevel(arr) => Ok(arr),
            Envelope::Value(v) => v
                .as_array()
                .map(Vec::as_slice)
                .ok_or(NormalizeError::NotAnArray {
                    found: json_kind(v),
                }),
            Envelope::Unrecognized => Ok(&[]),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Finite numeric reading of `OBS_VALUE`; numbers and numeric strings qualify.
pub fn parse_obs_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn unit_of(obs: &Value) -> Option<String> {
    match obs.get(UNIT_MEASURE)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Turn one raw observation into a record, or `None` if it is unusable.
pub fn normalize_observation(obs: &Value, track_units: bool) -> Option<NormalizedRecord> {
    let value = parse_obs_value(obs.get(OBS_VALUE)?)?;
    let year = Year::from_json(obs.get(TIME_PERIOD)?)?;
    let unit = if track_units { unit_of(obs) } else { None };
    Some(NormalizedRecord { year, value, unit })
}

/// Locate, clean and order the observations in `payload`.
///
/// Unusable observations are dropped silently. Output is sorted ascending by
/// the integer year; years with no integer reading go last. The sort is
/// stable, so ties keep their upstream order.
pub fn normalize(
    payload: &Value,
    track_units: bool,
) -> Result<Vec<NormalizedRecord>, NormalizeError> {
    let raw = Envelope::probe(payload).observations()?;
    let mut records: Vec<NormalizedRecord> = raw
        .iter()
        .filter_map(|obs| normalize_observation(obs, track_units))
        .collect();
    let dropped = raw.len() - records.len();
    if dropped > 0 {
        log::debug!("dropped {dropped} of {} observations", raw.len());
    }
    records.sort_by_key(|r| match r.year.as_int() {
        Some(y) => (false, y),
        None => (true, 0),
    });
    Ok(records)
}

/// Wrap records back into a `{"data": [...]}` envelope of raw observations.
pub fn rewrap(records: &[NormalizedRecord]) -> Value {
    let data: Vec<Value> = records.iter().map(NormalizedRecord::to_raw).collect();
    serde_json::json!({ "data": data })
}
