use crate::models::{NormalizedRecord, Year};
use serde::{Deserialize, Serialize};

/// Summary statistics for one normalized series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub first_year: Year,
    pub last_year: Year,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Compute min/max/mean/median over a series; `None` when it is empty.
///
/// `first_year`/`last_year` follow the series order, which is ascending for
/// normalizer output.
pub fn summary(records: &[NormalizedRecord]) -> Option<Summary> {
    let first_year = records.first()?.year.clone();
    let last_year = records.last()?.year.clone();

    let mut vals: Vec<f64> = records.iter().map(|r| r.value).collect();
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let median = if count % 2 == 1 {
        vals[count / 2]
    } else {
        (vals[count / 2 - 1] + vals[count / 2]) / 2.0
    };
    Some(Summary {
        count,
        first_year,
        last_year,
        min: vals[0],
        max: vals[count - 1],
        mean: vals.iter().sum::<f64>() / count as f64,
        median,
    })
}
