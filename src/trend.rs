//! Least-squares trend line over a normalized series.
//!
//! The fit runs against the numeric year when every record has one, and
//! against ordinal position (0, 1, 2, ...) otherwise. It is stored around the
//! x-mean, so predictions near the data stay accurate even though the years
//! sit around 2000.

use crate::models::{NormalizedRecord, TrendPoint};

/// What the x-axis of the fit is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abscissa {
    Year,
    Ordinal,
}

/// Fitted line `y = y_mean + slope * (x - x_mean)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub x_mean: f64,
    pub y_mean: f64,
}

impl LinearFit {
    /// Ordinary least squares. `None` for fewer than two points or when every
    /// x is the same (the slope is undefined).
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;
        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
            let dx = x - x_mean;
            (sxx + dx * dx, sxy + dx * (y - y_mean))
        });
        if sxx == 0.0 || !sxx.is_finite() || !sxy.is_finite() {
            return None;
        }
        Some(Self {
            slope: sxy / sxx,
            x_mean,
            y_mean,
        })
    }

    pub fn intercept(&self) -> f64 {
        self.y_mean - self.slope * self.x_mean
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.y_mean + self.slope * (x - self.x_mean)
    }
}

impl Abscissa {
    /// Axis a series is fitted against: years if every record has one.
    pub fn of(records: &[NormalizedRecord]) -> Self {
        if records.iter().all(|r| r.year.as_int().is_some()) {
            Abscissa::Year
        } else {
            Abscissa::Ordinal
        }
    }

    /// x coordinate of the record at position `idx`.
    pub fn x(&self, idx: usize, record: &NormalizedRecord) -> f64 {
        match self {
            Abscissa::Year => record.year.as_int().map_or(idx as f64, |y| y as f64),
            Abscissa::Ordinal => idx as f64,
        }
    }
}

/// Fit a line to `records`, returning the fit and the axis it used.
pub fn fit_series(records: &[NormalizedRecord]) -> Option<(Abscissa, LinearFit)> {
    let axis = Abscissa::of(records);
    let points: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (axis.x(i, r), r.value))
        .collect();
    LinearFit::fit(&points).map(|fit| (axis, fit))
}

/// One predicted point per record, aligned to the record's year.
///
/// `None` means no overlay should be drawn at all; a series with a single
/// point never gets a degenerate line.
pub fn trend_line(records: &[NormalizedRecord]) -> Option<Vec<TrendPoint>> {
    let (axis, fit) = fit_series(records)?;
    Some(
        records
            .iter()
            .enumerate()
            .map(|(i, r)| TrendPoint {
                x: r.year.clone(),
                y: fit.predict(axis.x(i, r)),
            })
            .collect(),
    )
}
