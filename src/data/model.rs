use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MetricPoint – one observation of a metric
// ---------------------------------------------------------------------------

/// A single daily observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Category label (region, channel, …). `None` for uncategorised metrics.
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// MetricSeries – an immutable named time series
// ---------------------------------------------------------------------------

/// An ordered daily time series for one named business metric.
///
/// Dates are strictly increasing. Filtering never mutates a series; it always
/// derives a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    /// Catalog key, e.g. `"revenue"`.
    pub name: String,
    /// Display unit, e.g. `"$M"` or `"%"`.
    pub unit: String,
    /// Seed the series was generated from.
    pub seed: u64,
    pub points: Vec<MetricPoint>,
}

impl MetricSeries {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&MetricPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&MetricPoint> {
        self.points.last()
    }

    /// A series with the same identity but a different set of points.
    pub fn with_points(&self, points: Vec<MetricPoint>) -> Self {
        MetricSeries {
            name: self.name.clone(),
            unit: self.unit.clone(),
            seed: self.seed,
            points,
        }
    }

    /// Sorted set of the category labels present in the series.
    pub fn categories(&self) -> BTreeSet<String> {
        self.points
            .iter()
            .filter_map(|p| p.category.clone())
            .collect()
    }

    /// First and last date, if any.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }

    /// Smallest and largest value, if any.
    pub fn value_span(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|p| p.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

// ---------------------------------------------------------------------------
// Inclusive ranges used by FilterSpec
// ---------------------------------------------------------------------------

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} – {}",
            self.start.format("%b %d, %Y"),
            self.end.format("%b %d, %Y")
        )
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        ValueRange { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// NaN bounds count as inverted: no value could ever satisfy them.
    pub fn is_inverted(&self) -> bool {
        self.min.is_nan() || self.max.is_nan() || self.min > self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} – {:.2}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Trend / SummaryStat
// ---------------------------------------------------------------------------

/// Direction of a series, decided by percent change against an epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↗",
            Trend::Down => "↘",
            Trend::Flat => "→",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Flat => write!(f, "flat"),
        }
    }
}

/// Aggregates over a (possibly filtered) series, as shown on KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub percent_change: f64,
    pub trend: Trend,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub first: Option<f64>,
    pub latest: Option<f64>,
}

impl SummaryStat {
    /// Summary of a series with no points.
    pub fn empty() -> Self {
        SummaryStat {
            count: 0,
            total: 0.0,
            mean: 0.0,
            percent_change: 0.0,
            trend: Trend::Flat,
            min: None,
            max: None,
            first: None,
            latest: None,
        }
    }
}
