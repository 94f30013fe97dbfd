//! Data layer: metric catalog, generation, caching, filtering and summaries.
//!
//! Architecture:
//! ```text
//!   name, seed, length, start
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ catalog   │  name → MetricProfile (trend / season / noise / bound)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐     ┌───────┐
//!   │ generator │ ◄── │ cache │  memo keyed by (name, seed, length, start)
//!   └──────────┘     └───────┘
//!        │  MetricSeries
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSpec → reduced MetricSeries
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ summary   │  total, mean, % change, trend
//!   └──────────┘
//! ```

pub mod cache;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod generator;
pub mod model;
pub mod summary;

use std::sync::Arc;

use chrono::NaiveDate;

pub use error::{MetricError, MetricResult};
pub use filter::FilterSpec;
pub use model::{MetricPoint, MetricSeries, SummaryStat, Trend};

/// Fetch a catalog metric, generating it on first use.
pub fn get_metric(
    name: &str,
    seed: u64,
    length: usize,
    start_date: NaiveDate,
) -> MetricResult<Arc<MetricSeries>> {
    let profile = catalog::lookup(name)?;
    let key = cache::CacheKey {
        name: name.to_string(),
        seed,
        length,
        start: start_date,
    };
    cache::global().get_or_try_insert(key, || {
        generator::generate(profile, seed, length, start_date)
    })
}

/// Narrow a series and summarise what is left, using the default trend epsilon.
pub fn apply_filter(
    series: &MetricSeries,
    spec: &FilterSpec,
) -> MetricResult<(MetricSeries, SummaryStat)> {
    filter::apply_filter_with_epsilon(series, spec, summary::TREND_EPSILON)
}
