use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use super::catalog::{MetricProfile, CATALOG};
use super::error::MetricResult;
use super::filter::{apply_filter_with_epsilon, FilterSpec};
use super::model::{MetricSeries, SummaryStat};

// ---------------------------------------------------------------------------
// MetricDataset – every catalog metric for one generation setting
// ---------------------------------------------------------------------------

/// One generated series per catalog metric, in chart order.
#[derive(Debug, Clone)]
pub struct MetricDataset {
    pub entries: Vec<(&'static MetricProfile, Arc<MetricSeries>)>,
    /// For each metric key the sorted set of category labels it uses.
    pub categories: BTreeMap<String, BTreeSet<String>>,
}

/// A metric after filtering, ready to chart.
#[derive(Debug, Clone)]
pub struct FilteredMetric {
    pub profile: &'static MetricProfile,
    pub series: MetricSeries,
    pub summary: SummaryStat,
}

impl MetricDataset {
    /// Generate (or fetch from cache) the whole catalog.
    ///
    /// Each metric is seeded with its catalog seed plus `seed_offset`, so one
    /// number reshuffles every chart.
    pub fn generate(seed_offset: u64, length: usize, start: NaiveDate) -> MetricResult<Self> {
        let entries = CATALOG
            .iter()
            .map(|profile| {
                let seed = profile.default_seed.wrapping_add(seed_offset);
                super::get_metric(profile.key, seed, length, start).map(|s| (profile, s))
            })
            .collect::<MetricResult<Vec<_>>>()?;

        let categories = entries
            .iter()
            .map(|(profile, series)| (profile.key.to_string(), series.categories()))
            .collect();

        log::info!(
            "Dataset ready: {} metrics × {length} days from {start} (seed offset {seed_offset})",
            entries.len()
        );
        Ok(MetricDataset {
            entries,
            categories,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<MetricSeries>> {
        self.entries
            .iter()
            .find(|(profile, _)| profile.key == key)
            .map(|(_, series)| series)
    }

    /// Filter every metric. Metrics without an entry in `specs` pass through.
    pub fn filter_all(
        &self,
        specs: &BTreeMap<String, FilterSpec>,
        epsilon: f64,
    ) -> MetricResult<Vec<FilteredMetric>> {
        let identity = FilterSpec::default();
        self.entries
            .iter()
            .map(|(profile, series)| {
                let spec = specs.get(profile.key).unwrap_or(&identity);
                let (series, summary) = apply_filter_with_epsilon(series, spec, epsilon)?;
                Ok(FilteredMetric {
                    profile: *profile,
                    series,
                    summary,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::TREND_EPSILON;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn covers_whole_catalog() {
        let ds = MetricDataset::generate(0, 20, start()).unwrap();
        assert_eq!(ds.len(), CATALOG.len());
        assert_eq!(ds.get("revenue").unwrap().seed, 1);
        assert!(ds.categories["profit_margin"].is_empty());
        assert!(!ds.categories["sales"].is_empty());
    }

    #[test]
    fn seed_offset_shifts_every_seed() {
        let ds = MetricDataset::generate(10, 5, start()).unwrap();
        assert_eq!(ds.get("market_share").unwrap().seed, 18);
    }

    #[test]
    fn filter_all_applies_only_listed_specs() {
        let ds = MetricDataset::generate(0, 30, start()).unwrap();
        let mut specs = BTreeMap::new();
        specs.insert(
            "revenue".to_string(),
            FilterSpec::new().with_value_range(-1.0, -1.0).unwrap(),
        );
        let out = ds.filter_all(&specs, TREND_EPSILON).unwrap();
        for metric in &out {
            if metric.profile.key == "revenue" {
                assert!(metric.series.is_empty());
            } else {
                assert_eq!(metric.series.len(), 30);
            }
        }
    }
}
