use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::catalog::{KpiCard, KPI_CARDS};
use crate::data::dataset::{FilteredMetric, MetricDataset};
use crate::data::filter::FilterSpec;
use crate::data::model::ValueRange;
use crate::data::MetricResult;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Generated catalog (None if generation failed).
    pub dataset: Option<MetricDataset>,

    /// Filtered metrics as last applied (cached).
    pub visible: Vec<FilteredMetric>,

    /// Whether the date range below is applied.
    pub date_filter_enabled: bool,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,

    /// Per-metric category selections. Metrics without labels have no entry.
    pub category_filters: BTreeMap<String, BTreeSet<String>>,

    /// Per-metric value bounds.
    pub value_filters: BTreeMap<String, ValueRange>,

    /// Metric the value-range editor currently targets.
    pub value_metric: String,
    pub value_draft: ValueRange,

    /// Category colours per metric.
    pub color_maps: BTreeMap<String, ColorMap>,

    /// Seed offset being edited in the top bar, committed on release.
    pub seed_draft: u64,

    /// Filter widgets changed since the last Apply.
    pub dirty: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build state for `config` and generate the dataset right away.
    pub fn new(config: DashboardConfig) -> Self {
        let start = config.start_date;
        let config_seed = config.seed_offset;
        let mut state = Self {
            config,
            dataset: None,
            visible: Vec::new(),
            date_filter_enabled: false,
            date_start: start,
            date_end: start,
            category_filters: BTreeMap::new(),
            value_filters: BTreeMap::new(),
            value_metric: String::new(),
            value_draft: ValueRange::new(0.0, 0.0),
            color_maps: BTreeMap::new(),
            seed_draft: config_seed,
            dirty: false,
            status_message: None,
        };
        state.regenerate();
        state
    }

    /// (Re)generate every metric from the current config and reset filters.
    pub fn regenerate(&mut self) {
        match MetricDataset::generate(
            self.config.seed_offset,
            self.config.length,
            self.config.start_date,
        ) {
            Ok(dataset) => {
                self.color_maps = dataset
                    .categories
                    .iter()
                    .filter(|(_, labels)| !labels.is_empty())
                    .map(|(key, labels)| (key.clone(), ColorMap::new(key, labels)))
                    .collect();
                self.dataset = Some(dataset);
                self.status_message = None;
                self.reset_filters();
            }
            Err(e) => {
                log::error!("Failed to generate metrics: {e}");
                self.dataset = None;
                self.visible.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Change the seed offset and regenerate.
    pub fn set_seed_offset(&mut self, seed_offset: u64) {
        self.seed_draft = seed_offset;
        if self.config.seed_offset != seed_offset {
            self.config.seed_offset = seed_offset;
            self.regenerate();
        }
    }

    /// Apply the seed typed or dragged in the top bar.
    pub fn commit_seed_draft(&mut self) {
        self.set_seed_offset(self.seed_draft);
    }

    /// Select everything, clear ranges and show the full dataset.
    pub fn reset_filters(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let (start, end) = ds
            .entries
            .first()
            .and_then(|(_, series)| series.date_span())
            .unwrap_or((self.config.start_date, self.config.start_date));
        self.date_filter_enabled = false;
        self.date_start = start;
        self.date_end = end;

        self.category_filters = ds
            .categories
            .iter()
            .filter(|(_, labels)| !labels.is_empty())
            .map(|(key, labels)| (key.clone(), labels.clone()))
            .collect();
        self.value_filters.clear();

        if let Some((profile, _)) = ds.entries.first() {
            self.value_metric = profile.key.to_string();
        }
        self.value_draft = self.full_value_range(&self.value_metric);
        self.refilter();
    }

    /// Observed value span of a metric, or `0..0` when unknown.
    pub fn full_value_range(&self, key: &str) -> ValueRange {
        self.dataset
            .as_ref()
            .and_then(|ds| ds.get(key))
            .and_then(|series| series.value_span())
            .map(|(lo, hi)| ValueRange::new(lo, hi))
            .unwrap_or(ValueRange::new(0.0, 0.0))
    }

    /// Build one spec per metric from the widget state.
    ///
    /// A category selection equal to all labels of the metric adds no
    /// constraint.
    pub fn build_specs(&self) -> MetricResult<BTreeMap<String, FilterSpec>> {
        let Some(ds) = &self.dataset else {
            return Ok(BTreeMap::new());
        };
        let mut specs = BTreeMap::new();
        for (profile, _) in &ds.entries {
            let key = profile.key;
            let mut spec = FilterSpec::new();
            if self.date_filter_enabled {
                spec = spec.with_date_range(self.date_start, self.date_end)?;
            }
            if let (Some(selected), Some(all)) =
                (self.category_filters.get(key), ds.categories.get(key))
            {
                if selected.len() != all.len() {
                    spec = spec.with_categories(selected.iter().cloned());
                }
            }
            if let Some(range) = self.value_filters.get(key) {
                spec = spec.with_value_range(range.min, range.max)?;
            }
            if !spec.is_identity() {
                specs.insert(key.to_string(), spec);
            }
        }
        Ok(specs)
    }

    /// Recompute `visible` from the filter widgets.
    ///
    /// An invalid filter leaves the previous view in place and is reported
    /// through `status_message`.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let result = self
            .build_specs()
            .and_then(|specs| ds.filter_all(&specs, self.config.trend_epsilon));
        match result {
            Ok(visible) => {
                self.visible = visible;
                self.status_message = None;
                self.dirty = false;
            }
            Err(e) => {
                log::warn!("Filter rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle a single category label of a metric.
    pub fn toggle_category(&mut self, metric: &str, label: &str) {
        let selected = self.category_filters.entry(metric.to_string()).or_default();
        if !selected.remove(label) {
            selected.insert(label.to_string());
        }
        self.dirty = true;
    }

    /// Select all labels of a metric.
    pub fn select_all(&mut self, metric: &str) {
        if let Some(all) = self.dataset.as_ref().and_then(|ds| ds.categories.get(metric)) {
            self.category_filters.insert(metric.to_string(), all.clone());
            self.dirty = true;
        }
    }

    /// Deselect all labels of a metric.
    pub fn select_none(&mut self, metric: &str) {
        self.category_filters
            .insert(metric.to_string(), BTreeSet::new());
        self.dirty = true;
    }

    /// Point the value-range editor at another metric.
    pub fn set_value_metric(&mut self, key: &str) {
        self.value_metric = key.to_string();
        self.value_draft = self
            .value_filters
            .get(key)
            .copied()
            .unwrap_or_else(|| self.full_value_range(key));
    }

    /// Store the draft bounds for the selected metric.
    pub fn commit_value_draft(&mut self) {
        self.value_filters
            .insert(self.value_metric.clone(), self.value_draft);
        self.dirty = true;
    }

    pub fn clear_value_filter(&mut self, key: &str) {
        if self.value_filters.remove(key).is_some() {
            self.dirty = true;
        }
        if self.value_metric == key {
            self.value_draft = self.full_value_range(key);
        }
    }

    /// "Active filter" tags, prefixed with the chart title where the filter
    /// only applies to one metric.
    pub fn active_filter_tags(&self) -> Vec<(String, String)> {
        let Ok(specs) = self.build_specs() else {
            return Vec::new();
        };
        let mut tags = Vec::new();
        let mut date_shown = false;
        for metric in &self.visible {
            let Some(spec) = specs.get(metric.profile.key) else {
                continue;
            };
            for (label, value) in spec.describe() {
                if label == "Date" {
                    if !date_shown {
                        tags.push((label, value));
                        date_shown = true;
                    }
                } else {
                    tags.push((format!("{} {label}", metric.profile.title), value));
                }
            }
        }
        tags
    }

    /// Filtered summary behind each KPI card, in card order.
    pub fn kpi_summaries(&self) -> Vec<(&'static KpiCard, Option<&FilteredMetric>)> {
        KPI_CARDS
            .iter()
            .map(|card| {
                let metric = self.visible.iter().find(|m| m.profile.key == card.metric);
                (card, metric)
            })
            .collect()
    }

    /// Points across all visible charts.
    pub fn visible_point_count(&self) -> usize {
        self.visible.iter().map(|m| m.series.len()).sum()
    }

    pub fn total_point_count(&self) -> usize {
        self.dataset
            .as_ref()
            .map(|ds| ds.entries.iter().map(|(_, s)| s.len()).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::CATALOG;
    use crate::data::model::SummaryStat;

    fn summary<'a>(s: &'a AppState, key: &str) -> &'a SummaryStat {
        s.visible
            .iter()
            .find(|m| m.profile.key == key)
            .map(|m| &m.summary)
            .unwrap()
    }

    fn state() -> AppState {
        AppState::new(DashboardConfig {
            length: 40,
            ..DashboardConfig::default()
        })
    }

    #[test]
    fn starts_unfiltered() {
        let s = state();
        assert_eq!(s.visible.len(), CATALOG.len());
        assert_eq!(s.visible_point_count(), s.total_point_count());
        assert!(s.build_specs().unwrap().is_empty());
        assert!(s.active_filter_tags().is_empty());
    }

    #[test]
    fn seed_draft_waits_for_commit() {
        let mut s = state();
        let before = s.visible[0].series.clone();
        s.seed_draft = 17;
        assert_eq!(s.config.seed_offset, 0);
        assert_eq!(s.visible[0].series, before);

        s.commit_seed_draft();
        assert_eq!(s.config.seed_offset, 17);
        assert_eq!(s.visible[0].series.seed, before.seed + 17);
    }

    #[test]
    fn inverted_dates_keep_previous_view() {
        let mut s = state();
        s.date_filter_enabled = true;
        s.date_start = s.config.start_date + chrono::Days::new(10);
        s.date_end = s.config.start_date;
        s.refilter();
        assert!(s.status_message.as_deref().unwrap().contains("invalid filter"));
        assert_eq!(s.visible_point_count(), s.total_point_count());
    }

    #[test]
    fn date_window_narrows_every_chart() {
        let mut s = state();
        s.date_filter_enabled = true;
        s.date_start = s.config.start_date;
        s.date_end = s.config.start_date + chrono::Days::new(9);
        s.refilter();
        assert!(s.visible.iter().all(|m| m.series.len() == 10));
        assert_eq!(s.active_filter_tags().len(), 1);
    }

    #[test]
    fn deselecting_all_categories_empties_that_chart_only() {
        let mut s = state();
        s.select_none("sales");
        assert!(s.dirty);
        s.refilter();
        let sales = s.visible.iter().find(|m| m.profile.key == "sales").unwrap();
        assert!(sales.series.is_empty());
        assert_eq!(summary(&s, "sales").trend, crate::data::Trend::Flat);
        let revenue = s.visible.iter().find(|m| m.profile.key == "revenue").unwrap();
        assert_eq!(revenue.series.len(), 40);
    }

    #[test]
    fn value_filter_applies_to_selected_metric() {
        let mut s = state();
        s.set_value_metric("profit_margin");
        s.value_draft = ValueRange::new(1000.0, 2000.0);
        s.commit_value_draft();
        s.refilter();
        assert!(summary(&s, "profit_margin").count == 0);
        assert_eq!(summary(&s, "revenue").count, 40);

        s.clear_value_filter("profit_margin");
        s.refilter();
        assert_eq!(summary(&s, "profit_margin").count, 40);
    }

    #[test]
    fn reset_restores_everything() {
        let mut s = state();
        s.select_none("sales");
        s.date_filter_enabled = true;
        s.refilter();
        s.reset_filters();
        assert_eq!(s.visible_point_count(), s.total_point_count());
        assert!(!s.dirty);
    }

    #[test]
    fn kpi_cards_resolve() {
        let s = state();
        assert!(s.kpi_summaries().iter().all(|(_, m)| m.is_some()));
    }
}
