use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::error::{MetricError, MetricResult};
use super::model::{DateRange, MetricPoint, MetricSeries, SummaryStat, ValueRange};
use super::summary::summarize;

// ---------------------------------------------------------------------------
// FilterSpec – which points of a series are visible
// ---------------------------------------------------------------------------

/// Immutable narrowing request. Every unset field means "no constraint", so
/// `FilterSpec::default()` is the identity filter.
///
/// The `with_*` constructors reject inverted ranges, so a spec built through
/// them is always valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    date_range: Option<DateRange>,
    /// Allowed category labels. An empty set allows nothing.
    categories: Option<BTreeSet<String>>,
    value_range: Option<ValueRange>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> MetricResult<Self> {
        let range = DateRange::new(start, end);
        check_date_range(&range)?;
        self.date_range = Some(range);
        Ok(self)
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_value_range(mut self, min: f64, max: f64) -> MetricResult<Self> {
        let range = ValueRange::new(min, max);
        check_value_range(&range)?;
        self.value_range = Some(range);
        Ok(self)
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn categories(&self) -> Option<&BTreeSet<String>> {
        self.categories.as_ref()
    }

    pub fn value_range(&self) -> Option<&ValueRange> {
        self.value_range.as_ref()
    }

    /// Whether no field is set.
    pub fn is_identity(&self) -> bool {
        self.date_range.is_none() && self.categories.is_none() && self.value_range.is_none()
    }

    /// Re-check the range invariants.
    pub fn validate(&self) -> MetricResult<()> {
        if let Some(range) = &self.date_range {
            check_date_range(range)?;
        }
        if let Some(range) = &self.value_range {
            check_value_range(range)?;
        }
        Ok(())
    }

    /// Whether a single point passes all three predicates.
    ///
    /// An uncategorised point never passes a category constraint.
    pub fn matches(&self, point: &MetricPoint) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(point.date) {
                return false;
            }
        }
        if let Some(allowed) = &self.categories {
            match &point.category {
                Some(label) if allowed.contains(label) => {}
                _ => return false,
            }
        }
        if let Some(range) = &self.value_range {
            if !range.contains(point.value) {
                return false;
            }
        }
        true
    }

    /// Label / value pairs for the "active filters" strip.
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut tags = Vec::new();
        if let Some(range) = &self.date_range {
            tags.push(("Date".to_string(), range.to_string()));
        }
        if let Some(allowed) = &self.categories {
            let text = if allowed.is_empty() {
                "none".to_string()
            } else {
                allowed.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            tags.push(("Category".to_string(), text));
        }
        if let Some(range) = &self.value_range {
            tags.push(("Value".to_string(), range.to_string()));
        }
        tags
    }
}

fn check_date_range(range: &DateRange) -> MetricResult<()> {
    if range.is_inverted() {
        return Err(MetricError::InvalidFilterSpec(format!(
            "date range starts {} after it ends {}",
            range.start, range.end
        )));
    }
    Ok(())
}

fn check_value_range(range: &ValueRange) -> MetricResult<()> {
    if range.is_inverted() {
        return Err(MetricError::InvalidFilterSpec(format!(
            "value range minimum {} is above maximum {}",
            range.min, range.max
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Applying a FilterSpec
// ---------------------------------------------------------------------------

/// Return indices of points that pass the spec, in series order.
pub fn filtered_indices(series: &MetricSeries, spec: &FilterSpec) -> Vec<usize> {
    series
        .points
        .iter()
        .enumerate()
        .filter(|(_, p)| spec.matches(p))
        .map(|(i, _)| i)
        .collect()
}

/// Derive the visible sub-series. The input is never modified.
pub fn filter_series(series: &MetricSeries, spec: &FilterSpec) -> MetricResult<MetricSeries> {
    spec.validate()?;
    if spec.is_identity() {
        return Ok(series.clone());
    }
    let points = filtered_indices(series, spec)
        .into_iter()
        .map(|i| series.points[i].clone())
        .collect();
    Ok(series.with_points(points))
}

/// Filter and summarise in one step, with the given trend epsilon.
pub fn apply_filter_with_epsilon(
    series: &MetricSeries,
    spec: &FilterSpec,
    epsilon: f64,
) -> MetricResult<(MetricSeries, SummaryStat)> {
    let filtered = filter_series(series, spec).map_err(|e| {
        log::warn!("Rejected filter for '{}': {e}", series.name);
        e
    })?;
    let summary = summarize(&filtered, epsilon);
    Ok((filtered, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Trend;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    fn series() -> MetricSeries {
        let rows = [
            (1, 10.0, "North"),
            (2, 20.0, "South"),
            (3, 30.0, "North"),
            (4, 40.0, "East"),
            (5, 50.0, "South"),
        ];
        MetricSeries {
            name: "sales".into(),
            unit: "$K".into(),
            seed: 0,
            points: rows
                .iter()
                .map(|&(d, value, cat)| MetricPoint {
                    date: day(d),
                    value,
                    category: Some(cat.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn identity_spec_returns_input() {
        let s = series();
        let out = filter_series(&s, &FilterSpec::new()).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn date_range_is_inclusive() {
        let spec = FilterSpec::new().with_date_range(day(2), day(4)).unwrap();
        assert_eq!(filtered_indices(&series(), &spec), vec![1, 2, 3]);
    }

    #[test]
    fn categories_and_values_combine() {
        let spec = FilterSpec::new()
            .with_categories(["North", "South"])
            .with_value_range(15.0, 50.0)
            .unwrap();
        assert_eq!(filtered_indices(&series(), &spec), vec![1, 2, 4]);
    }

    #[test]
    fn filtered_series_is_built_from_matching_indices() {
        let s = series();
        let spec = FilterSpec::new()
            .with_categories(["North", "South"])
            .with_value_range(15.0, 50.0)
            .unwrap();
        let out = filter_series(&s, &spec).unwrap();
        let expected: Vec<_> = filtered_indices(&s, &spec)
            .into_iter()
            .map(|i| s.points[i].clone())
            .collect();
        assert_eq!(out.points, expected);
    }

    #[test]
    fn empty_category_set_hides_everything() {
        let spec = FilterSpec::new().with_categories(Vec::<String>::new());
        assert!(filter_series(&series(), &spec).unwrap().is_empty());
    }

    #[test]
    fn uncategorised_points_fail_category_filter() {
        let mut s = series();
        s.points[0].category = None;
        let spec = FilterSpec::new().with_categories(["North"]);
        assert_eq!(filtered_indices(&s, &spec), vec![2]);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert!(matches!(
            FilterSpec::new().with_date_range(day(10), day(1)),
            Err(MetricError::InvalidFilterSpec(_))
        ));
        assert!(matches!(
            FilterSpec::new().with_value_range(5.0, 1.0),
            Err(MetricError::InvalidFilterSpec(_))
        ));
        assert!(FilterSpec::new().with_value_range(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn unmatched_filter_gives_flat_empty_summary() {
        let spec = FilterSpec::new().with_value_range(1e12, 1e12).unwrap();
        let (out, stat) = apply_filter_with_epsilon(&series(), &spec, 0.5).unwrap();
        assert!(out.is_empty());
        assert_eq!(stat.total, 0.0);
        assert_eq!(stat.mean, 0.0);
        assert_eq!(stat.percent_change, 0.0);
        assert_eq!(stat.trend, Trend::Flat);
    }

    #[test]
    fn describe_lists_active_fields() {
        let spec = FilterSpec::new()
            .with_date_range(day(1), day(2))
            .unwrap()
            .with_categories(["North"]);
        let tags = spec.describe();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1], ("Category".to_string(), "North".to_string()));
        assert!(FilterSpec::new().describe().is_empty());
    }
}
