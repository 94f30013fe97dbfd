use super::model::{MetricSeries, SummaryStat, Trend};

/// Percent change that still counts as flat.
pub const TREND_EPSILON: f64 = 0.5;

/// Classify a percent change.
pub fn classify_trend(percent_change: f64, epsilon: f64) -> Trend {
    if percent_change > epsilon {
        Trend::Up
    } else if percent_change < -epsilon {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// Aggregate a series. Empty input gives [`SummaryStat::empty`].
pub fn summarize(series: &MetricSeries, epsilon: f64) -> SummaryStat {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return SummaryStat::empty();
    };

    let count = series.len();
    let total: f64 = series.points.iter().map(|p| p.value).sum();
    let mean = total / count as f64;

    let percent_change = if count >= 2 && first.value != 0.0 {
        (last.value - first.value) / first.value * 100.0
    } else {
        0.0
    };

    let (min, max) = series
        .value_span()
        .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));

    SummaryStat {
        count,
        total,
        mean,
        percent_change,
        trend: classify_trend(percent_change, epsilon),
        min,
        max,
        first: Some(first.value),
        latest: Some(last.value),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::MetricPoint;

    fn series(values: &[f64]) -> MetricSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        MetricSeries {
            name: "revenue".into(),
            unit: "$M".into(),
            seed: 0,
            points: start
                .iter_days()
                .zip(values)
                .map(|(date, &value)| MetricPoint {
                    date,
                    value,
                    category: None,
                })
                .collect(),
        }
    }

    #[test]
    fn totals_mean_and_change() {
        let stat = summarize(&series(&[100.0, 50.0, 150.0]), TREND_EPSILON);
        assert_eq!(stat.count, 3);
        assert_eq!(stat.total, 300.0);
        assert_eq!(stat.mean, 100.0);
        assert_eq!(stat.percent_change, 50.0);
        assert_eq!(stat.trend, Trend::Up);
        assert_eq!(stat.min, Some(50.0));
        assert_eq!(stat.max, Some(150.0));
        assert_eq!(stat.latest, Some(150.0));
    }

    #[test]
    fn falling_series_trends_down() {
        let stat = summarize(&series(&[200.0, 100.0]), TREND_EPSILON);
        assert_eq!(stat.percent_change, -50.0);
        assert_eq!(stat.trend, Trend::Down);
    }

    #[test]
    fn small_change_is_flat() {
        let stat = summarize(&series(&[100.0, 100.4]), TREND_EPSILON);
        assert_eq!(stat.trend, Trend::Flat);
    }

    #[test]
    fn single_point_and_zero_start_have_no_change() {
        let one = summarize(&series(&[42.0]), TREND_EPSILON);
        assert_eq!(one.percent_change, 0.0);
        assert_eq!(one.mean, 42.0);

        let zero = summarize(&series(&[0.0, 10.0]), TREND_EPSILON);
        assert_eq!(zero.percent_change, 0.0);
        assert_eq!(zero.trend, Trend::Flat);
    }

    #[test]
    fn empty_series_is_all_zero() {
        assert_eq!(summarize(&series(&[]), TREND_EPSILON), SummaryStat::empty());
    }
}
