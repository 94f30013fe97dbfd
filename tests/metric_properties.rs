use std::sync::Arc;

use chrono::{Days, NaiveDate};
use kpi_board::data::catalog::CATALOG;
use kpi_board::data::generator::parse_start_date;
use kpi_board::data::{apply_filter, get_metric, FilterSpec, MetricError, MetricSeries, Trend};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn date(text: &str) -> NaiveDate {
    parse_start_date(text).unwrap()
}

fn revenue_42() -> Arc<MetricSeries> {
    get_metric("revenue", 42, 10, date("2023-01-01")).unwrap()
}

fn value_bits(series: &MetricSeries) -> Vec<u64> {
    series.points.iter().map(|p| p.value.to_bits()).collect()
}

#[test]
fn revenue_example_has_ten_consecutive_days() {
    let series = revenue_42();
    assert_eq!(series.len(), 10);
    assert_eq!(series.first().unwrap().date, date("2023-01-01"));
    assert_eq!(series.last().unwrap().date, date("2023-01-10"));
    for pair in series.points.windows(2) {
        assert_eq!(pair[0].date + Days::new(1), pair[1].date);
    }
}

/// Reference output of `get_metric("revenue", 42, 10, 2023-01-01)` with rand 0.8 `StdRng`.
/// Any change to the curve parameters, the formula or the draw order shows up here.
const REVENUE_42_REFERENCE: [(usize, f64); 4] = [
    (0, 483.6194488074147),
    (1, 474.97889089545896),
    (2, 523.2117922497765),
    (9, 544.6253167439385),
];

#[test]
fn revenue_example_matches_reference_values() {
    let series = revenue_42();
    for (i, expected) in REVENUE_42_REFERENCE {
        assert_eq!(
            series.points[i].value.to_bits(),
            expected.to_bits(),
            "day {i}: got {}, expected {expected}",
            series.points[i].value
        );
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    for profile in &CATALOG {
        let a = get_metric(profile.key, 7, 60, date("2023-06-01")).unwrap();
        let b = get_metric(profile.key, 7, 60, date("2023-06-01")).unwrap();
        assert_eq!(value_bits(&a), value_bits(&b));
        assert_eq!(a.points, b.points);
    }
}

#[test]
fn cache_does_not_change_the_answer() {
    let profile = kpi_board::data::catalog::lookup("sales").unwrap();
    let fresh = kpi_board::data::generator::generate(profile, 11, 25, date("2023-01-01")).unwrap();
    let cached = get_metric("sales", 11, 25, date("2023-01-01")).unwrap();
    assert_eq!(*cached, fresh);
}

#[test]
fn length_invariant_holds() {
    for length in [1, 2, 7, 100, 365] {
        let series = get_metric("conversion_rate", 3, length, date("2024-02-27")).unwrap();
        assert_eq!(series.len(), length);
    }
}

#[test]
fn zero_length_and_unknown_names_are_invalid() {
    assert!(matches!(
        get_metric("revenue", 1, 0, date("2023-01-01")),
        Err(MetricError::InvalidParameter(_))
    ));
    assert!(matches!(
        get_metric("headcount", 1, 10, date("2023-01-01")),
        Err(MetricError::InvalidParameter(_))
    ));
    assert!(matches!(
        parse_start_date("2023-13-01"),
        Err(MetricError::InvalidParameter(_))
    ));
}

#[test]
fn identity_filter_returns_input() {
    let series = revenue_42();
    let (out, _) = apply_filter(&series, &FilterSpec::default()).unwrap();
    assert_eq!(out, *series);
}

#[test]
fn filter_is_sound_and_complete() {
    let mut rng = StdRng::seed_from_u64(2023);
    let series = get_metric("sales", 5, 100, date("2023-01-01")).unwrap();
    let labels: Vec<String> = series.categories().into_iter().collect();
    let (lo, hi) = series.value_span().unwrap();

    for _ in 0..200 {
        let mut spec = FilterSpec::new();
        if rng.gen_bool(0.5) {
            let a = rng.gen_range(0..100u64);
            let b = rng.gen_range(a..100u64);
            spec = spec
                .with_date_range(
                    date("2023-01-01") + Days::new(a),
                    date("2023-01-01") + Days::new(b),
                )
                .unwrap();
        }
        if rng.gen_bool(0.5) {
            let picked: Vec<&String> = labels.iter().filter(|_| rng.gen_bool(0.5)).collect();
            spec = spec.with_categories(picked.into_iter().cloned());
        }
        if rng.gen_bool(0.5) {
            let a = rng.gen_range(lo..=hi);
            let b = rng.gen_range(a..=hi);
            spec = spec.with_value_range(a, b).unwrap();
        }

        let (out, stat) = apply_filter(&series, &spec).unwrap();
        assert!(out.points.iter().all(|p| spec.matches(p)));

        let expected: Vec<_> = series.points.iter().filter(|p| spec.matches(p)).collect();
        assert_eq!(out.points.len(), expected.len());
        for (got, want) in out.points.iter().zip(expected) {
            assert_eq!(got, want);
        }
        for pair in out.points.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(stat.count, out.len());
    }
}

#[test]
fn unmatched_value_range_gives_empty_flat_summary() {
    let series = revenue_42();
    let spec = FilterSpec::new().with_value_range(1e15, 1e15).unwrap();
    let (out, stat) = apply_filter(&series, &spec).unwrap();
    assert!(out.is_empty());
    assert_eq!(stat.total, 0.0);
    assert_eq!(stat.mean, 0.0);
    assert_eq!(stat.percent_change, 0.0);
    assert_eq!(stat.trend, Trend::Flat);
}

#[test]
fn inverted_date_range_is_rejected() {
    let result = FilterSpec::new().with_date_range(date("2023-01-10"), date("2023-01-01"));
    assert!(matches!(result, Err(MetricError::InvalidFilterSpec(_))));
}

#[test]
fn filtering_leaves_source_untouched() {
    let series = revenue_42();
    let before = (*series).clone();
    let spec = FilterSpec::new()
        .with_date_range(date("2023-01-03"), date("2023-01-05"))
        .unwrap();
    let (out, _) = apply_filter(&series, &spec).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(*series, before);
}
