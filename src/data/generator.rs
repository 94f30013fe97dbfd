use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::catalog::MetricProfile;
use super::error::{MetricError, MetricResult};
use super::model::{MetricPoint, MetricSeries};

/// Days generated when the caller does not ask for a specific window.
pub const DEFAULT_LENGTH: usize = 100;

/// First day of the historical window used by the dashboard.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(text: &str) -> MetricResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
        MetricError::InvalidParameter(format!("'{text}' is not a valid calendar date: {e}"))
    })
}

/// Build a start date from its parts, rejecting impossible days like Feb 30.
pub fn start_date_from_ymd(year: i32, month: u32, day: u32) -> MetricResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        MetricError::InvalidParameter(format!(
            "{year:04}-{month:02}-{day:02} is not a valid calendar date"
        ))
    })
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate `length` daily points of `profile` starting at `start`.
///
/// The RNG is built here from `seed` and nowhere else, so identical inputs
/// always give bit-identical output.
pub fn generate(
    profile: &MetricProfile,
    seed: u64,
    length: usize,
    start: NaiveDate,
) -> MetricResult<MetricSeries> {
    if length == 0 {
        return Err(MetricError::InvalidParameter(
            "length must be at least 1".into(),
        ));
    }
    let last_offset = u64::try_from(length - 1)
        .map_err(|_| MetricError::InvalidParameter(format!("length {length} is too large")))?;
    if start.checked_add_days(chrono::Days::new(last_offset)).is_none() {
        return Err(MetricError::InvalidParameter(format!(
            "{length} days from {start} runs past the end of the calendar"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let points = sample_points(profile, length, start, &mut rng);
    log::debug!(
        "Generated {} points of '{}' (seed {seed}, from {start})",
        points.len(),
        profile.key
    );

    Ok(MetricSeries {
        name: profile.key.to_string(),
        unit: profile.unit.to_string(),
        seed,
        points,
    })
}

/// Draw the points from an already seeded RNG.
///
/// Per day the draw order is: one normal sample for noise, then one uniform
/// index for the category (only for categorised profiles).
pub fn sample_points<R: Rng>(
    profile: &MetricProfile,
    length: usize,
    start: NaiveDate,
    rng: &mut R,
) -> Vec<MetricPoint> {
    start
        .iter_days()
        .take(length)
        .enumerate()
        .map(|(i, date)| {
            let trend = profile.base_trend(i);
            let noise = gauss(rng, 0.0, profile.noise * trend);
            let mut value = trend + profile.seasonal_component(i) + noise;
            if let Some(bound) = profile.upper_bound {
                value = value.clamp(0.0, bound);
            }

            let category = if profile.categories.is_empty() {
                None
            } else {
                let idx = rng.gen_range(0..profile.categories.len());
                Some(profile.categories[idx].to_string())
            };

            MetricPoint {
                date,
                value,
                category,
            }
        })
        .collect()
}

/// Box-Muller transform for a normal sample.
fn gauss<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{lookup, CATALOG};

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    #[test]
    fn same_inputs_are_bit_identical() {
        let profile = lookup("revenue").unwrap();
        let a = generate(profile, 42, 100, jan(1)).unwrap();
        let b = generate(profile, 42, 100, jan(1)).unwrap();
        for (pa, pb) in a.points.iter().zip(&b.points) {
            assert_eq!(pa.value.to_bits(), pb.value.to_bits());
            assert_eq!(pa.category, pb.category);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let profile = lookup("sales").unwrap();
        let a = generate(profile, 1, 30, jan(1)).unwrap();
        let b = generate(profile, 2, 30, jan(1)).unwrap();
        assert_ne!(a.points, b.points);
    }

    #[test]
    fn zero_length_is_rejected() {
        let profile = lookup("revenue").unwrap();
        assert!(matches!(
            generate(profile, 0, 0, jan(1)),
            Err(MetricError::InvalidParameter(_))
        ));
    }

    #[test]
    fn window_past_calendar_end_is_rejected() {
        let profile = lookup("revenue").unwrap();
        let late = NaiveDate::MAX;
        assert!(matches!(
            generate(profile, 0, 2, late),
            Err(MetricError::InvalidParameter(_))
        ));
    }

    #[test]
    fn bounded_metrics_stay_in_bounds() {
        for (profile, bound) in CATALOG
            .iter()
            .filter_map(|p| p.upper_bound.map(|b| (p, b)))
        {
            for seed in 0..20 {
                let series = generate(profile, seed, 100, jan(1)).unwrap();
                assert!(series
                    .points
                    .iter()
                    .all(|p| (0.0..=bound).contains(&p.value)));
            }
        }
    }

    #[test]
    fn categories_come_from_the_profile() {
        let profile = lookup("sales").unwrap();
        let series = generate(profile, 9, 100, jan(1)).unwrap();
        for p in &series.points {
            let label = p.category.as_deref().unwrap();
            assert!(profile.categories.contains(&label));
        }

        let margin = lookup("profit_margin").unwrap();
        let series = generate(margin, 9, 10, jan(1)).unwrap();
        assert!(series.points.iter().all(|p| p.category.is_none()));
    }

    #[test]
    fn parses_valid_and_rejects_invalid_dates() {
        assert_eq!(parse_start_date("2023-01-01").unwrap(), jan(1));
        assert!(parse_start_date("2023-02-30").is_err());
        assert!(parse_start_date("yesterday").is_err());
        assert!(start_date_from_ymd(2023, 2, 29).is_err());
        assert_eq!(start_date_from_ymd(2024, 2, 29).unwrap().to_string(), "2024-02-29");
    }
}
