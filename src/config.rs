use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::data::generator::{default_start_date, parse_start_date, DEFAULT_LENGTH};
use crate::data::summary::TREND_EPSILON;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_PATH_VAR: &str = "KPI_BOARD_CONFIG";

// ---------------------------------------------------------------------------
// DashboardConfig – generation window and summary settings
// ---------------------------------------------------------------------------

/// Settings shared by the dashboard and the export binary.
///
/// ```json
/// { "seed_offset": 0, "length": 100, "start_date": "2023-01-01", "trend_epsilon": 0.5 }
/// ```
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Added to each catalog seed.
    pub seed_offset: u64,
    /// Days per series.
    pub length: usize,
    pub start_date: NaiveDate,
    /// Percent change that still counts as flat.
    pub trend_epsilon: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed_offset: 0,
            length: DEFAULT_LENGTH,
            start_date: default_start_date(),
            trend_epsilon: TREND_EPSILON,
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the file named by `KPI_BOARD_CONFIG`, then single-value
    /// overrides `KPI_BOARD_SEED`, `KPI_BOARD_LENGTH` and `KPI_BOARD_START`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        if let Some(seed) = env_parse::<u64>("KPI_BOARD_SEED")? {
            config.seed_offset = seed;
        }
        if let Some(length) = env_parse::<usize>("KPI_BOARD_LENGTH")? {
            config.length = length;
        }
        if let Ok(start) = std::env::var("KPI_BOARD_START") {
            config.start_date = parse_start_date(&start).context("KPI_BOARD_START")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            bail!("length must be at least 1");
        }
        if self.trend_epsilon.is_nan() || self.trend_epsilon < 0.0 {
            bail!("trend_epsilon must be non-negative, got {}", self.trend_epsilon);
        }
        Ok(())
    }
}

fn env_parse<T>(var: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{var}='{raw}' is not valid")),
        Err(_) => Ok(None),
    }
}
