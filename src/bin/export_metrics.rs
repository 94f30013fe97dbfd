//! Generate the full metric catalog and write it to one file.
//!
//! Usage: `export_metrics [OUTPUT] [SEED_OFFSET]`
//! The format follows the extension of OUTPUT (default `metrics.parquet`).
//! Length and start date come from the usual `KPI_BOARD_*` configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use kpi_board::config::DashboardConfig;
use kpi_board::data::dataset::MetricDataset;
use kpi_board::export::export_file;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "metrics.parquet".into()));

    let mut config = DashboardConfig::from_env().context("loading configuration")?;
    if let Some(raw) = args.next() {
        config.seed_offset = raw
            .parse()
            .with_context(|| format!("seed offset '{raw}' is not a number"))?;
    }

    let dataset = MetricDataset::generate(config.seed_offset, config.length, config.start_date)
        .context("generating metrics")?;
    let rows = export_file(&output, dataset.entries.iter().map(|(_, s)| &**s))
        .with_context(|| format!("exporting to {}", output.display()))?;

    println!(
        "Wrote {rows} rows ({} metrics × {} days) to {}",
        dataset.len(),
        config.length,
        output.display()
    );
    Ok(())
}
