use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::data::model::MetricSeries;

/// `num_days_from_ce` of 1970-01-01, the Arrow `Date32` origin.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write series to a file in long format. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `metric, unit, date (Date32), value, category`
/// * `.json`    – `[{ "metric": ..., "date": "2023-01-01", ... }, ...]`
/// * `.csv`     – header row, one line per point, empty category when unset
///
/// Returns the number of rows written.
pub fn export_file<'a, I>(path: &Path, series: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a MetricSeries>,
{
    let rows = to_rows(series);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => write_parquet(path, &rows)?,
        "json" => write_json(path, &rows)?,
        "csv" => write_csv(path, &rows)?,
        other => bail!("Unsupported export extension: .{other}"),
    }
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// One exported point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow<'a> {
    pub metric: &'a str,
    pub unit: &'a str,
    pub date: NaiveDate,
    pub value: f64,
    pub category: Option<&'a str>,
}

fn to_rows<'a, I>(series: I) -> Vec<ExportRow<'a>>
where
    I: IntoIterator<Item = &'a MetricSeries>,
{
    series
        .into_iter()
        .flat_map(|s| {
            s.points.iter().map(move |p| ExportRow {
                metric: &s.name,
                unit: &s.unit,
                date: p.date,
                value: p.value,
                category: p.category.as_deref(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_json(path: &Path, rows: &[ExportRow<'_>]) -> Result<()> {
    let file = File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows).context("writing JSON")?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[ExportRow<'_>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for (row_no, row) in rows.iter().enumerate() {
        writer
            .serialize(row)
            .with_context(|| format!("CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[ExportRow<'_>]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("metric", DataType::Utf8, false),
        Field::new("unit", DataType::Utf8, false),
        Field::new("date", DataType::Date32, false),
        Field::new("value", DataType::Float64, false),
        Field::new("category", DataType::Utf8, true),
    ]));

    let metric = StringArray::from(rows.iter().map(|r| r.metric).collect::<Vec<_>>());
    let unit = StringArray::from(rows.iter().map(|r| r.unit).collect::<Vec<_>>());
    let date = Date32Array::from(
        rows.iter()
            .map(|r| r.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect::<Vec<_>>(),
    );
    let value = Float64Array::from(rows.iter().map(|r| r.value).collect::<Vec<_>>());
    let category = StringArray::from(rows.iter().map(|r| r.category).collect::<Vec<_>>());

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(metric),
            Arc::new(unit),
            Arc::new(date),
            Arc::new(value),
            Arc::new(category),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
