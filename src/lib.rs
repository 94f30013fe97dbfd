//! Executive KPI board: synthetic business metrics, filters and summaries.
//!
//! The [`data`] layer is UI-independent; [`state`] and [`ui`] render it with
//! egui, and [`export`] writes snapshots for the `export_metrics` binary.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
