//! egui rendering of [`crate::state::AppState`]: filter panel, KPI cards and charts.

pub mod panels;
pub mod plot;
