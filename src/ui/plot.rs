use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::{accessible_variant, hex_or_gray, with_alpha, ColorMap};
use crate::data::catalog::{KpiCard, KpiHeadline};
use crate::data::dataset::FilteredMetric;
use crate::data::model::{SummaryStat, Trend};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

/// Plot x coordinate of a date.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_to_x`], for axis labels.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Headline text of a KPI card, e.g. `"$847.2M"` or `"+12.4%"`.
pub fn headline_text(card: &KpiCard, unit: &str, summary: &SummaryStat) -> String {
    match card.headline {
        KpiHeadline::Change => format!("{:+.1}%", summary.percent_change),
        KpiHeadline::Latest => match summary.latest {
            None => "–".to_string(),
            Some(v) => match unit {
                "%" => format!("{v:.1}%"),
                u if u.starts_with('$') => format!("${v:.1}{}", &u[1..]),
                u => format!("{v:.1} {u}"),
            },
        },
    }
}

fn trend_color(trend: Trend) -> Color32 {
    match trend {
        Trend::Up => Color32::from_rgb(0x05, 0x96, 0x69),
        Trend::Down => Color32::from_rgb(0xdc, 0x26, 0x26),
        Trend::Flat => Color32::from_rgb(0x6b, 0x72, 0x80),
    }
}

/// Render the four KPI cards in one row.
pub fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let cards = state.kpi_summaries();
    ui.columns(cards.len().max(1), |columns: &mut [Ui]| {
        for (ui, (card, metric)) in columns.iter_mut().zip(cards) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new(card.icon).size(22.0));
                    ui.vertical(|ui: &mut Ui| {
                        ui.label(RichText::new(card.title).weak());
                        let Some(metric) = metric else {
                            ui.label("No data");
                            return;
                        };
                        let accent = accessible_variant(
                            hex_or_gray(metric.profile.color),
                            ui.visuals().panel_fill,
                        );
                        ui.label(
                            RichText::new(headline_text(card, metric.profile.unit, &metric.summary))
                                .size(24.0)
                                .strong()
                                .color(accent),
                        );
                        let s = &metric.summary;
                        ui.label(
                            RichText::new(format!("{} {:+.1}%", s.trend.arrow(), s.percent_change))
                                .color(trend_color(s.trend)),
                        );
                    });
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render every visible metric, two charts per row.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No metrics generated (see the status bar)");
        });
        return;
    }

    for row in state.visible.chunks(2) {
        ui.columns(2, |columns: &mut [Ui]| {
            for (ui, metric) in columns.iter_mut().zip(row) {
                egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                    metric_chart(ui, metric, state.color_maps.get(metric.profile.key));
                });
            }
        });
        ui.add_space(12.0);
    }
}

/// Render one metric: title, subtitle, then line + area + category markers.
pub fn metric_chart(ui: &mut Ui, metric: &FilteredMetric, color_map: Option<&ColorMap>) {
    let profile = metric.profile;
    let color = hex_or_gray(profile.color);

    ui.label(RichText::new(profile.title).size(18.0).strong());
    ui.label(RichText::new(profile.subtitle).weak());

    if metric.series.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No data for the current filters").italics());
            });
        });
        return;
    }

    let baseline = metric.summary.min.unwrap_or(0.0);
    let line_points: PlotPoints = metric
        .series
        .points
        .iter()
        .map(|p| [date_to_x(p.date), p.value])
        .collect();

    let y_label = profile.y_axis_label;
    Plot::new(profile.key)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%b %d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(move |_name, point| match x_to_date(point.x) {
            Some(d) => format!("{}\n{y_label}: {:.1}", d.format("%B %d, %Y"), point.y),
            None => String::new(),
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(line_points)
                    .color(color)
                    .fill(baseline as f32)
                    .width(3.0),
            );

            match color_map {
                // One marker series per category so the legend explains colours.
                Some(cm) => {
                    for (label, c) in cm.legend_entries() {
                        let markers: PlotPoints = metric
                            .series
                            .points
                            .iter()
                            .filter(|p| p.category.as_deref() == Some(label.as_str()))
                            .map(|p| [date_to_x(p.date), p.value])
                            .collect();
                        plot_ui.points(Points::new(markers).name(&label).color(c).radius(3.5));
                    }
                }
                None => {
                    let markers: PlotPoints = metric
                        .series
                        .points
                        .iter()
                        .map(|p| [date_to_x(p.date), p.value])
                        .collect();
                    plot_ui.points(
                        Points::new(markers)
                            .color(with_alpha(color, 0.9))
                            .radius(3.0),
                    );
                }
            }
        });
}
