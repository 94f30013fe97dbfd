use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::catalog::CATALOG;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("Reset").clicked() {
                state.reset_filters();
            }
        });
    });
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No data generated.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let categories = dataset.categories.clone();
    let color_maps = state.color_maps.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date Range");
            if ui
                .checkbox(&mut state.date_filter_enabled, "Limit to dates")
                .changed()
            {
                state.dirty = true;
            }
            ui.add_enabled_ui(state.date_filter_enabled, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    let from = ui.add(
                        DatePickerButton::new(&mut state.date_start).id_salt("date_start"),
                    );
                    ui.label("to");
                    let to =
                        ui.add(DatePickerButton::new(&mut state.date_end).id_salt("date_end"));
                    if from.changed() || to.changed() {
                        state.dirty = true;
                    }
                });
            });
            ui.separator();

            // ---- Per-metric category filters (collapsible) ----
            ui.strong("Categories");
            for profile in CATALOG.iter() {
                let Some(all_labels) = categories.get(profile.key) else {
                    continue;
                };
                if all_labels.is_empty() {
                    continue;
                }

                let n_selected = state
                    .category_filters
                    .get(profile.key)
                    .map_or(0, |s| s.len());
                let header_text = format!("{}  ({n_selected}/{})", profile.title, all_labels.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(profile.key)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(profile.key);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(profile.key);
                            }
                        });

                        for label in all_labels {
                            let mut checked = state
                                .category_filters
                                .get(profile.key)
                                .is_some_and(|s| s.contains(label));

                            let mut text = RichText::new(label);
                            if let Some(cm) = color_maps.get(profile.key) {
                                text = text.color(cm.color_for(label));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_category(profile.key, label);
                            }
                        }
                    });
            }
            ui.separator();

            // ---- Value range for one metric ----
            value_range_editor(ui, state);
            ui.separator();

            // ---- Apply ----
            let width = ui.available_width();
            let apply = egui::Button::new(RichText::new("Apply").strong())
                .min_size(egui::vec2(width, 28.0));
            if ui.add_enabled(state.dirty, apply).clicked() {
                state.refilter();
            }

            // ---- Active filters ----
            ui.add_space(8.0);
            let tags = state.active_filter_tags();
            if tags.is_empty() {
                ui.label(RichText::new("No active filters").italics().weak());
            } else {
                for (name, value) in tags {
                    ui.horizontal_wrapped(|ui: &mut Ui| {
                        ui.label(RichText::new(format!("{name}:")).strong());
                        ui.label(value);
                    });
                }
            }
        });
}

fn value_range_editor(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Value Range");

    let current_title = CATALOG
        .iter()
        .find(|p| p.key == state.value_metric)
        .map_or("", |p| p.title);
    let mut chosen: Option<&str> = None;
    egui::ComboBox::from_id_salt("value_metric")
        .selected_text(current_title)
        .show_ui(ui, |ui: &mut Ui| {
            for profile in CATALOG.iter() {
                if ui
                    .selectable_label(state.value_metric == profile.key, profile.title)
                    .clicked()
                {
                    chosen = Some(profile.key);
                }
            }
        });
    if let Some(key) = chosen {
        state.set_value_metric(key);
    }

    let full = state.full_value_range(&state.value_metric);
    let speed = ((full.max - full.min) / 200.0).max(0.001);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Min");
        ui.add(egui::DragValue::new(&mut state.value_draft.min).speed(speed));
        ui.label("Max");
        ui.add(egui::DragValue::new(&mut state.value_draft.max).speed(speed));
    });
    if state.value_draft.is_inverted() {
        ui.label(RichText::new("Min is above max").color(Color32::RED));
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Set").clicked() {
            state.commit_value_draft();
        }
        if ui.button("Clear").clicked() {
            let key = state.value_metric.clone();
            state.clear_value_filter(&key);
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered data…").clicked() {
                export_dialog(state, true);
                ui.close_menu();
            }
            if ui.button("Export all data…").clicked() {
                export_dialog(state, false);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Seed");
        let seed = ui.add(egui::DragValue::new(&mut state.seed_draft).range(0..=9_999));
        // Regenerate on release only; every distinct seed stays in the series cache.
        if seed.drag_stopped() || seed.lost_focus() {
            state.commit_seed_draft();
        }
        if ui.button("Regenerate").clicked() {
            if state.seed_draft == state.config.seed_offset {
                state.regenerate();
            } else {
                state.commit_seed_draft();
            }
        }

        ui.separator();

        if state.dataset.is_some() {
            ui.label(format!(
                "{} of {} points visible",
                state.visible_point_count(),
                state.total_point_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState, filtered_only: bool) {
    let file = rfd::FileDialog::new()
        .set_title("Export metrics")
        .set_file_name("metrics.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .save_file();

    let Some(path) = file else {
        return;
    };

    let result = if filtered_only {
        crate::export::export_file(&path, state.visible.iter().map(|m| &m.series))
    } else {
        match &state.dataset {
            Some(ds) => crate::export::export_file(&path, ds.entries.iter().map(|(_, s)| &**s)),
            None => Ok(0),
        }
    };

    match result {
        Ok(rows) => {
            state.status_message = None;
            log::info!("Wrote {rows} rows to {}", path.display());
        }
        Err(e) => {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
