use eframe::egui::{self, RichText};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    /// Shown in the footer.
    generated_at: String,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
            generated_at: chrono::Local::now()
                .format("%B %d, %Y at %I:%M %p")
                .to_string(),
        }
    }
}

impl Default for DashboardApp {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(RichText::new("Data Source: synthetic metrics").small().weak());
                ui.separator();
                ui.label(
                    RichText::new(format!("Last Updated: {}", self.generated_at))
                        .small()
                        .weak(),
                );
            });
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPI cards + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Key Performance Indicators");
                    ui.add_space(6.0);
                    plot::kpi_strip(ui, &self.state);
                    ui.add_space(16.0);
                    ui.heading("Performance Analytics");
                    ui.add_space(6.0);
                    plot::chart_grid(ui, &self.state);
                });
        });
    }
}
