use eframe::egui;
use kpi_board::app::DashboardApp;
use kpi_board::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, config_error) = match DashboardConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            (DashboardConfig::default(), Some(format!("Config error: {e:#}")))
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Executive Business Dashboard",
        options,
        Box::new(move |_cc| {
            let mut app = DashboardApp::new(config);
            if config_error.is_some() {
                app.state.status_message = config_error;
            }
            Ok(Box::new(app))
        }),
    )
}
