//! AirQ Dashboard - Beijing Air-Quality Report
//!
//! Desktop window over the Wanliu station data: pick a year range and every
//! chart is recomputed.

mod charts;
mod gui;

use airq_dashboard::config::CONFIG_FILE_NAME;
use airq_dashboard::{DashboardConfig, DatasetCache};
use anyhow::Context;
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME))
        .context("Failed to read dashboard configuration")?;
    let report_config = config.report_config()?;

    // Loaded once; the window only ever reads it.
    let dataset = DatasetCache::shared()
        .get_or_load(&config.csv_path)
        .with_context(|| format!("Failed to load {}", config.csv_path.display()))?;
    let year_bounds = (config.year_min, config.year_max);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("AirQ Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "AirQ Dashboard",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DashboardApp::new(
                dataset,
                report_config,
                year_bounds,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {e}"))
}
