//! AirQ Dashboard Main Application
//! Main window with the year-range control panel and the report page.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use airq_dashboard::data::TimeIndexed;
use airq_dashboard::{filter, DashboardReport, Dataset, ReportConfig};
use egui::SidePanel;
use std::sync::Arc;

/// Main application window.
pub struct DashboardApp {
    dataset: Arc<Dataset>,
    report_config: ReportConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    report: DashboardReport,
}

impl DashboardApp {
    pub fn new(
        dataset: Arc<Dataset>,
        report_config: ReportConfig,
        year_bounds: (i32, i32),
    ) -> Self {
        let (start, end) = year_bounds;
        let report = DashboardReport::build(filter(&dataset, start, end), &report_config);

        let mut app = Self {
            dataset,
            report_config,
            control_panel: ControlPanel::new(year_bounds),
            chart_viewer: ChartViewer::new(),
            report,
        };
        app.update_status();
        app
    }

    /// Recompute every chart for the selected years.
    fn rebuild_report(&mut self) {
        let (start, end) = self.control_panel.selected_range();
        let view = filter(&self.dataset, start, end);
        self.report = DashboardReport::build(view, &self.report_config);
        log::debug!("Range {start}..={end}: {} rows", view.len());
        self.update_status();
    }

    fn update_status(&mut self) {
        let (start, end) = self.control_panel.selected_range();
        let status = if self.report.is_empty() {
            "No observations in the selected years".to_string()
        } else {
            format!("Showing {start}–{end}")
        };
        self.control_panel.set_status(self.report.row_count, &status);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                if self.control_panel.show(ui) == ControlPanelAction::RangeChanged {
                    self.rebuild_report();
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.report);
        });
    }
}
