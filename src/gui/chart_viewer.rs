//! Chart Viewer Widget
//! Scrollable single page: trends, correlation, regressions, distribution, conclusion.

use crate::charts::ChartPlotter;
use airq_dashboard::{DashboardReport, CONCLUSION};
use egui::{RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;

/// Right side report page.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }

    /// Draw every chart of `report`.
    pub fn show(&mut self, ui: &mut egui::Ui, report: &DashboardReport) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Air Quality Analysis in Beijing (2013-2017)")
                        .size(24.0)
                        .strong(),
                );
                ui.label(
                    "Trends in air quality and the weather factors that influence pollution levels.",
                );

                Self::section(ui, "Annual Trends of PM2.5 and PM10");
                ChartPlotter::draw_trend_chart(
                    ui,
                    "yearly_trend",
                    &report.yearly,
                    "Concentration (µg/m³)",
                    true,
                );

                Self::section(ui, "Monthly Average Trends of PM2.5 and PM10");
                ChartPlotter::draw_trend_chart(
                    ui,
                    "monthly_trend",
                    &report.monthly,
                    "Concentration (µg/m³)",
                    false,
                );

                Self::section(ui, "Correlation Heatmap: PM2.5 vs Weather Factors");
                ChartPlotter::draw_heatmap(ui, &report.correlation);

                Self::section(ui, "Relationship Between PM2.5 and Weather Factors");
                for relation in &report.relations {
                    ui.label(
                        RichText::new(format!("{} vs {}", relation.y, relation.x))
                            .size(14.0)
                            .strong(),
                    );
                    ChartPlotter::draw_regression_chart(ui, relation);
                    ui.add_space(10.0);
                }

                let category = report.distribution.category.title();
                Self::section(
                    ui,
                    &format!("Distribution of {} by {category}", report.distribution.value),
                );
                ChartPlotter::draw_box_chart(
                    ui,
                    &report.distribution_summaries,
                    category,
                    report.distribution.value,
                );

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.label(RichText::new("Conclusion").size(16.0).strong());
                for line in CONCLUSION {
                    ui.label(format!("• {line}"));
                }
                ui.add_space(SECTION_SPACING);
            });
    }
}
