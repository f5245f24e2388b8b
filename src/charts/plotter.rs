//! Chart Plotter Module
//! Draws the report's charts with egui_plot.

use airq_dashboard::data::Measure;
use airq_dashboard::stats::{
    BoxSummary, CorrelationMatrix, PairwiseRelation, TimeSeries, DEFAULT_CONFIDENCE_LEVEL,
};
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points, Polygon};

const CHART_HEIGHT: f32 = 280.0;
const HEATMAP_CELL: f32 = 64.0;
const TREND_SAMPLES: usize = 100;

/// Line colours, one per series.
pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(31, 119, 180),  // Blue
    Color32::from_rgb(255, 127, 14),  // Orange
    Color32::from_rgb(44, 160, 44),   // Green
    Color32::from_rgb(214, 39, 40),   // Red
    Color32::from_rgb(148, 103, 189), // Purple
    Color32::from_rgb(140, 86, 75),   // Brown
];

const SCATTER_COLOR: Color32 = Color32::from_rgba_premultiplied(31, 119, 180, 77);
const TREND_COLOR: Color32 = Color32::from_rgb(220, 20, 20);
const BAND_COLOR: Color32 = Color32::from_rgba_premultiplied(66, 6, 6, 51);

// Coolwarm end points and midpoint
const COOL: (f32, f32, f32) = (59.0, 76.0, 192.0);
const NEUTRAL: (f32, f32, f32) = (221.0, 221.0, 221.0);
const WARM: (f32, f32, f32) = (180.0, 4.0, 38.0);

/// Month ticks on a fractional-year axis: "2014-03".
fn year_month_label(value: f64) -> String {
    let year = value.floor();
    let month = ((value - year) * 12.0).round() as i32 + 1;
    if month > 12 {
        format!("{:.0}-01", year + 1.0)
    } else {
        format!("{:.0}-{:02}", year, month)
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Blue for -1, grey for 0, red for +1; grey for undefined.
    pub fn coolwarm(r: f64) -> Color32 {
        if r.is_nan() {
            return Color32::from_gray(160);
        }
        let t = r.clamp(-1.0, 1.0) as f32;
        let (from, to, frac) = if t < 0.0 {
            (NEUTRAL, COOL, -t)
        } else {
            (NEUTRAL, WARM, t)
        };
        let mix = |a: f32, b: f32| (a + (b - a) * frac).round() as u8;
        Color32::from_rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    }

    /// Placeholder drawn instead of a chart when the range holds no data.
    pub fn draw_empty(ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.label(
            RichText::new("No data for the selected range")
                .size(14.0)
                .color(Color32::GRAY),
        );
        ui.add_space(10.0);
    }

    /// Mean trend, one line per column. Yearly charts get markers and year ticks.
    pub fn draw_trend_chart(
        ui: &mut egui::Ui,
        id: &str,
        series: &TimeSeries,
        y_label: &str,
        yearly: bool,
    ) {
        if series.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(if yearly { "Year" } else { "Date" })
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                if yearly {
                    if mark.value.fract().abs() < 1e-9 {
                        format!("{:.0}", mark.value)
                    } else {
                        String::new()
                    }
                } else {
                    year_month_label(mark.value)
                }
            })
            .show(ui, |plot_ui| {
                for (i, measure) in series.columns.iter().enumerate() {
                    let points: Vec<[f64; 2]> = series
                        .series(*measure)
                        .into_iter()
                        .map(|(x, y)| [x, y])
                        .collect();
                    let color = Self::series_color(i);

                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(measure.column_name()),
                    );
                    if yearly {
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .radius(4.0)
                                .color(color),
                        );
                    }
                }
            });
    }

    /// Annotated correlation grid in coolwarm colours.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        if matrix.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        egui::Grid::new("correlation_heatmap")
            .spacing([2.0, 2.0])
            .show(ui, |ui| {
                ui.label("");
                for column in &matrix.columns {
                    ui.add_sized(
                        [HEATMAP_CELL, 20.0],
                        egui::Label::new(RichText::new(column.column_name()).strong()),
                    );
                }
                ui.end_row();

                for (i, row) in matrix.rows().enumerate() {
                    ui.label(RichText::new(matrix.columns[i].column_name()).strong());
                    for &r in row {
                        let (rect, _) = ui.allocate_exact_size(
                            egui::vec2(HEATMAP_CELL, HEATMAP_CELL * 0.6),
                            Sense::hover(),
                        );
                        ui.painter().rect_filled(rect, 2.0, Self::coolwarm(r));
                        let text = if r.is_nan() {
                            "–".to_string()
                        } else {
                            format!("{:.2}", r)
                        };
                        let text_color = if r.abs() > 0.6 {
                            Color32::WHITE
                        } else {
                            Color32::BLACK
                        };
                        ui.painter().text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            text,
                            FontId::proportional(13.0),
                            text_color,
                        );
                    }
                    ui.end_row();
                }
            });
    }

    /// Scatter of the target against one factor with trend line and confidence band.
    pub fn draw_regression_chart(ui: &mut egui::Ui, relation: &PairwiseRelation) {
        if relation.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let band = relation.trend_band(TREND_SAMPLES, DEFAULT_CONFIDENCE_LEVEL);
        let trend: Vec<[f64; 2]> = match (&relation.fit, relation.x_range()) {
            (Some(fit), Some((lo, hi))) => vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]],
            _ => Vec::new(),
        };
        // Polygon outline: upper edge left to right, then lower edge back.
        let outline: Vec<[f64; 2]> = band
            .iter()
            .map(|p| [p.x, p.upper])
            .chain(band.iter().rev().map(|p| [p.x, p.lower]))
            .collect();

        let x_label = format!("{} ({})", relation.x.column_name(), relation.x.unit());
        let y_label = format!("{} ({})", relation.y.column_name(), relation.y.unit());

        Plot::new(format!("regression_{}", relation.x))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                let points: PlotPoints = relation.points.iter().map(|&(x, y)| [x, y]).collect();
                plot_ui.points(Points::new(points).radius(1.5).color(SCATTER_COLOR));

                if !outline.is_empty() {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(outline))
                            .fill_color(BAND_COLOR)
                            .stroke(Stroke::NONE),
                    );
                }
                if !trend.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(trend))
                            .color(TREND_COLOR)
                            .width(2.0)
                            .name("OLS fit"),
                    );
                }
            });

        if let Some(fit) = &relation.fit {
            ui.label(
                RichText::new(format!(
                    "slope {:.3} · intercept {:.2} · r {:.3} · n {}",
                    fit.slope, fit.intercept, fit.r, fit.n
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }
    }

    /// Box per category, x-axis labelled with the category names.
    pub fn draw_box_chart(
        ui: &mut egui::Ui,
        summaries: &[(String, BoxSummary)],
        x_label: &str,
        value: Measure,
    ) {
        if summaries.is_empty() {
            Self::draw_empty(ui);
            return;
        }

        let labels: Vec<String> = summaries.iter().map(|(label, _)| label.clone()).collect();
        let y_label = format!("{} Concentration ({})", value.column_name(), value.unit());

        Plot::new("distribution_by_category")
            .height(CHART_HEIGHT + 40.0)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-9 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, (label, summary)) in summaries.iter().enumerate() {
                    let color = Self::series_color(i);
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            summary.whisker_low,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.whisker_high,
                        ),
                    )
                    .box_width(0.6)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color))
                    .name(label);
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(label));

                    if !summary.outliers.is_empty() {
                        let outliers: PlotPoints =
                            summary.outliers.iter().map(|&v| [i as f64, v]).collect();
                        plot_ui.points(
                            Points::new(outliers)
                                .radius(1.5)
                                .color(color.gamma_multiply(0.6)),
                        );
                    }
                }
            });
    }
}
