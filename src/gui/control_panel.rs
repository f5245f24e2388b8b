//! Control Panel Widget
//! Left side panel with the year-range filter.

use egui::{Color32, RichText};

/// Left side control panel selecting the years shown by the report.
pub struct ControlPanel {
    pub bounds: (i32, i32),
    pub year_start: i32,
    pub year_end: i32,
    pub row_count: usize,
    pub status: String,
}

impl ControlPanel {
    /// Start with the full range selected.
    pub fn new(bounds: (i32, i32)) -> Self {
        Self {
            bounds,
            year_start: bounds.0,
            year_end: bounds.1,
            row_count: 0,
            status: "Ready".to_string(),
        }
    }

    pub fn selected_range(&self) -> (i32, i32) {
        (self.year_start, self.year_end)
    }

    /// Keep the selection inside the bounds with `start <= end`.
    ///
    /// `start_moved` tells which handle the user dragged; the other one follows.
    fn normalize(&mut self, start_moved: bool) {
        let (lo, hi) = self.bounds;
        self.year_start = self.year_start.clamp(lo, hi);
        self.year_end = self.year_end.clamp(lo, hi);
        if self.year_start > self.year_end {
            if start_moved {
                self.year_end = self.year_start;
            } else {
                self.year_start = self.year_end;
            }
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let (lo, hi) = self.bounds;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌫 AirQ Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Beijing · Wanliu station")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Year Filter Section =====
        ui.label(RichText::new("📅 Select Years").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let start = ui.add(egui::Slider::new(&mut self.year_start, lo..=hi).text("From"));
                if start.changed() {
                    self.normalize(true);
                    action = ControlPanelAction::RangeChanged;
                }

                let end = ui.add(egui::Slider::new(&mut self.year_end, lo..=hi).text("To"));
                if end.changed() {
                    self.normalize(false);
                    action = ControlPanelAction::RangeChanged;
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Selection").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(format!("{}–{}", self.year_start, self.year_end));
        ui.label(format!("{} hourly observations", self.row_count));
        ui.add_space(5.0);

        let status_color = if self.row_count == 0 {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, row_count: usize, status: &str) {
        self.row_count = row_count;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    RangeChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragging_start_past_end_pulls_end_along() {
        let mut panel = ControlPanel::new((2013, 2017));
        panel.year_end = 2014;
        panel.year_start = 2016;
        panel.normalize(true);
        assert_eq!(panel.selected_range(), (2016, 2016));
    }

    #[test]
    fn dragging_end_before_start_pulls_start_along() {
        let mut panel = ControlPanel::new((2013, 2017));
        panel.year_start = 2016;
        panel.year_end = 2014;
        panel.normalize(false);
        assert_eq!(panel.selected_range(), (2014, 2014));
    }

    #[test]
    fn selection_is_clamped_to_bounds() {
        let mut panel = ControlPanel::new((2013, 2017));
        panel.year_start = 1999;
        panel.year_end = 2030;
        panel.normalize(true);
        assert_eq!(panel.selected_range(), (2013, 2017));
    }
}
