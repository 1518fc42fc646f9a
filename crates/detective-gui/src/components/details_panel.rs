use crate::theme::{self, spacing};
use detective_graph::DetailsPanel;
use detective_graph::details::{CLOSE_HINT, PANEL_WIDTH};
use eframe::egui;

/// Keep the panel's left edge inside the canvas where it fits.
pub fn panel_origin(panel: &DetailsPanel, canvas: egui::Rect) -> egui::Pos2 {
    let top_left = panel.top_left();
    let max_x = (canvas.right() - PANEL_WIDTH).max(canvas.left());
    egui::pos2(
        top_left.x.clamp(canvas.left(), max_x),
        top_left.y.clamp(canvas.top(), canvas.bottom()),
    )
}

pub fn show(ctx: &egui::Context, panel: &DetailsPanel, canvas: egui::Rect) {
    egui::Area::new(egui::Id::new("graph_details_panel"))
        .order(egui::Order::Foreground)
        .fixed_pos(panel_origin(panel, canvas))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .corner_radius(theme::radius::MEDIUM)
                .show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH - 2.0 * spacing::PANEL_PADDING);
                    let mut lines = panel.details.lines().into_iter();
                    if let Some(title) = lines.next() {
                        ui.label(egui::RichText::new(title).strong().color(theme::accent()));
                    }
                    for line in lines {
                        if line.is_empty() {
                            ui.add_space(spacing::ITEM_SPACING / 2.0);
                        } else {
                            ui.label(line);
                        }
                    }
                    ui.add_space(spacing::ITEM_SPACING);
                    ui.label(egui::RichText::new(CLOSE_HINT).small().color(theme::dim()));
                });
        });
}
