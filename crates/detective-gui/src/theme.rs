//! Case-file look for the game screens, with catppuccin flavors as alternatives.

use crate::settings::ThemeMode;
use detective_graph::{Color, palette};
use eframe::egui::{self, Color32, Vec2};

pub mod spacing {
    pub const PANEL_PADDING: f32 = 12.0;
    pub const PANEL_PADDING_I8: i8 = 12;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const SECTION_SPACING: f32 = 16.0;
    pub const BUTTON_PADDING: f32 = 8.0;
}

pub mod radius {
    use eframe::egui::CornerRadius;

    pub const SMALL: CornerRadius = CornerRadius::same(2);
    pub const MEDIUM: CornerRadius = CornerRadius::same(4);
    pub const LARGE: CornerRadius = CornerRadius::same(8);
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub font_size_base: f32,
    pub font_size_small: f32,
    pub font_size_heading: f32,
}

impl Theme {
    pub fn new(mode: ThemeMode, font_size: f32) -> Self {
        Self {
            mode,
            font_size_base: font_size,
            font_size_small: font_size * 0.85,
            font_size_heading: font_size * 1.4,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        match self.mode {
            ThemeMode::Noir => apply_noir_visuals(ctx),
            ThemeMode::Latte => catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE),
            ThemeMode::Mocha => catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA),
        }

        let mut style = (*ctx.style()).clone();

        use egui::FontFamily::{Monospace, Proportional};
        use egui::FontId;
        use egui::TextStyle::{Body, Button, Heading, Small};

        style.text_styles = [
            (Heading, FontId::new(self.font_size_heading, Proportional)),
            (Body, FontId::new(self.font_size_base, Proportional)),
            (
                egui::TextStyle::Monospace,
                FontId::new(self.font_size_base, Monospace),
            ),
            (Button, FontId::new(self.font_size_base, Proportional)),
            (Small, FontId::new(self.font_size_small, Proportional)),
        ]
        .into();

        style.spacing.item_spacing = Vec2::new(spacing::ITEM_SPACING, spacing::ITEM_SPACING);
        style.spacing.button_padding =
            Vec2::new(spacing::BUTTON_PADDING, spacing::BUTTON_PADDING / 2.0);
        style.spacing.window_margin = egui::Margin::same(spacing::PANEL_PADDING_I8);
        ctx.set_style(style);
    }
}

fn apply_noir_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    let text = to_egui_color(palette::TEXT);
    let border = to_egui_color(palette::BORDER);

    visuals.window_fill = to_egui_color(palette::DARK_BG);
    visuals.panel_fill = to_egui_color(palette::DARK_BG);
    visuals.extreme_bg_color = to_egui_color(palette::DARKER_BG);
    visuals.faint_bg_color = to_egui_color(palette::LIGHT_BG);

    visuals.widgets.noninteractive.bg_fill = to_egui_color(palette::DARKER_BG);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, border);
    visuals.widgets.noninteractive.fg_stroke.color = text;

    visuals.widgets.inactive.bg_fill = to_egui_color(palette::LIGHT_BG);
    visuals.widgets.inactive.weak_bg_fill = to_egui_color(palette::LIGHT_BG);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, border);
    visuals.widgets.inactive.fg_stroke.color = text;

    visuals.widgets.hovered.bg_fill = to_egui_color(palette::LIGHT_BG.lighten(0.1));
    visuals.widgets.hovered.weak_bg_fill = to_egui_color(palette::LIGHT_BG.lighten(0.1));
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, to_egui_color(palette::ACCENT));
    visuals.widgets.hovered.fg_stroke.color = to_egui_color(palette::TEXT_BRIGHT);

    visuals.widgets.active.bg_fill = to_egui_color(palette::ACCENT.darken(0.3));
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, to_egui_color(palette::ACCENT));
    visuals.widgets.active.fg_stroke.color = to_egui_color(palette::TEXT_BRIGHT);

    visuals.override_text_color = Some(text);
    visuals.window_stroke = egui::Stroke::new(1.0, border);
    visuals.selection.bg_fill = to_egui_color(palette::ACCENT.darken(0.2));
    visuals.selection.stroke = egui::Stroke::new(1.0, to_egui_color(palette::ACCENT));
    visuals.error_fg_color = to_egui_color(palette::ERROR);

    ctx.set_visuals(visuals);
}

pub fn to_egui_color(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn accent() -> Color32 {
    to_egui_color(palette::ACCENT)
}

pub fn success() -> Color32 {
    to_egui_color(palette::SUCCESS)
}

pub fn error() -> Color32 {
    to_egui_color(palette::ERROR)
}

pub fn dim() -> Color32 {
    to_egui_color(palette::TEXT_DIM)
}

pub fn primary_button(ui: &egui::Ui, text: &str) -> egui::Button<'static> {
    let color = ui.visuals().selection.bg_fill;
    let text_color = ui.visuals().strong_text_color();
    egui::Button::new(egui::RichText::new(text).color(text_color)).fill(color)
}

/// Framed block on the panel background.
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::default()
        .fill(ui.visuals().extreme_bg_color)
        .corner_radius(radius::LARGE)
        .inner_margin(egui::Margin::same(spacing::PANEL_PADDING_I8))
        .stroke(ui.visuals().window_stroke)
        .show(ui, add_contents);
}

fn message_box(ui: &mut egui::Ui, fg: Color32, message: &str) {
    egui::Frame::default()
        .fill(fg.gamma_multiply(0.2))
        .corner_radius(radius::MEDIUM)
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(message).color(fg));
        });
}

pub fn success_box(ui: &mut egui::Ui, message: &str) {
    message_box(ui, success(), message);
}

pub fn error_box(ui: &mut egui::Ui, message: &str) {
    message_box(ui, error(), message);
}

pub fn labeled_separator(ui: &mut egui::Ui, label: &str) {
    ui.horizontal(|ui| {
        ui.separator();
        ui.label(egui::RichText::new(label).small().color(dim()));
        ui.separator();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion_keeps_channels() {
        let c = to_egui_color(Color::rgba(10, 20, 30, 255));
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (10, 20, 30, 255));
    }

    #[test]
    fn test_font_sizes_follow_base() {
        let theme = Theme::new(ThemeMode::Noir, 20.0);
        assert!((theme.font_size_small - 17.0).abs() < 1e-4);
        assert!((theme.font_size_heading - 28.0).abs() < 1e-4);
    }
}
