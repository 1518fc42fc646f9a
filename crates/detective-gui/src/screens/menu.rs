use super::{GameContext, LevelSelectScreen, Screen, Transition};
use crate::theme::{self, spacing};
use detective_core::level::CASE_INTRO;
use eframe::egui;

pub const TITLE: &str = "Cypher Detective";

#[derive(Debug, Default)]
pub struct MenuScreen {
    show_case_file: bool,
}

impl MenuScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn start() -> Transition {
        Transition::Switch(Box::new(LevelSelectScreen::new()))
    }
}

impl Screen for MenuScreen {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn update(&mut self, ctx: &egui::Context, _game: &mut GameContext) -> Transition {
        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            return Self::start();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            return Transition::Quit;
        }
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::C)) {
            self.show_case_file = !self.show_case_file;
        }
        Transition::Stay
    }

    fn render(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition {
        let mut transition = Transition::Stay;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.2);
                ui.label(
                    egui::RichText::new(TITLE)
                        .size(48.0)
                        .strong()
                        .color(theme::accent()),
                );
                ui.label(egui::RichText::new("A graph query murder mystery").color(theme::dim()));
                ui.add_space(spacing::SECTION_SPACING * 2.0);

                let start = theme::primary_button(ui, "Start investigation");
                if ui.add_sized([220.0, 36.0], start).clicked() {
                    transition = Self::start();
                }
                let case_label = if self.show_case_file {
                    "Close case file"
                } else {
                    "Case file"
                };
                if ui.add_sized([220.0, 36.0], egui::Button::new(case_label)).clicked() {
                    self.show_case_file = !self.show_case_file;
                }
                if ui.add_sized([220.0, 36.0], egui::Button::new("Quit")).clicked() {
                    transition = Transition::Quit;
                }

                if self.show_case_file {
                    ui.add_space(spacing::SECTION_SPACING);
                    ui.set_max_width(560.0);
                    theme::card(ui, |ui| {
                        ui.label(egui::RichText::new("CASE FILE").strong().color(theme::accent()));
                        ui.label(CASE_INTRO);
                    });
                }

                ui.add_space(spacing::SECTION_SPACING);
                let state = game.progress.state();
                ui.label(
                    egui::RichText::new(format!(
                        "Solved {} of {} levels, {} correct of {} queries",
                        state.levels_completed.len(),
                        game.catalog.len(),
                        state.total_queries_correct,
                        state.total_queries_attempted,
                    ))
                    .small()
                    .color(theme::dim()),
                );
                ui.label(
                    egui::RichText::new("Enter: start   C: case file   Esc: quit")
                        .small()
                        .color(theme::dim()),
                );
            });
        });
        transition
    }
}
