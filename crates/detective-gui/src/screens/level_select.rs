use super::{GameContext, GameplayScreen, MenuScreen, Screen, Transition, digit_pressed};
use crate::theme::{self, spacing};
use detective_core::Level;
use detective_progress::ProgressState;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBadge {
    Locked,
    Open,
    Solved,
}

impl LevelBadge {
    pub fn for_level(progress: &ProgressState, level: u32) -> Self {
        if progress.is_completed(level) {
            LevelBadge::Solved
        } else if progress.is_unlocked(level) {
            LevelBadge::Open
        } else {
            LevelBadge::Locked
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            LevelBadge::Locked => "[locked]",
            LevelBadge::Open => "",
            LevelBadge::Solved => "[solved]",
        }
    }
}

#[derive(Debug, Default)]
pub struct LevelSelectScreen;

impl LevelSelectScreen {
    pub fn new() -> Self {
        Self
    }

    fn start(level: u32, game: &mut GameContext) -> Transition {
        if !game.progress.is_unlocked(level) {
            game.notifications.info(format!("Level {level} is locked."));
            return Transition::Stay;
        }
        let Some(level) = game.catalog.get(level).cloned() else {
            return Transition::Stay;
        };
        tracing::info!(level = level.number, "Starting level");
        Transition::Switch(Box::new(GameplayScreen::new(level, game)))
    }

    fn level_row(ui: &mut egui::Ui, level: &Level, badge: LevelBadge) -> bool {
        let label = if level.is_tutorial() {
            format!("Tutorial: {}", level.title)
        } else {
            format!("Level {}: {}", level.number, level.title)
        };
        let text = match badge {
            LevelBadge::Locked => egui::RichText::new(format!("{label} {}", badge.marker()))
                .color(theme::dim()),
            LevelBadge::Open => egui::RichText::new(label),
            LevelBadge::Solved => egui::RichText::new(format!("{label} {}", badge.marker()))
                .color(theme::success()),
        };
        ui.add_enabled(
            badge != LevelBadge::Locked,
            egui::Button::new(text).min_size(egui::vec2(360.0, 32.0)),
        )
        .clicked()
    }
}

impl Screen for LevelSelectScreen {
    fn name(&self) -> &'static str {
        "level_select"
    }

    fn update(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            return Transition::Switch(Box::new(MenuScreen::new()));
        }
        match digit_pressed(ctx) {
            Some(level) => Self::start(level, game),
            None => Transition::Stay,
        }
    }

    fn render(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition {
        let mut chosen = None;
        let mut back = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(spacing::SECTION_SPACING * 2.0);
                ui.heading(egui::RichText::new("Select a lead").color(theme::accent()));
                ui.add_space(spacing::SECTION_SPACING);

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for level in game.catalog.iter() {
                        let badge = LevelBadge::for_level(game.progress.state(), level.number);
                        if Self::level_row(ui, level, badge) {
                            chosen = Some(level.number);
                        }
                    }
                    ui.add_space(spacing::SECTION_SPACING);
                    if ui.button("Back").clicked() {
                        back = true;
                    }
                    ui.label(
                        egui::RichText::new("0-8: open level   Esc: back")
                            .small()
                            .color(theme::dim()),
                    );
                });
            });
        });

        if back {
            return Transition::Switch(Box::new(MenuScreen::new()));
        }
        match chosen {
            Some(level) => Self::start(level, game),
            None => Transition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badges_follow_progress() {
        let mut progress = ProgressState::default();
        assert_eq!(LevelBadge::for_level(&progress, 0), LevelBadge::Open);
        assert_eq!(LevelBadge::for_level(&progress, 1), LevelBadge::Open);
        assert_eq!(LevelBadge::for_level(&progress, 2), LevelBadge::Locked);

        progress.complete_level(1);
        assert_eq!(LevelBadge::for_level(&progress, 1), LevelBadge::Solved);
        assert_eq!(LevelBadge::for_level(&progress, 2), LevelBadge::Open);
    }
}
