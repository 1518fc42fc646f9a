//! One boxed screen is active at a time; screens hand over by returning a [`Transition`].

use crate::components::graph_canvas::GraphStatus;
use crate::components::notifications::NotificationManager;
use detective_core::LevelCatalog;
use detective_events::{Event, EventBus};
use detective_graph::GraphViewConfig;
use detective_progress::ProgressStore;
use detective_storage::DatabaseWorker;
use eframe::egui;

pub mod gameplay;
pub mod level_select;
pub mod menu;

pub use gameplay::GameplayScreen;
pub use level_select::LevelSelectScreen;
pub use menu::MenuScreen;

pub enum Transition {
    Stay,
    Switch(Box<dyn Screen>),
    Quit,
}

impl Transition {
    pub fn is_stay(&self) -> bool {
        matches!(self, Transition::Stay)
    }
}

pub trait Screen {
    fn name(&self) -> &'static str;

    /// Results coming back from the database worker.
    fn handle_event(&mut self, _event: &Event, _game: &mut GameContext) {}

    /// Keyboard shortcuts, checked before anything is drawn.
    fn update(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition;

    fn render(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition;
}

/// State shared by every screen for the whole session.
pub struct GameContext {
    pub catalog: LevelCatalog,
    pub progress: ProgressStore,
    pub worker: Option<DatabaseWorker>,
    /// Same bus the worker publishes on; drained by the app every frame.
    pub events: EventBus,
    pub notifications: NotificationManager,
    pub graph_config: GraphViewConfig,
    pub announce_completions: bool,
}

impl GameContext {
    pub fn request_graph(&mut self, level: u32) -> GraphStatus {
        match &self.worker {
            Some(worker) if worker.load_graph(level) => GraphStatus::Loading,
            _ => GraphStatus::Offline,
        }
    }

    /// Returns false when there is no worker to run the query.
    pub fn request_evaluation(&self, level: u32, query: &str, ground_truth: &str) -> bool {
        self.worker.as_ref().is_some_and(|worker| {
            worker.evaluate(level, query.to_string(), ground_truth.to_string())
        })
    }

    pub fn record_attempt(&mut self, correct: bool) {
        if let Err(e) = self.progress.record_attempt(correct) {
            tracing::error!("Failed to save progress: {}", e);
        }
    }

    /// Record the solve and announce it on the bus when it is the first one.
    pub fn complete_level(&mut self, level: u32) {
        match self.progress.complete_level(level) {
            Ok(true) => self.events.publish(Event::LevelCompleted { level }),
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Failed to save progress: {}", e);
                self.notifications.error(format!("Progress not saved: {e}"));
            }
        }
    }
}

/// Level number for a digit key press, if any.
pub fn digit_pressed(ctx: &egui::Context) -> Option<u32> {
    const DIGITS: [egui::Key; 10] = [
        egui::Key::Num0,
        egui::Key::Num1,
        egui::Key::Num2,
        egui::Key::Num3,
        egui::Key::Num4,
        egui::Key::Num5,
        egui::Key::Num6,
        egui::Key::Num7,
        egui::Key::Num8,
        egui::Key::Num9,
    ];
    ctx.input(|i| {
        DIGITS
            .iter()
            .position(|key| i.key_pressed(*key))
            .map(|n| n as u32)
    })
}
