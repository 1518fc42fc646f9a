use crate::components::notifications::NotificationManager;
use crate::screens::{GameContext, MenuScreen, Screen, Transition};
use crate::settings::AppSettings;
use crate::theme::Theme;
use detective_core::LevelCatalog;
use detective_events::{Event, EventBus, EventListener};
use detective_progress::ProgressStore;
use detective_storage::{DatabaseWorker, GraphDatabase, Neo4jClient};
use eframe::egui;
use std::sync::Arc;

pub struct DetectiveApp {
    screen: Box<dyn Screen>,
    game: GameContext,
    event_bus: EventBus,
    settings: AppSettings,
    theme: Theme,
    needs_initial_theme_apply: bool,
}

impl DetectiveApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let theme = Theme::new(settings.theme, settings.font_size);
        theme.apply(&cc.egui_ctx);
        cc.egui_ctx.set_pixels_per_point(settings.ui_scale);
        // Ctrl +/- zooms the case graph, not the whole UI.
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

        let event_bus = EventBus::new();
        let mut notifications = NotificationManager::new(settings.notifications.enabled);
        let worker = match start_worker(&settings, event_bus.clone()) {
            Ok(worker) => Some(worker),
            Err(e) => {
                tracing::error!("Database unavailable: {:#}", e);
                notifications.error(format!("Database unavailable: {e}"));
                None
            }
        };

        let game = GameContext {
            catalog: LevelCatalog::builtin(),
            progress: ProgressStore::open(settings.progress_file.clone()),
            worker,
            events: event_bus.clone(),
            notifications,
            graph_config: settings.graph.view_config(),
            announce_completions: settings.notifications.show_level_completed,
        };

        Self {
            screen: Box::new(MenuScreen::new()),
            game,
            event_bus,
            settings,
            theme,
            needs_initial_theme_apply: true,
        }
    }

    fn apply_transition(&mut self, ctx: &egui::Context, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Switch(next) => {
                tracing::debug!(from = self.screen.name(), to = next.name(), "Switching screen");
                self.screen = next;
            }
            Transition::Quit => {
                tracing::info!("Closing the game");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

/// Opens the shared connection and proves it answers before any level asks for data.
fn start_worker(settings: &AppSettings, bus: EventBus) -> anyhow::Result<DatabaseWorker> {
    let client = Neo4jClient::connect(settings.database.clone())?;
    let db: Arc<dyn GraphDatabase> = Arc::new(client);
    Ok(DatabaseWorker::connect(db, bus)?)
}

impl eframe::App for DetectiveApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(worker) = self.game.worker.as_mut() {
            worker.shutdown();
        }
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.needs_initial_theme_apply {
            self.theme.apply(ctx);
            self.needs_initial_theme_apply = false;
        }

        let bus = self.event_bus.clone();
        bus.dispatch_to(self);

        let transition = self.screen.update(ctx, &mut self.game);
        let transition = if transition.is_stay() {
            self.screen.render(ctx, &mut self.game)
        } else {
            transition
        };
        self.apply_transition(ctx, transition);

        self.game.notifications.render(ctx);
    }
}

impl EventListener for DetectiveApp {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::LevelCompleted { level } => {
                tracing::info!(level, "Level solved");
                if self.game.announce_completions {
                    self.game.notifications.success(format!("Level {level} solved"));
                }
            }
            _ => self.screen.handle_event(event, &mut self.game),
        }
    }
}
