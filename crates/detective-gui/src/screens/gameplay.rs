use super::{GameContext, LevelSelectScreen, Screen, Transition};
use crate::components::graph_canvas::{GraphCanvas, GraphStatus, to_rect};
use crate::theme::{self, spacing};
use detective_core::{Level, NodeId, PropertyValue, Record};
use detective_events::{Event, QueryOutcome};
use detective_graph::{GraphModel, GraphView, Rect};
use detective_storage::{MISMATCH_MESSAGE, QueryError};
use eframe::egui;
use std::collections::HashSet;
use std::time::Duration;

/// Records listed under the editor before the rest are summarized.
pub const PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameplayState {
    QueryInput,
    QueryResult { success: bool, message: String },
}

pub fn outcome_message(level: u32, outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Match { .. } => format!("Level {level} completed."),
        QueryOutcome::Mismatch { .. } => MISMATCH_MESSAGE.to_string(),
        QueryOutcome::Rejected { message } | QueryOutcome::Failed { message } => message.clone(),
    }
}

pub fn preview_lines(records: &[Record]) -> Vec<String> {
    let mut lines: Vec<String> = records
        .iter()
        .take(PREVIEW_LIMIT)
        .map(Record::to_string)
        .collect();
    if records.len() > PREVIEW_LIMIT {
        lines.push(format!(
            "... and {} more records",
            records.len() - PREVIEW_LIMIT
        ));
    }
    lines
}

/// Nodes whose display name appears as a string anywhere in the records.
pub fn nodes_named_in(model: &GraphModel, records: &[Record]) -> HashSet<NodeId> {
    fn collect<'a>(value: &'a PropertyValue, out: &mut HashSet<&'a str>) {
        match value {
            PropertyValue::String(s) => {
                out.insert(s.as_str());
            }
            PropertyValue::List(items) => items.iter().for_each(|v| collect(v, out)),
            PropertyValue::Map(map) => map.values().for_each(|v| collect(v, out)),
            _ => {}
        }
    }

    let mut names = HashSet::new();
    for record in records {
        for (_, value) in record.columns() {
            collect(value, &mut names);
        }
    }
    model
        .nodes()
        .iter()
        .filter(|node| names.contains(node.name.as_str()))
        .map(|node| node.id.clone())
        .collect()
}

pub struct GameplayScreen {
    level: Level,
    state: GameplayState,
    query: String,
    last_records: Vec<Record>,
    evaluating: bool,
    view: GraphView,
    status: GraphStatus,
    /// Fetched graph waiting for the canvas to learn its size.
    pending_graph: Option<GraphModel>,
    canvas: GraphCanvas,
}

impl GameplayScreen {
    pub fn new(level: Level, game: &mut GameContext) -> Self {
        let status = game.request_graph(level.number);
        Self {
            view: GraphView::new(game.graph_config, Rect::default()),
            level,
            state: GameplayState::QueryInput,
            query: String::new(),
            last_records: Vec::new(),
            evaluating: false,
            status,
            pending_graph: None,
            canvas: GraphCanvas::new(),
        }
    }

    pub fn state(&self) -> &GameplayState {
        &self.state
    }

    pub fn status(&self) -> &GraphStatus {
        &self.status
    }

    fn back() -> Transition {
        Transition::Switch(Box::new(LevelSelectScreen::new()))
    }

    pub fn submit(&mut self, game: &mut GameContext) {
        if self.evaluating {
            return;
        }
        if self.query.trim().is_empty() {
            self.state = GameplayState::QueryResult {
                success: false,
                message: QueryError::Empty.to_string(),
            };
            return;
        }
        if game.request_evaluation(
            self.level.number,
            self.query.trim(),
            &self.level.ground_truth_query,
        ) {
            self.evaluating = true;
        } else {
            self.state = GameplayState::QueryResult {
                success: false,
                message: "No database connection.".to_string(),
            };
        }
    }

    /// Leave the result view. Success goes back to level select; failure keeps the query.
    fn continue_from_result(&mut self) -> Transition {
        match &self.state {
            GameplayState::QueryResult { success: true, .. } => Self::back(),
            GameplayState::QueryResult { .. } => {
                self.state = GameplayState::QueryInput;
                Transition::Stay
            }
            GameplayState::QueryInput => Transition::Stay,
        }
    }

    fn on_evaluated(&mut self, outcome: &QueryOutcome, game: &mut GameContext) {
        self.evaluating = false;
        if outcome.counts_as_attempt() {
            game.record_attempt(outcome.is_match());
        }
        if outcome.is_match() {
            game.complete_level(self.level.number);
        }
        if !outcome.records().is_empty() || outcome.is_match() {
            self.last_records = outcome.records().to_vec();
            let named = nodes_named_in(self.view.model(), &self.last_records);
            self.view.highlight_nodes(named);
        }
        self.state = GameplayState::QueryResult {
            success: outcome.is_match(),
            message: outcome_message(self.level.number, outcome),
        };
    }

    fn show_case_panel(&mut self, ui: &mut egui::Ui, game: &mut GameContext) -> Transition {
        let mut transition = Transition::Stay;
        let title = if self.level.is_tutorial() {
            format!("Tutorial: {}", self.level.title)
        } else {
            format!("Level {}: {}", self.level.number, self.level.title)
        };
        ui.heading(egui::RichText::new(title).color(theme::accent()));
        ui.add_space(spacing::ITEM_SPACING);
        theme::card(ui, |ui| {
            ui.label(&self.level.lead);
        });
        if let Some(hint) = &self.level.hint {
            egui::CollapsingHeader::new("Hint")
                .id_salt("level_hint")
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(hint).italics().color(theme::dim()));
                });
        }
        ui.add_space(spacing::ITEM_SPACING);

        match self.state.clone() {
            GameplayState::QueryInput => {
                ui.add_enabled(
                    !self.evaluating,
                    egui::TextEdit::multiline(&mut self.query)
                        .code_editor()
                        .desired_rows(6)
                        .desired_width(f32::INFINITY)
                        .hint_text("MATCH (s:Suspect) RETURN s.name AS suspect"),
                );
                ui.horizontal(|ui| {
                    let run = theme::primary_button(ui, "Run query");
                    if ui.add_enabled(!self.evaluating, run).clicked() {
                        self.submit(game);
                    }
                    if ui.button("Back").clicked() {
                        transition = Self::back();
                    }
                    if self.evaluating {
                        ui.spinner();
                    }
                });
                ui.label(
                    egui::RichText::new("Enter: run   Shift+Enter: new line   Esc: back")
                        .small()
                        .color(theme::dim()),
                );
            }
            GameplayState::QueryResult { success, message } => {
                if success {
                    theme::success_box(ui, &message);
                } else {
                    theme::error_box(ui, &message);
                }
                if ui.button("Continue").clicked() {
                    transition = self.continue_from_result();
                }
            }
        }

        if !self.last_records.is_empty() {
            ui.add_space(spacing::SECTION_SPACING);
            theme::labeled_separator(ui, "Last results");
            for line in preview_lines(&self.last_records) {
                ui.label(egui::RichText::new(line).monospace());
            }
        }
        transition
    }
}

impl Screen for GameplayScreen {
    fn name(&self) -> &'static str {
        "gameplay"
    }

    fn handle_event(&mut self, event: &Event, game: &mut GameContext) {
        match event {
            Event::GraphFetched {
                level,
                nodes,
                edges,
            } if *level == self.level.number => {
                if self.view.is_loaded_for(*level) {
                    return;
                }
                self.pending_graph = Some(GraphModel::from_parts(nodes.clone(), edges.clone()));
                self.status = GraphStatus::Ready;
            }
            Event::GraphFetchFailed { level, message } if *level == self.level.number => {
                game.notifications
                    .error(format!("Could not load the case graph: {message}"));
                self.status = GraphStatus::Failed(message.clone());
            }
            Event::QueryEvaluated { level, outcome, .. } if *level == self.level.number => {
                self.on_evaluated(outcome, game);
            }
            _ => {}
        }
    }

    fn update(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition {
        if self.evaluating || self.status == GraphStatus::Loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        match self.state {
            GameplayState::QueryInput => {
                if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                    return Self::back();
                }
                if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)) {
                    self.submit(game);
                }
                Transition::Stay
            }
            GameplayState::QueryResult { .. } => {
                let pressed = ctx.input_mut(|i| {
                    i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
                        || i.consume_key(egui::Modifiers::NONE, egui::Key::Escape)
                });
                if pressed {
                    self.continue_from_result()
                } else {
                    Transition::Stay
                }
            }
        }
    }

    fn render(&mut self, ctx: &egui::Context, game: &mut GameContext) -> Transition {
        let mut transition = Transition::Stay;
        egui::SidePanel::left("case_panel")
            .resizable(true)
            .default_width(420.0)
            .min_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    transition = self.show_case_panel(ui, game);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(model) = self.pending_graph.take() {
                self.view.set_rect(to_rect(ui.available_rect_before_wrap()));
                self.view.set_graph(self.level.number, model);
            }
            self.canvas.show(ui, &mut self.view, &self.status);
        });
        transition
    }
}
