use crate::components::details_panel;
use crate::theme::{self, radius, to_egui_color};
use detective_graph::{
    CanvasInput, DrawPrimitive, GraphView, Key, Modifiers, PointerButton, Rect, Vec2, draw_list,
};
use eframe::egui::{self, Stroke};

/// What the canvas has to show for the current level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphStatus {
    Loading,
    Ready,
    Failed(String),
    Offline,
}

pub const LOADING_TEXT: &str = "Loading case graph…";

pub fn to_point(pos: egui::Pos2) -> Vec2 {
    Vec2::new(pos.x, pos.y)
}

pub fn to_pos2(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

pub fn to_rect(rect: egui::Rect) -> Rect {
    Rect::from_min_max(to_point(rect.min), to_point(rect.max))
}

/// Feeds egui input to the view's interaction controller and paints its draw list.
#[derive(Debug, Default)]
pub struct GraphCanvas {
    /// A primary press started on the canvas and has not been released yet.
    pressed: bool,
    /// Pixel scrolling not yet worth a whole zoom step.
    scroll_remainder: f32,
}

impl GraphCanvas {
    const POINTS_PER_TICK: f32 = 50.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &mut GraphView, status: &GraphStatus) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        view.set_rect(to_rect(rect));

        match status {
            GraphStatus::Loading => return placeholder(ui, rect, LOADING_TEXT),
            GraphStatus::Failed(message) => {
                return placeholder(ui, rect, &format!("Case graph unavailable: {message}"));
            }
            GraphStatus::Offline => {
                return placeholder(ui, rect, "No database connection");
            }
            GraphStatus::Ready => {}
        }

        if view.controller().has_selection()
            && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Tab))
        {
            view.close_details();
        }

        let accepts_press = response.contains_pointer();
        let hover = ui.input(|i| i.pointer.hover_pos());
        let events = ui.input(|i| i.events.clone());
        let mut changed = false;
        for event in &events {
            if let Some(input) = self.translate(event, accepts_press, hover) {
                changed |= view.handle_input(input);
            }
        }
        if changed {
            ui.ctx().request_repaint();
        }

        paint(&ui.painter_at(rect), &draw_list(view));
        if let Some(panel) = view.details_panel() {
            details_panel::show(ui.ctx(), &panel, rect);
        }
    }

    /// One egui event as canvas input, if the canvas cares about it.
    pub fn translate(
        &mut self,
        event: &egui::Event,
        accepts_press: bool,
        hover: Option<egui::Pos2>,
    ) -> Option<CanvasInput> {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let button = map_button(*button)?;
                let pos = to_point(*pos);
                if *pressed {
                    if !accepts_press {
                        return None;
                    }
                    if button == PointerButton::Primary {
                        self.pressed = true;
                    }
                    Some(CanvasInput::PointerDown { pos, button })
                } else {
                    if button == PointerButton::Primary {
                        if !self.pressed {
                            return None;
                        }
                        self.pressed = false;
                    }
                    Some(CanvasInput::PointerUp { pos, button })
                }
            }
            egui::Event::PointerMoved(pos) => Some(CanvasInput::PointerMove {
                pos: to_point(*pos),
            }),
            egui::Event::PointerGone => Some(CanvasInput::PointerLeft),
            egui::Event::MouseWheel { unit, delta, .. } => {
                let ticks = self.scroll_ticks(*unit, delta.y);
                if ticks == 0 {
                    return None;
                }
                Some(CanvasInput::Scroll {
                    pos: to_point(hover?),
                    ticks,
                })
            }
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => {
                let key = match key {
                    egui::Key::Plus => Key::Plus,
                    egui::Key::Equals => Key::Equals,
                    egui::Key::Minus => Key::Minus,
                    _ => return None,
                };
                Some(CanvasInput::Key {
                    key,
                    modifiers: Modifiers {
                        ctrl: modifiers.ctrl || modifiers.command,
                        shift: modifiers.shift,
                    },
                })
            }
            _ => None,
        }
    }

    fn scroll_ticks(&mut self, unit: egui::MouseWheelUnit, dy: f32) -> i32 {
        match unit {
            egui::MouseWheelUnit::Line | egui::MouseWheelUnit::Page => {
                if dy > 0.0 {
                    1
                } else if dy < 0.0 {
                    -1
                } else {
                    0
                }
            }
            egui::MouseWheelUnit::Point => {
                self.scroll_remainder += dy;
                let ticks = (self.scroll_remainder / Self::POINTS_PER_TICK).trunc();
                self.scroll_remainder -= ticks * Self::POINTS_PER_TICK;
                ticks as i32
            }
        }
    }
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn placeholder(ui: &egui::Ui, rect: egui::Rect, text: &str) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, radius::SMALL, ui.visuals().extreme_bg_color);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(16.0),
        theme::dim(),
    );
}

pub fn paint(painter: &egui::Painter, primitives: &[DrawPrimitive]) {
    for primitive in primitives {
        match primitive {
            DrawPrimitive::Background { rect, fill, border } => {
                let rect = egui::Rect::from_min_max(to_pos2(rect.min), to_pos2(rect.max));
                painter.rect_filled(rect, radius::SMALL, to_egui_color(*fill));
                painter.rect_stroke(
                    rect,
                    radius::SMALL,
                    Stroke::new(1.0, to_egui_color(*border)),
                    egui::StrokeKind::Inside,
                );
            }
            DrawPrimitive::Line {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_pos2(*from), to_pos2(*to)],
                    Stroke::new(*width, to_egui_color(*color)),
                );
            }
            DrawPrimitive::Arrow {
                tip,
                left,
                right,
                color,
            } => {
                painter.add(egui::Shape::convex_polygon(
                    vec![to_pos2(*tip), to_pos2(*left), to_pos2(*right)],
                    to_egui_color(*color),
                    Stroke::NONE,
                ));
            }
            DrawPrimitive::Circle {
                center,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                painter.circle(
                    to_pos2(*center),
                    *radius,
                    to_egui_color(*fill),
                    Stroke::new(*stroke_width, to_egui_color(*stroke)),
                );
            }
            DrawPrimitive::Text { pos, text, color } => {
                painter.text(
                    to_pos2(*pos),
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(12.0),
                    to_egui_color(*color),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::{GraphNode, NodeId, Properties};
    use detective_graph::{GraphModel, GraphViewConfig};

    fn press(x: f32, y: f32, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_press_outside_canvas_is_ignored_with_its_release() {
        let mut canvas = GraphCanvas::new();
        assert_eq!(canvas.translate(&press(5.0, 5.0, true), false, None), None);
        assert_eq!(canvas.translate(&press(5.0, 5.0, false), false, None), None);
    }

    #[test]
    fn test_press_and_release_on_canvas() {
        let mut canvas = GraphCanvas::new();
        assert_eq!(
            canvas.translate(&press(10.0, 20.0, true), true, None),
            Some(CanvasInput::PointerDown {
                pos: Vec2::new(10.0, 20.0),
                button: PointerButton::Primary
            })
        );
        // Released after leaving the canvas still ends the gesture.
        assert_eq!(
            canvas.translate(&press(900.0, 20.0, false), false, None),
            Some(CanvasInput::PointerUp {
                pos: Vec2::new(900.0, 20.0),
                button: PointerButton::Primary
            })
        );
    }

    #[test]
    fn test_line_scroll_is_one_tick_per_event() {
        let mut canvas = GraphCanvas::new();
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Line, 3.0), 1);
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Line, -0.5), -1);
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Line, 0.0), 0);
    }

    #[test]
    fn test_pixel_scroll_accumulates() {
        let mut canvas = GraphCanvas::new();
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Point, 30.0), 0);
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Point, 30.0), 1);
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Point, -20.0), 0);
        assert_eq!(canvas.scroll_ticks(egui::MouseWheelUnit::Point, -100.0), -2);
    }

    #[test]
    fn test_pointer_gone_leaves_canvas() {
        let mut canvas = GraphCanvas::new();
        assert_eq!(
            canvas.translate(&egui::Event::PointerGone, false, None),
            Some(CanvasInput::PointerLeft)
        );
    }

    #[test]
    fn test_tab_clears_selection_left_by_a_drag() {
        let rect = Rect::from_min_max(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let mut view = GraphView::new(GraphViewConfig::default(), rect);
        let node = |id: &str| {
            GraphNode::new(NodeId::new(id), vec!["Suspect".into()], Properties::new())
        };
        view.set_graph(1, GraphModel::from_parts(vec![node("a"), node("b")], Vec::new()));

        let start = view.viewport().to_screen(view.positions()[&NodeId::new("a")]);
        let end = start + Vec2::new(20.0, 0.0);
        view.handle_input(CanvasInput::PointerDown {
            pos: start,
            button: PointerButton::Primary,
        });
        view.handle_input(CanvasInput::PointerMove { pos: end });
        view.handle_input(CanvasInput::PointerUp {
            pos: end,
            button: PointerButton::Primary,
        });
        assert!(view.controller().open_details().is_none());
        assert_eq!(view.controller().selected_node(), Some(&NodeId::new("a")));

        let ctx = egui::Context::default();
        let mut canvas = GraphCanvas::new();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events: vec![egui::Event::Key {
                key: egui::Key::Tab,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                canvas.show(ui, &mut view, &GraphStatus::Ready);
            });
        });

        assert!(view.controller().selected_node().is_none());
        assert!(!view.controller().has_selection());
    }

    #[test]
    fn test_rect_conversion() {
        let rect = to_rect(egui::Rect::from_min_max(
            egui::pos2(1.0, 2.0),
            egui::pos2(11.0, 22.0),
        ));
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 20.0);
    }
}
