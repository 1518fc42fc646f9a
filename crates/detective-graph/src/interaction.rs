use crate::geometry::Vec2;
use crate::graph::GraphModel;
use crate::hit_tester::{HitResult, HitTester};
use crate::layout::Positions;
use crate::viewport::{Viewport, ZoomDirection};
use detective_core::{EdgeId, NodeId};

/// Pointer travel, in screen pixels, beyond which a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Closes the details panel.
    Tab,
    Plus,
    Equals,
    Minus,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Discrete input delivered to the canvas, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasInput {
    PointerDown { pos: Vec2, button: PointerButton },
    PointerMove { pos: Vec2 },
    PointerUp { pos: Vec2, button: PointerButton },
    /// Positive ticks zoom in.
    Scroll { pos: Vec2, ticks: i32 },
    Key { key: Key, modifiers: Modifiers },
    /// The pointer left the window.
    PointerLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Pressed on an edge; a release without dragging opens its details.
    PendingClick { target: ClickTarget, start: Vec2 },
    /// Pressed on a node. `offset` is the node's screen position minus the
    /// pointer, so the node keeps its grip point instead of snapping.
    DraggingNode {
        node: NodeId,
        offset: Vec2,
        start: Vec2,
    },
    Panning { start: Vec2, last: Vec2 },
}

impl InteractionState {
    fn press_origin(&self) -> Option<Vec2> {
        match self {
            InteractionState::Idle => None,
            InteractionState::PendingClick { start, .. }
            | InteractionState::DraggingNode { start, .. }
            | InteractionState::Panning { start, .. } => Some(*start),
        }
    }
}

/// Mutable canvas state the controller acts on for one input event.
pub struct CanvasContext<'a> {
    pub model: &'a GraphModel,
    pub positions: &'a mut Positions,
    pub viewport: &'a mut Viewport,
    pub hit_tester: &'a HitTester,
}

/// Click-vs-drag state machine for the graph canvas.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    /// Set once the current press has travelled past [`DRAG_THRESHOLD`].
    dragged: bool,
    selected_node: Option<NodeId>,
    selected_edge: Option<EdgeId>,
    open_details: Option<ClickTarget>,
    hover: Option<Vec2>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.selected_node.as_ref()
    }

    pub fn selected_edge(&self) -> Option<&EdgeId> {
        self.selected_edge.as_ref()
    }

    pub fn open_details(&self) -> Option<&ClickTarget> {
        self.open_details.as_ref()
    }

    /// Forget everything, e.g. when a new level's graph replaces the old one.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A selected node or edge, or an open details panel.
    pub fn has_selection(&self) -> bool {
        self.open_details.is_some() || self.selected_node.is_some() || self.selected_edge.is_some()
    }

    /// Close the details panel and drop any selection. Returns true if anything changed.
    pub fn close_details(&mut self) -> bool {
        let had_selection = self.has_selection();
        self.selected_node = None;
        self.selected_edge = None;
        self.open_details = None;
        had_selection
    }

    /// Returns true when the input was consumed by the canvas.
    pub fn handle(&mut self, input: CanvasInput, ctx: &mut CanvasContext<'_>) -> bool {
        match input {
            CanvasInput::PointerDown {
                pos,
                button: PointerButton::Primary,
            } => self.pointer_down(pos, ctx),
            CanvasInput::PointerDown { .. } => false,
            CanvasInput::PointerMove { pos } => self.pointer_move(pos, ctx),
            CanvasInput::PointerUp {
                button: PointerButton::Primary,
                ..
            } => self.pointer_up(),
            CanvasInput::PointerUp { .. } => false,
            CanvasInput::Scroll { pos, ticks } => {
                if ticks == 0 || !ctx.viewport.rect().contains(pos) {
                    return false;
                }
                ctx.viewport.scroll(ticks);
                true
            }
            CanvasInput::Key { key, modifiers } => self.key(key, modifiers, ctx),
            CanvasInput::PointerLeft => {
                self.hover = None;
                false
            }
        }
    }

    fn pointer_down(&mut self, pos: Vec2, ctx: &mut CanvasContext<'_>) -> bool {
        self.hover = Some(pos);
        if !ctx.viewport.rect().contains(pos) {
            return false;
        }
        self.dragged = false;

        match ctx
            .hit_tester
            .hit_test(ctx.model, ctx.positions, ctx.viewport, pos)
        {
            HitResult::Node(node) => {
                let node_screen = ctx
                    .positions
                    .get(&node)
                    .map(|&p| ctx.viewport.to_screen(p))
                    .unwrap_or(pos);
                self.selected_node = Some(node.clone());
                self.selected_edge = None;
                self.state = InteractionState::DraggingNode {
                    node,
                    offset: node_screen - pos,
                    start: pos,
                };
            }
            HitResult::Edge(edge) => {
                self.selected_edge = Some(edge.clone());
                self.selected_node = None;
                self.state = InteractionState::PendingClick {
                    target: ClickTarget::Edge(edge),
                    start: pos,
                };
            }
            HitResult::None => {
                self.close_details();
                self.state = InteractionState::Panning {
                    start: pos,
                    last: pos,
                };
            }
        }
        true
    }

    fn pointer_move(&mut self, pos: Vec2, ctx: &mut CanvasContext<'_>) -> bool {
        self.hover = Some(pos);
        if let Some(start) = self.state.press_origin() {
            if pos.distance(start) > DRAG_THRESHOLD {
                self.dragged = true;
            }
        }

        match &mut self.state {
            InteractionState::DraggingNode { node, offset, .. } => {
                let logical = ctx.viewport.to_logical(pos + *offset);
                if let Some(slot) = ctx.positions.get_mut(node) {
                    *slot = logical;
                }
                true
            }
            InteractionState::Panning { last, .. } => {
                ctx.viewport.pan_by(pos - *last);
                *last = pos;
                true
            }
            InteractionState::PendingClick { .. } | InteractionState::Idle => false,
        }
    }

    fn pointer_up(&mut self) -> bool {
        let state = std::mem::take(&mut self.state);
        if !self.dragged {
            match &state {
                InteractionState::DraggingNode { node, .. } => {
                    self.open_details = Some(ClickTarget::Node(node.clone()));
                }
                InteractionState::PendingClick { target, .. } => {
                    self.open_details = Some(target.clone());
                }
                InteractionState::Panning { .. } | InteractionState::Idle => {}
            }
        }
        self.dragged = false;
        state != InteractionState::Idle
    }

    fn key(&mut self, key: Key, modifiers: Modifiers, ctx: &mut CanvasContext<'_>) -> bool {
        if key == Key::Tab {
            return self.close_details();
        }
        let over_canvas = self
            .hover
            .is_some_and(|pos| ctx.viewport.rect().contains(pos));
        if !modifiers.ctrl || !over_canvas {
            return false;
        }
        match key {
            Key::Plus | Key::Equals => ctx.viewport.key_zoom(ZoomDirection::In),
            Key::Minus => ctx.viewport.key_zoom(ZoomDirection::Out),
            Key::Tab | Key::Other => return false,
        }
        true
    }
}
