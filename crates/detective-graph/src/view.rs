use crate::details::{Details, DetailsPanel, EDGE_PANEL_OFFSET};
use crate::geometry::Rect;
use crate::graph::GraphModel;
use crate::hit_tester::HitTester;
use crate::interaction::{CanvasContext, CanvasInput, ClickTarget, InteractionController};
use crate::layout::{LayoutConfig, Layouter, Positions, SpringLayouter};
use crate::style::GraphStyle;
use crate::viewport::Viewport;
use detective_core::NodeId;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphViewConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub node_radius: f32,
    pub edge_thickness: f32,
    pub edge_tolerance: f32,
    pub layout: LayoutConfig,
}

impl Default for GraphViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: Viewport::DEFAULT_MIN_ZOOM,
            max_zoom: Viewport::DEFAULT_MAX_ZOOM,
            node_radius: 15.0,
            edge_thickness: 2.0,
            edge_tolerance: 2.0,
            layout: LayoutConfig::default(),
        }
    }
}

/// Everything the canvas needs for one level: graph, layout, viewport and interaction.
///
/// Positions are computed once per level and afterwards only change when the
/// player drags a node.
#[derive(Debug, Clone)]
pub struct GraphView {
    model: GraphModel,
    positions: Positions,
    viewport: Viewport,
    hit_tester: HitTester,
    controller: InteractionController,
    layouter: SpringLayouter,
    style: GraphStyle,
    level: Option<u32>,
    layout_computed: bool,
    highlighted: HashSet<NodeId>,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(GraphViewConfig::default(), Rect::default())
    }
}

impl GraphView {
    pub fn new(config: GraphViewConfig, rect: Rect) -> Self {
        Self {
            model: GraphModel::new(),
            positions: Positions::new(),
            viewport: Viewport::with_zoom_range(rect, config.min_zoom, config.max_zoom),
            hit_tester: HitTester::new(
                config.node_radius,
                config.edge_thickness,
                config.edge_tolerance,
            ),
            controller: InteractionController::new(),
            layouter: SpringLayouter::new(config.layout),
            style: GraphStyle::default(),
            level: None,
            layout_computed: false,
            highlighted: HashSet::new(),
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    pub fn level(&self) -> Option<u32> {
        self.level
    }

    pub fn layout_computed(&self) -> bool {
        self.layout_computed
    }

    pub fn highlighted(&self) -> &HashSet<NodeId> {
        &self.highlighted
    }

    /// True when `level` is showing with a finished layout, so reloading it is a no-op.
    pub fn is_loaded_for(&self, level: u32) -> bool {
        self.level == Some(level) && self.layout_computed
    }

    /// Replace the graph wholesale and lay it out in the current canvas rectangle.
    pub fn set_graph(&mut self, level: u32, model: GraphModel) {
        tracing::info!(
            level,
            nodes = model.node_count(),
            edges = model.edge_count(),
            "Showing case graph"
        );
        self.model = model;
        self.level = Some(level);
        self.controller.reset();
        self.viewport.reset();
        self.highlighted.clear();
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.model.clear();
        self.positions.clear();
        self.controller.reset();
        self.highlighted.clear();
        self.level = None;
        self.layout_computed = false;
    }

    /// Recompute positions from scratch, discarding any dragged positions.
    pub fn relayout(&mut self) {
        self.positions = self.layouter.compute(&self.model, self.viewport.rect());
        self.layout_computed = true;
    }

    /// Track the canvas rectangle; positions are left alone once computed.
    pub fn set_rect(&mut self, rect: Rect) {
        self.viewport.set_rect(rect);
        if !self.layout_computed && self.level.is_some() {
            self.relayout();
        }
    }

    pub fn highlight_nodes(&mut self, nodes: HashSet<NodeId>) {
        self.highlighted = nodes;
    }

    pub fn handle_input(&mut self, input: CanvasInput) -> bool {
        let mut ctx = CanvasContext {
            model: &self.model,
            positions: &mut self.positions,
            viewport: &mut self.viewport,
            hit_tester: &self.hit_tester,
        };
        self.controller.handle(input, &mut ctx)
    }

    pub fn close_details(&mut self) -> bool {
        self.controller.close_details()
    }

    /// The open details panel, positioned under its node or edge.
    pub fn details_panel(&self) -> Option<DetailsPanel> {
        match self.controller.open_details()? {
            ClickTarget::Node(id) => {
                let details = Details::for_node(&self.model, id)?;
                let center = self.viewport.to_screen(*self.positions.get(id)?);
                let mut anchor = center;
                anchor.y += self.viewport.scale(self.hit_tester.node_radius);
                Some(DetailsPanel { details, anchor })
            }
            ClickTarget::Edge(id) => {
                let details = Details::for_edge(&self.model, id)?;
                let a = self.viewport.to_screen(*self.positions.get(&id.source)?);
                let b = self.viewport.to_screen(*self.positions.get(&id.target)?);
                let mut anchor = a.midpoint(b);
                anchor.y += EDGE_PANEL_OFFSET;
                Some(DetailsPanel { details, anchor })
            }
        }
    }
}
