use crate::geometry::{Rect, Vec2};
use crate::graph::GraphModel;
use crate::layout::Positions;
use crate::viewport::Viewport;
use detective_core::{EdgeId, NodeId};

/// Result of a hit test at a given screen position.
///
/// Priority order: Node > Edge > None
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitResult {
    None,
    Node(NodeId),
    Edge(EdgeId),
}

/// Resolves screen points to nodes (circles) and edges (line segments).
///
/// Node and edge geometry is forward-transformed through the viewport and
/// compared against the raw pointer position. When several candidates match,
/// the one added to the model last wins, which is the one drawn on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    /// Node radius in logical units; scaled by zoom on screen.
    pub node_radius: f32,
    /// Drawn edge width in screen pixels.
    pub edge_thickness: f32,
    /// Extra slack around an edge, in screen pixels.
    pub edge_tolerance: f32,
}

impl Default for HitTester {
    fn default() -> Self {
        Self {
            node_radius: 15.0,
            edge_thickness: 2.0,
            edge_tolerance: 2.0,
        }
    }
}

impl HitTester {
    pub fn new(node_radius: f32, edge_thickness: f32, edge_tolerance: f32) -> Self {
        Self {
            node_radius,
            edge_thickness,
            edge_tolerance,
        }
    }

    /// Maximum perpendicular distance from an edge that still counts as a hit.
    pub fn edge_margin(&self) -> f32 {
        self.edge_thickness / 2.0 + self.edge_tolerance
    }

    pub fn node_at(
        &self,
        model: &GraphModel,
        positions: &Positions,
        viewport: &Viewport,
        point: Vec2,
    ) -> Option<NodeId> {
        let radius = viewport.scale(self.node_radius);
        model
            .nodes()
            .iter()
            .rev()
            .find(|node| {
                positions
                    .get(&node.id)
                    .is_some_and(|&pos| viewport.to_screen(pos).distance(point) <= radius)
            })
            .map(|node| node.id.clone())
    }

    pub fn edge_at(
        &self,
        model: &GraphModel,
        positions: &Positions,
        viewport: &Viewport,
        point: Vec2,
    ) -> Option<EdgeId> {
        let margin = self.edge_margin();
        model
            .edges()
            .iter()
            .rev()
            .find(|edge| {
                match (positions.get(&edge.source), positions.get(&edge.target)) {
                    (Some(&a), Some(&b)) => point_near_segment(
                        point,
                        viewport.to_screen(a),
                        viewport.to_screen(b),
                        margin,
                    ),
                    _ => false,
                }
            })
            .map(|edge| edge.id())
    }

    /// Nodes are checked before edges.
    pub fn hit_test(
        &self,
        model: &GraphModel,
        positions: &Positions,
        viewport: &Viewport,
        point: Vec2,
    ) -> HitResult {
        if let Some(node) = self.node_at(model, positions, viewport, point) {
            return HitResult::Node(node);
        }
        if let Some(edge) = self.edge_at(model, positions, viewport, point) {
            return HitResult::Edge(edge);
        }
        HitResult::None
    }
}

/// Whether `point` lies within `margin` of the finite segment `a`-`b`.
///
/// Cheap bounding-box rejection runs first; a zero-length segment degrades to
/// a point-distance check.
pub fn point_near_segment(point: Vec2, a: Vec2, b: Vec2, margin: f32) -> bool {
    if !Rect::from_points(a, b).expand(margin).contains(point) {
        return false;
    }
    distance_to_segment(point, a, b) <= margin
}

pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let ap = point - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}
