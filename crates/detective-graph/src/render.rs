//! Screen-space draw list for the case graph.
//!
//! The GUI paints these primitives as-is; nothing here depends on a toolkit.

use crate::geometry::{Rect, Vec2};
use crate::style::{Color, node_fill};
use crate::view::GraphView;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Background {
        rect: Rect,
        fill: Color,
        border: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    /// Filled arrowhead triangle.
    Arrow {
        tip: Vec2,
        left: Vec2,
        right: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
    },
    /// Text centered on `pos`.
    Text {
        pos: Vec2,
        text: String,
        color: Color,
    },
}

/// Arrowhead whose tip sits at `tip`, pointing along `from -> tip`.
pub fn arrow_head(from: Vec2, tip: Vec2, length: f32, half_angle: f32) -> (Vec2, Vec2) {
    let angle = (tip - from).angle();
    let left = Vec2::new(
        tip.x - length * (angle - half_angle).cos(),
        tip.y - length * (angle - half_angle).sin(),
    );
    let right = Vec2::new(
        tip.x - length * (angle + half_angle).cos(),
        tip.y - length * (angle + half_angle).sin(),
    );
    (left, right)
}

/// Edges first so nodes cover them, then nodes, then labels on top of each.
pub fn draw_list(view: &GraphView) -> Vec<DrawPrimitive> {
    let model = view.model();
    if !view.layout_computed() || model.is_empty() {
        return Vec::new();
    }
    let viewport = view.viewport();
    let positions = view.positions();
    let style = view.style();
    let controller = view.controller();
    let zoom = viewport.zoom();
    let radius = viewport.scale(view.hit_tester().node_radius);

    let mut out = vec![DrawPrimitive::Background {
        rect: viewport.rect(),
        fill: style.background,
        border: style.border,
    }];

    for edge in model.edges() {
        let (Some(&a), Some(&b)) = (positions.get(&edge.source), positions.get(&edge.target))
        else {
            continue;
        };
        let start = viewport.to_screen(a);
        let end = viewport.to_screen(b);
        let color = if controller.selected_edge() == Some(&edge.id()) {
            style.selected
        } else {
            style.edge_color
        };
        out.push(DrawPrimitive::Line {
            from: start,
            to: end,
            color,
            width: style.edge_width,
        });

        // Tip rests on the target's rim rather than its hidden center.
        let span = end - start;
        let length = span.length();
        if length > radius {
            let tip = end - span * (radius / length);
            let (left, right) = arrow_head(start, tip, style.arrow_length, style.arrow_angle);
            out.push(DrawPrimitive::Arrow {
                tip,
                left,
                right,
                color,
            });
        }

        if zoom >= style.edge_label_zoom {
            out.push(DrawPrimitive::Text {
                pos: start.midpoint(end),
                text: edge.rel_type.clone(),
                color: style.label,
            });
        }
    }

    for node in model.nodes() {
        let Some(&pos) = positions.get(&node.id) else {
            continue;
        };
        let center = viewport.to_screen(pos);
        let fill = if controller.selected_node() == Some(&node.id) {
            style.selected
        } else if view.highlighted().contains(&node.id) {
            style.highlighted
        } else {
            node_fill(node.primary_label())
        };
        out.push(DrawPrimitive::Circle {
            center,
            radius,
            fill,
            stroke: style.node_stroke,
            stroke_width: style.node_stroke_width,
        });
        if zoom > style.node_label_zoom {
            out.push(DrawPrimitive::Text {
                pos: Vec2::new(center.x, center.y + radius + style.node_label_gap),
                text: node.name.clone(),
                color: style.label,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphModel;
    use crate::style::palette;
    use crate::view::GraphViewConfig;
    use detective_core::{GraphEdge, GraphNode, NodeId, Properties, PropertyValue};

    fn view() -> GraphView {
        let mut props = Properties::new();
        props.insert("name".into(), PropertyValue::from("Alice"));
        let model = GraphModel::from_parts(
            vec![
                GraphNode::new(NodeId::new("a"), vec!["Suspect".into()], props),
                GraphNode::new(NodeId::new("h"), vec!["Location".into()], Properties::new()),
            ],
            vec![GraphEdge {
                source: NodeId::new("a"),
                target: NodeId::new("h"),
                rel_type: "WAS_AT".into(),
                properties: Properties::new(),
            }],
        );
        let mut view = GraphView::new(
            GraphViewConfig::default(),
            Rect::from_pos_size(Vec2::ZERO, Vec2::new(800.0, 600.0)),
        );
        view.set_graph(2, model);
        view
    }

    fn texts(list: &[DrawPrimitive]) -> Vec<&str> {
        list.iter()
            .filter_map(|p| match p {
                DrawPrimitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_view_draws_nothing() {
        assert!(draw_list(&GraphView::default()).is_empty());
    }

    #[test]
    fn test_draw_order_and_labels_at_default_zoom() {
        let list = draw_list(&view());
        assert!(matches!(list[0], DrawPrimitive::Background { .. }));
        assert!(matches!(list[1], DrawPrimitive::Line { .. }));
        assert!(matches!(list[2], DrawPrimitive::Arrow { .. }));
        // Node names are shown, relationship types are not until zoom 1.5.
        assert_eq!(texts(&list), vec!["Alice", "Location"]);
        let fills: Vec<Color> = list
            .iter()
            .filter_map(|p| match p {
                DrawPrimitive::Circle { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![palette::ACCENT, Color::rgb(100, 150, 200)]);
    }

    #[test]
    fn test_zoom_controls_labels() {
        let mut v = view();
        v.handle_input(crate::interaction::CanvasInput::Scroll {
            pos: Vec2::new(400.0, 300.0),
            ticks: 5,
        });
        assert!(texts(&draw_list(&v)).contains(&"WAS_AT"));

        v.handle_input(crate::interaction::CanvasInput::Scroll {
            pos: Vec2::new(400.0, 300.0),
            ticks: -20,
        });
        assert!(texts(&draw_list(&v)).is_empty());
    }

    #[test]
    fn test_arrow_head_geometry() {
        let (left, right) = arrow_head(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            10.0,
            std::f32::consts::FRAC_PI_6,
        );
        assert!((left.x - (10.0 - 10.0 * 30f32.to_radians().cos())).abs() < 1e-4);
        assert!((left.y - 5.0).abs() < 1e-4);
        assert!((right.y + 5.0).abs() < 1e-4);
    }
}
