use detective_core::{GraphEdge, GraphNode, NodeId, Properties, PropertyValue};
use detective_graph::{
    CanvasInput, Details, GraphModel, GraphView, GraphViewConfig, PointerButton, Rect, Vec2,
};

fn case_graph() -> GraphModel {
    let named = |name: &str| {
        let mut props = Properties::new();
        props.insert("name".into(), PropertyValue::from(name));
        props.insert("graph_0".into(), PropertyValue::Bool(true));
        props
    };
    GraphModel::from_parts(
        vec![
            GraphNode::new(NodeId::new("s1"), vec!["Suspect".into()], named("Alice")),
            GraphNode::new(NodeId::new("s2"), vec!["Suspect".into()], named("Bob")),
            GraphNode::new(NodeId::new("v"), vec!["Victim".into()], named("John Doe")),
            GraphNode::new(NodeId::new("h"), vec!["Location".into()], named("Grandview Hotel")),
        ],
        vec![
            GraphEdge {
                source: NodeId::new("s1"),
                target: NodeId::new("h"),
                rel_type: "WAS_AT".into(),
                properties: Properties::new(),
            },
            GraphEdge {
                source: NodeId::new("s2"),
                target: NodeId::new("v"),
                rel_type: "CLOSE_FRIEND_OF".into(),
                properties: Properties::new(),
            },
        ],
    )
}

fn loaded_view() -> GraphView {
    let mut view = GraphView::new(
        GraphViewConfig::default(),
        Rect::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(900.0, 650.0)),
    );
    view.set_graph(1, case_graph());
    view
}

fn screen_of(view: &GraphView, id: &str) -> Vec2 {
    view.viewport()
        .to_screen(view.positions()[&NodeId::new(id)])
}

fn click_and_move(view: &mut GraphView, start: Vec2, delta: Vec2) {
    view.handle_input(CanvasInput::PointerDown {
        pos: start,
        button: PointerButton::Primary,
    });
    view.handle_input(CanvasInput::PointerMove { pos: start + delta });
    view.handle_input(CanvasInput::PointerUp {
        pos: start + delta,
        button: PointerButton::Primary,
    });
}

#[test]
fn short_move_on_node_opens_details() {
    let mut view = loaded_view();
    let start = screen_of(&view, "s1");
    click_and_move(&mut view, start, Vec2::new(3.0, 0.0));

    let panel = view.details_panel().expect("details panel should open");
    match panel.details {
        Details::Node(node) => {
            assert_eq!(node.name, "Alice");
            assert!(node.properties.iter().all(|(k, _)| !k.starts_with("graph_")));
        }
        other => panic!("expected node details, got {other:?}"),
    }
}

#[test]
fn long_move_on_node_drags_without_details() {
    let mut view = loaded_view();
    let start = screen_of(&view, "s1");
    click_and_move(&mut view, start, Vec2::new(8.0, 0.0));

    assert!(view.details_panel().is_none());
    let moved = screen_of(&view, "s1");
    assert!((moved.x - (start.x + 8.0)).abs() < 1e-3);
    assert!((moved.y - start.y).abs() < 1e-3);
}

#[test]
fn reload_of_same_level_is_detectable() {
    let view = loaded_view();
    assert!(view.is_loaded_for(1));
    assert_eq!(view.positions().len(), 4);
    assert_eq!(view.model().edge_count(), 2);
}
