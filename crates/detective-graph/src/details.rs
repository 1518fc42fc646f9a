use crate::geometry::Vec2;
use crate::graph::GraphModel;
use detective_core::{EdgeId, NodeId};

/// Width of the floating details panel.
pub const PANEL_WIDTH: f32 = 300.0;
/// Vertical gap between an edge midpoint and its panel.
pub const EDGE_PANEL_OFFSET: f32 = 20.0;
pub const CLOSE_HINT: &str = "Press 'TAB' to close";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDetails {
    pub id: NodeId,
    pub name: String,
    pub labels: Vec<String>,
    pub properties: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDetails {
    pub id: EdgeId,
    pub rel_type: String,
    pub source_name: String,
    pub target_name: String,
    pub properties: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    Node(NodeDetails),
    Edge(EdgeDetails),
}

impl Details {
    pub fn for_node(model: &GraphModel, id: &NodeId) -> Option<Self> {
        let node = model.node(id)?;
        Some(Details::Node(NodeDetails {
            id: node.id.clone(),
            name: node.name.clone(),
            labels: node.labels.clone(),
            properties: node
                .visible_properties()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
        }))
    }

    pub fn for_edge(model: &GraphModel, id: &EdgeId) -> Option<Self> {
        let edge = model.edge(id)?;
        let name_of = |id: &NodeId| {
            model
                .node(id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        Some(Details::Edge(EdgeDetails {
            id: edge.id(),
            rel_type: edge.rel_type.clone(),
            source_name: name_of(&edge.source),
            target_name: name_of(&edge.target),
            properties: edge
                .visible_properties()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
        }))
    }

    pub fn title(&self) -> String {
        match self {
            Details::Node(node) => format!("Node Name: {}", node.name),
            Details::Edge(edge) => format!("Relationship: {}", edge.rel_type),
        }
    }

    /// Text lines for the panel body, title first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title()];
        let properties = match self {
            Details::Node(node) => {
                lines.push(format!("Type: {}", node.labels.join(", ")));
                &node.properties
            }
            Details::Edge(edge) => {
                lines.push(format!("From: {}", edge.source_name));
                lines.push(format!("To: {}", edge.target_name));
                &edge.properties
            }
        };
        lines.push(String::new());
        if properties.is_empty() {
            lines.push("No properties".to_string());
        } else {
            lines.push("Properties:".to_string());
            lines.extend(properties.iter().map(|(k, v)| format!("  {k}: {v}")));
        }
        lines
    }
}

/// Details plus the screen point the panel hangs from (top center).
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsPanel {
    pub details: Details,
    pub anchor: Vec2,
}

impl DetailsPanel {
    /// Top-left corner of a panel of [`PANEL_WIDTH`] centered under the anchor.
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.anchor.x - PANEL_WIDTH / 2.0, self.anchor.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::{GraphEdge, GraphNode, Properties, PropertyValue};

    fn model() -> GraphModel {
        let mut alice = Properties::new();
        alice.insert("name".into(), PropertyValue::from("Alice"));
        alice.insert("graph_2".into(), PropertyValue::Bool(true));
        alice.insert("height".into(), PropertyValue::Float(6.1));
        let mut hotel = Properties::new();
        hotel.insert("name".into(), PropertyValue::from("Grandview Hotel"));

        let mut edge_props = Properties::new();
        edge_props.insert("graph_2".into(), PropertyValue::Bool(true));
        GraphModel::from_parts(
            vec![
                GraphNode::new(NodeId::new("a"), vec!["Suspect".into()], alice),
                GraphNode::new(NodeId::new("h"), vec!["Location".into()], hotel),
            ],
            vec![GraphEdge {
                source: NodeId::new("a"),
                target: NodeId::new("h"),
                rel_type: "WAS_AT".into(),
                properties: edge_props,
            }],
        )
    }

    #[test]
    fn test_node_details_hide_internal_properties() {
        let details = Details::for_node(&model(), &NodeId::new("a")).unwrap();
        let lines = details.lines();
        assert_eq!(lines[0], "Node Name: Alice");
        assert_eq!(lines[1], "Type: Suspect");
        assert!(lines.contains(&"  height: 6.1".to_string()));
        assert!(lines.contains(&"  name: Alice".to_string()));
        assert!(lines.iter().all(|l| !l.contains("graph_")));
    }

    #[test]
    fn test_edge_details_use_display_names() {
        let id = EdgeId::new(NodeId::new("a"), NodeId::new("h"));
        let details = Details::for_edge(&model(), &id).unwrap();
        assert_eq!(
            details.lines(),
            vec![
                "Relationship: WAS_AT".to_string(),
                "From: Alice".to_string(),
                "To: Grandview Hotel".to_string(),
                String::new(),
                "No properties".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_target_yields_none() {
        assert!(Details::for_node(&model(), &NodeId::new("zzz")).is_none());
    }
}
