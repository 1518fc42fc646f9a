use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod level;
pub mod value;

pub use level::{Level, LevelCatalog};
pub use value::{PropertyValue, Record, RecordError};

/// Reserved property prefix for per-level visibility flags (`graph_0`, `graph_1`, ...).
pub const INTERNAL_PROPERTY_PREFIX: &str = "graph_";

/// Opaque, stable node identifier handed out by the graph database (`elementId`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A directed edge is identified by its ordered endpoint pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeId {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// Returns true for bookkeeping properties that must never reach the player.
pub fn is_internal_property(key: &str) -> bool {
    key.starts_with(INTERNAL_PROPERTY_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Type labels in database order; the first one is the primary label.
    pub labels: Vec<String>,
    pub name: String,
    pub properties: Properties,
}

impl GraphNode {
    pub fn new(id: NodeId, labels: Vec<String>, properties: Properties) -> Self {
        let name = display_name(&labels, &properties);
        Self {
            id,
            labels,
            name,
            properties,
        }
    }

    pub fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or("Unknown")
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Properties safe to show in a details panel, in key order.
    pub fn visible_properties(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.properties
            .iter()
            .filter(|(key, _)| !is_internal_property(key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub rel_type: String,
    pub properties: Properties,
}

impl GraphEdge {
    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.source.clone(), self.target.clone())
    }

    pub fn visible_properties(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.properties
            .iter()
            .filter(|(key, _)| !is_internal_property(key))
    }
}

fn display_name(labels: &[String], properties: &Properties) -> String {
    match properties.get("name") {
        Some(PropertyValue::String(name)) => name.clone(),
        _ => labels
            .first()
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_name_falls_back_to_primary_label() {
        let node = GraphNode::new(
            NodeId::new("4:a:1"),
            vec!["Location".to_string(), "Building".to_string()],
            Properties::new(),
        );
        assert_eq!(node.name, "Location");
        assert_eq!(node.primary_label(), "Location");

        let unlabeled = GraphNode::new(NodeId::new("4:a:2"), Vec::new(), Properties::new());
        assert_eq!(unlabeled.name, "Unknown");
        assert_eq!(unlabeled.primary_label(), "Unknown");
    }

    #[test]
    fn test_visible_properties_skip_level_flags() {
        let mut props = Properties::new();
        props.insert("name".into(), PropertyValue::from("Alice"));
        props.insert("graph_3".into(), PropertyValue::Bool(true));
        props.insert("hair".into(), PropertyValue::from("brown"));
        let node = GraphNode::new(NodeId::new("n1"), vec!["Suspect".into()], props);

        let keys: Vec<&str> = node.visible_properties().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["hair", "name"]);
        assert_eq!(node.name, "Alice");
    }

    #[test]
    fn test_edge_id_display() {
        let edge = GraphEdge {
            source: NodeId::new("a"),
            target: NodeId::new("b"),
            rel_type: "WAS_AT".into(),
            properties: Properties::new(),
        };
        assert_eq!(edge.id().to_string(), "a -> b");
    }
}
