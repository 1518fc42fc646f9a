use detective_core::{EdgeId, GraphEdge, GraphNode, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directed graph of one level's visible case data.
///
/// Nodes and edges keep their insertion order, which is also the draw order.
/// At most one edge exists per ordered node pair; adding another edge between
/// the same pair replaces the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_map: HashMap<NodeId, NodeIndex>,
    edge_map: HashMap<EdgeId, EdgeIndex>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from loader output. Edges whose endpoints are absent are dropped.
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut model = Self::new();
        for node in nodes {
            model.add_node(node);
        }
        for edge in edges {
            model.add_edge(edge);
        }
        model
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node.id) {
            tracing::debug!("Node {} already present, keeping the first copy", node.id);
            return idx;
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    /// Returns the index of the stored edge, or `None` when an endpoint is missing.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Option<EdgeIndex> {
        let source_known = self.node_map.contains_key(&edge.source);
        let target_known = self.node_map.contains_key(&edge.target);
        if !source_known || !target_known {
            if !source_known {
                tracing::warn!(
                    "Dropping edge {} because source node {} is missing from graph model",
                    edge.id(),
                    edge.source
                );
            }
            if !target_known {
                tracing::warn!(
                    "Dropping edge {} because target node {} is missing from graph model",
                    edge.id(),
                    edge.target
                );
            }
            return None;
        }

        let id = edge.id();
        if let Some(&idx) = self.edge_map.get(&id) {
            self.edges[idx.0] = edge;
            return Some(idx);
        }
        let idx = EdgeIndex(self.edges.len());
        self.edge_map.insert(id, idx);
        self.edges.push(edge);
        Some(idx)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_map.clear();
        self.edge_map.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_index(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.node_map.get(id).map(|idx| &self.nodes[idx.0])
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edge_map.get(id).map(|idx| &self.edges[idx.0])
    }

    /// Edge endpoints as node indices, for algorithms that work on dense arrays.
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.edges.iter().filter_map(|edge| {
            Some((
                *self.node_map.get(&edge.source)?,
                *self.node_map.get(&edge.target)?,
            ))
        })
    }
}
