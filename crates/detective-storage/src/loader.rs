use crate::row_mapping::{edge_from_record, node_from_record};
use crate::{GraphDatabase, LoadError, Params};
use detective_core::level::visibility_flag;
use detective_core::{EdgeId, GraphEdge, GraphNode, NodeId, PropertyValue, Record};
use detective_graph::{GraphModel, GraphView};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub const NODE_QUERY: &str =
    "MATCH (n) RETURN labels(n) as labels, properties(n) as props, elementId(n) as id";
pub const EDGE_QUERY: &str = "MATCH (a)-[r]->(b) RETURN elementId(a) as source, type(r) as relationship, elementId(b) as target, properties(r) as props";

/// Labels whose nodes only appear in levels that flag them.
pub const RESTRICTED_LABELS: [&str; 2] = ["Suspect", "Bank"];

/// Decides which nodes belong to a level's graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    flag: String,
    restricted: Vec<String>,
}

impl VisibilityRule {
    pub fn for_level(level: u32) -> Self {
        Self {
            flag: visibility_flag(level),
            restricted: RESTRICTED_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Unrestricted nodes are always visible; restricted ones need their level flag set to `true`.
    pub fn is_visible(&self, node: &GraphNode) -> bool {
        let restricted = node
            .labels
            .iter()
            .any(|label| self.restricted.contains(label));
        !restricted || node.properties.get(&self.flag) == Some(&PropertyValue::Bool(true))
    }
}

/// A level's filtered nodes and edges, ready to become a [`GraphModel`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadedGraph {
    pub level: u32,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl LoadedGraph {
    pub fn into_model(self) -> GraphModel {
        GraphModel::from_parts(self.nodes, self.edges)
    }
}

/// Filter raw node and relationship rows down to what `level` may show.
///
/// Edges survive only when both endpoints do. Several relationships between the
/// same ordered pair collapse into one, keeping the last one seen.
pub fn build_graph(
    level: u32,
    node_rows: &[Record],
    edge_rows: &[Record],
) -> Result<LoadedGraph, LoadError> {
    let rule = VisibilityRule::for_level(level);

    let mut nodes = Vec::new();
    for row in node_rows {
        let node = node_from_record(row).map_err(|e| LoadError::row(NODE_QUERY, e))?;
        if rule.is_visible(&node) {
            nodes.push(node);
        }
    }
    let visible: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();

    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut slots: HashMap<EdgeId, usize> = HashMap::new();
    for row in edge_rows {
        let edge = edge_from_record(row).map_err(|e| LoadError::row(EDGE_QUERY, e))?;
        if !visible.contains(&edge.source) || !visible.contains(&edge.target) {
            continue;
        }
        match slots.get(&edge.id()) {
            Some(&slot) => edges[slot] = edge,
            None => {
                slots.insert(edge.id(), edges.len());
                edges.push(edge);
            }
        }
    }

    Ok(LoadedGraph {
        level,
        nodes,
        edges,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The view already shows this level with a computed layout.
    AlreadyLoaded,
    Loaded { nodes: usize, edges: usize },
    /// Nothing changed in the view.
    Failed(LoadError),
}

/// Fetches level graphs through the shared database connection.
#[derive(Clone)]
pub struct GraphLoader {
    db: Arc<dyn GraphDatabase>,
}

impl GraphLoader {
    pub fn new(db: Arc<dyn GraphDatabase>) -> Self {
        Self { db }
    }

    pub fn fetch(&self, level: u32) -> Result<LoadedGraph, LoadError> {
        let params = Params::new();
        let node_rows = self.db.execute(NODE_QUERY, &params)?;
        let edge_rows = self.db.execute(EDGE_QUERY, &params)?;
        let graph = build_graph(level, &node_rows, &edge_rows)?;
        tracing::debug!(
            level,
            fetched_nodes = node_rows.len(),
            visible_nodes = graph.nodes.len(),
            visible_edges = graph.edges.len(),
            "Fetched level graph"
        );
        Ok(graph)
    }

    /// Load `level` into `view` unless it is already there.
    ///
    /// Errors are logged and leave the view untouched.
    pub fn load_into(&self, view: &mut GraphView, level: u32) -> LoadOutcome {
        if view.is_loaded_for(level) {
            return LoadOutcome::AlreadyLoaded;
        }
        match self.fetch(level) {
            Ok(graph) => {
                let model = graph.into_model();
                let outcome = LoadOutcome::Loaded {
                    nodes: model.node_count(),
                    edges: model.edge_count(),
                };
                view.set_graph(level, model);
                outcome
            }
            Err(err) => {
                tracing::error!("Failed to load graph for level {}: {}", level, err);
                LoadOutcome::Failed(err)
            }
        }
    }
}
