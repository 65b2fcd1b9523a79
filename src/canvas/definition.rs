use super::config::NodeConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The role a node plays on the canvas.
///
/// Type names are matched exactly (`"model"`, not `"Model"`); anything the
/// compiler has no derivation rule for is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Server,
    Route,
    Controller,
    Middleware,
    Database,
    Model,
    Other,
}

impl NodeKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "server" => NodeKind::Server,
            "route" => NodeKind::Route,
            "controller" => NodeKind::Controller,
            "middleware" => NodeKind::Middleware,
            "database" => NodeKind::Database,
            "model" => NodeKind::Model,
            _ => NodeKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Server => "server",
            NodeKind::Route => "route",
            NodeKind::Controller => "controller",
            NodeKind::Middleware => "middleware",
            NodeKind::Database => "database",
            NodeKind::Model => "model",
            NodeKind::Other => "other",
        }
    }
}

/// Canvas coordinates. Only meaningful to the rendering layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// A single node placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    pub id: String,
    pub label: String,
    pub position: Position,
    pub config: NodeConfig,
}

impl CanvasNode {
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    /// The node's type name as the canvas reported it.
    pub fn type_name(&self) -> &str {
        self.config.type_name()
    }

    /// The label, or `None` when the canvas left it empty.
    pub fn label(&self) -> Option<&str> {
        (!self.label.is_empty()).then_some(self.label.as_str())
    }
}

/// A directed "produces/feeds" connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub edge_type: Option<String>,
}

/// Per-type node counts tracked by the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCount {
    pub server: usize,
    pub route: usize,
    pub controller: usize,
    pub middleware: usize,
    pub total: usize,
}

impl NodeCount {
    /// Counts the tracked node types in `nodes`.
    pub fn tally(nodes: &[CanvasNode]) -> Self {
        let mut count = NodeCount {
            total: nodes.len(),
            ..Default::default()
        };
        for node in nodes {
            match node.kind() {
                NodeKind::Server => count.server += 1,
                NodeKind::Route => count.route += 1,
                NodeKind::Controller => count.controller += 1,
                NodeKind::Middleware => count.middleware += 1,
                _ => {}
            }
        }
        count
    }
}

/// The full node/edge state of the canvas at one point in time.
///
/// This is the only input the compiler reads. It is an immutable value:
/// callers hand it over explicitly instead of the compiler reaching into
/// shared state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasSnapshot {
    pub timestamp: Option<String>,
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
    /// Precomputed adjacency (node id -> target ids). When `None`, the
    /// compiler rebuilds it from `edges`.
    pub connections: Option<IndexMap<String, Vec<String>>>,
    pub node_count: NodeCount,
    pub edge_count: usize,
}

impl CanvasSnapshot {
    /// Builds a snapshot from nodes and edges alone, recomputing counts.
    /// Adjacency is left for the compiler to derive from the edges.
    pub fn from_parts(nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> Self {
        Self {
            timestamp: None,
            node_count: NodeCount::tally(&nodes),
            edge_count: edges.len(),
            nodes,
            edges,
            connections: None,
        }
    }

    pub fn with_connections(mut self, connections: IndexMap<String, Vec<String>>) -> Self {
        self.connections = Some(connections);
        self
    }
}
