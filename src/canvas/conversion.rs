use super::config::{NodeConfig, RawConfig, config_text};
use super::definition::{CanvasEdge, CanvasNode, CanvasSnapshot, NodeCount, Position};
use super::document::text_at;
use crate::error::{CanvasConversionError, CompileError, DocumentError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A trait for custom canvas formats that can be converted into a `CanvasSnapshot`.
///
/// The canvas JSON emitted by the bundled UI is already supported through
/// [`CanvasSnapshot::from_json`]. Implement this trait when your editor
/// stores its graph differently.
///
/// # Example
///
/// ```rust,no_run
/// use fraxon::prelude::*;
/// use fraxon::error::CanvasConversionError;
///
/// struct MyBox { key: String, role: String, title: String }
/// struct MyDiagram { boxes: Vec<MyBox> }
///
/// impl IntoCanvas for MyDiagram {
///     fn into_canvas(self) -> Result<CanvasSnapshot, CanvasConversionError> {
///         let nodes = self
///             .boxes
///             .into_iter()
///             .map(|b| CanvasNode {
///                 config: NodeConfig::from_raw(&b.role, &RawConfig::new()),
///                 id: b.key,
///                 label: b.title,
///                 position: Position::default(),
///             })
///             .collect();
///         Ok(CanvasSnapshot::from_parts(nodes, vec![]))
///     }
/// }
/// ```
pub trait IntoCanvas {
    /// Consumes the object and converts it into a compilable canvas snapshot.
    fn into_canvas(self) -> Result<CanvasSnapshot, CanvasConversionError>;
}

/// The canvas state exactly as the UI serializes it (camelCase keys).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCanvasState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub nodes: Vec<RawCanvasNode>,
    #[serde(default)]
    pub edges: Vec<RawCanvasEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<IndexMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<NodeCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCanvasNode {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub config: Option<RawConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCanvasEdge {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
}

impl RawCanvasNode {
    /// Reads one node entry field by field. A field of the wrong JSON type
    /// falls back to its default instead of rejecting the node; only an
    /// entry that is not an object yields `None`.
    fn lenient(value: &Value) -> Option<Self> {
        let node = value.as_object()?;
        let coord = |key: &str| {
            node.get("position")
                .and_then(|p| p.get(key))
                .and_then(Value::as_f64)
                .unwrap_or_default()
        };
        Some(RawCanvasNode {
            id: text_at(value, "id"),
            node_type: node.get("type").and_then(config_text).unwrap_or_default(),
            label: node.get("label").and_then(config_text),
            position: Some(Position {
                x: coord("x"),
                y: coord("y"),
            }),
            config: node.get("config").and_then(Value::as_object).map(|config| {
                config
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            }),
        })
    }
}

impl IntoCanvas for RawCanvasState {
    fn into_canvas(self) -> Result<CanvasSnapshot, CanvasConversionError> {
        Ok(CanvasSnapshot::from_raw(self))
    }
}

impl From<RawCanvasNode> for CanvasNode {
    fn from(raw: RawCanvasNode) -> Self {
        let config = NodeConfig::from_raw(&raw.node_type, &raw.config.unwrap_or_default());
        CanvasNode {
            id: raw.id,
            label: raw.label.unwrap_or_default(),
            position: raw.position.unwrap_or_default(),
            config,
        }
    }
}

impl From<&CanvasNode> for RawCanvasNode {
    fn from(node: &CanvasNode) -> Self {
        RawCanvasNode {
            id: node.id.clone(),
            node_type: node.type_name().to_string(),
            label: Some(node.label.clone()),
            position: Some(node.position),
            config: Some(node.config.to_raw()),
        }
    }
}

impl From<RawCanvasEdge> for CanvasEdge {
    fn from(raw: RawCanvasEdge) -> Self {
        CanvasEdge {
            id: raw.id,
            source: raw.source,
            target: raw.target,
            edge_type: raw.edge_type,
        }
    }
}

impl From<&CanvasEdge> for RawCanvasEdge {
    fn from(edge: &CanvasEdge) -> Self {
        RawCanvasEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: edge.edge_type.clone(),
        }
    }
}

impl From<&CanvasSnapshot> for RawCanvasState {
    fn from(snapshot: &CanvasSnapshot) -> Self {
        RawCanvasState {
            timestamp: snapshot.timestamp.clone(),
            nodes: snapshot.nodes.iter().map(RawCanvasNode::from).collect(),
            edges: snapshot.edges.iter().map(RawCanvasEdge::from).collect(),
            connections: snapshot.connections.clone(),
            node_count: Some(snapshot.node_count),
            edge_count: Some(snapshot.edge_count),
        }
    }
}

impl CanvasSnapshot {
    /// Parses canvas state JSON. See [`CanvasSnapshot::from_value`].
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CompileError::InvalidGraph(format!("state is not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Reads canvas state from a JSON value.
    ///
    /// Fails only when the state is absent or `nodes` is missing or not an
    /// array. Node entries that are not objects are skipped, node fields of
    /// the wrong type take their defaults, and malformed edges, adjacency or
    /// counts are dropped and recomputed.
    pub fn from_value(value: &Value) -> Result<Self, CompileError> {
        let state = value
            .as_object()
            .ok_or_else(|| CompileError::InvalidGraph("state is absent".to_string()))?;
        let raw_nodes = state
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or_else(|| CompileError::InvalidGraph("nodes must be an array".to_string()))?;

        let nodes = raw_nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let node = RawCanvasNode::lenient(node);
                if node.is_none() {
                    tracing::debug!("Skipping node at index {}: not an object", index);
                }
                node
            })
            .collect();

        let edges = state
            .get("edges")
            .and_then(Value::as_array)
            .map(|edges| {
                edges
                    .iter()
                    .filter_map(|edge| match RawCanvasEdge::deserialize(edge) {
                        Ok(edge) => Some(edge),
                        Err(e) => {
                            tracing::debug!("Skipping malformed edge: {}", e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let connections = state.get("connections").and_then(|c| {
            IndexMap::<String, Vec<String>>::deserialize(c)
                .map_err(|e| tracing::debug!("Ignoring malformed connections map: {}", e))
                .ok()
        });

        let raw = RawCanvasState {
            timestamp: state
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string),
            nodes,
            edges,
            connections,
            node_count: state
                .get("nodeCount")
                .and_then(|c| NodeCount::deserialize(c).ok()),
            edge_count: state
                .get("edgeCount")
                .and_then(Value::as_u64)
                .map(|n| n as usize),
        };
        Ok(Self::from_raw(raw))
    }

    /// Serializes the snapshot back into the UI's canvas state shape.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        serde_json::to_value(RawCanvasState::from(self))
            .map_err(|e| DocumentError::SerializeError(e.to_string()))
    }

    pub(crate) fn from_raw(raw: RawCanvasState) -> Self {
        let nodes: Vec<CanvasNode> = raw.nodes.into_iter().map(CanvasNode::from).collect();
        let edges: Vec<CanvasEdge> = raw.edges.into_iter().map(CanvasEdge::from).collect();
        CanvasSnapshot {
            timestamp: raw.timestamp,
            node_count: raw.node_count.unwrap_or_else(|| NodeCount::tally(&nodes)),
            edge_count: raw.edge_count.unwrap_or(edges.len()),
            connections: raw.connections,
            nodes,
            edges,
        }
    }
}
