use super::config::RawConfig;
use super::conversion::{RawCanvasEdge, RawCanvasNode, RawCanvasState};
use super::definition::{CanvasSnapshot, Position};
use crate::error::DocumentError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// The raw `{ nodes, edges }` pair the canvas saves and loads.
///
/// Nodes and edges are kept in the editor's own shape (`{ id, type,
/// position, data: { label, config } }`), including keys this crate does not
/// know about, so an export/import cycle is lossless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Value>,
    pub edges: Vec<Value>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Value>, edges: Vec<Value>) -> Self {
        Self { nodes, edges }
    }

    /// Parses an exported document. Both `nodes` and `edges` must be arrays.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DocumentError::JsonParseError(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let mut value = value;
        let nodes = take_array(&mut value, "nodes");
        let edges = take_array(&mut value, "edges");
        match (nodes, edges) {
            (Some(nodes), Some(edges)) => Ok(Self { nodes, edges }),
            (None, Some(_)) => Err(DocumentError::MissingArrays {
                missing: "nodes".to_string(),
            }),
            (Some(_), None) => Err(DocumentError::MissingArrays {
                missing: "edges".to_string(),
            }),
            (None, None) => Err(DocumentError::MissingArrays {
                missing: "nodes, edges".to_string(),
            }),
        }
    }

    /// Serializes the document as JSON with 2-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::SerializeError(e.to_string()))
    }

    /// Saves the document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            "Saved graph document ({} nodes, {} edges) to '{}'",
            self.nodes.len(),
            self.edges.len(),
            path.display()
        );
        Ok(())
    }

    /// Loads a document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Builds the canvas snapshot the editor would report for this graph.
    ///
    /// Positions are rounded to whole pixels, labels default to the node
    /// type, and every node gets an adjacency entry (possibly empty). Edges
    /// whose source is not a node are kept in `edges` but left out of the
    /// adjacency map. The timestamp is supplied by the caller.
    pub fn to_snapshot(&self, timestamp: Option<String>) -> CanvasSnapshot {
        let mut connections: IndexMap<String, Vec<String>> = IndexMap::new();

        let nodes: Vec<RawCanvasNode> = self
            .nodes
            .iter()
            .map(|node| {
                let id = text_at(node, "id");
                let node_type = text_at(node, "type");
                let data = node.get("data");
                let label = data
                    .and_then(|d| d.get("label"))
                    .and_then(Value::as_str)
                    .filter(|l| !l.is_empty())
                    .map_or_else(|| node_type.clone(), str::to_string);
                let config = data
                    .and_then(|d| d.get("config"))
                    .and_then(|c| RawConfig::deserialize(c).ok())
                    .unwrap_or_default();

                connections.insert(id.clone(), Vec::new());
                RawCanvasNode {
                    id,
                    node_type,
                    label: Some(label),
                    position: Some(rounded_position(node.get("position"))),
                    config: Some(config),
                }
            })
            .collect();

        let edges: Vec<RawCanvasEdge> = self
            .edges
            .iter()
            .map(|edge| {
                let edge = RawCanvasEdge {
                    id: text_at(edge, "id"),
                    source: text_at(edge, "source"),
                    target: text_at(edge, "target"),
                    edge_type: edge.get("type").and_then(Value::as_str).map(str::to_string),
                };
                if let Some(targets) = connections.get_mut(&edge.source) {
                    targets.push(edge.target.clone());
                }
                edge
            })
            .collect();

        CanvasSnapshot::from_raw(RawCanvasState {
            timestamp,
            edge_count: Some(edges.len()),
            nodes,
            edges,
            connections: Some(connections),
            node_count: None,
        })
    }
}

fn take_array(value: &mut Value, key: &str) -> Option<Vec<Value>> {
    match value.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Reads a string or numeric id-like field as text; anything else is empty.
pub(super) fn text_at(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Rounds half-way cases towards positive infinity, as the editor does.
fn rounded_position(position: Option<&Value>) -> Position {
    let coord = |key: &str| {
        position
            .and_then(|p| p.get(key))
            .and_then(Value::as_f64)
            .map(|v| (v + 0.5).floor())
            .unwrap_or_default()
    };
    Position {
        x: coord("x"),
        y: coord("y"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NodeKind;
    use serde_json::json;

    fn sample_document() -> GraphDocument {
        GraphDocument::new(
            vec![
                json!({ "id": "route-1", "type": "route", "position": { "x": 10.4, "y": -2.5 },
                        "data": { "label": "List users", "config": { "path": "/api/users" } } }),
                json!({ "id": "controller-1", "type": "controller", "position": { "x": 0, "y": 0 },
                        "data": {} }),
            ],
            vec![
                json!({ "id": "e1", "source": "route-1", "target": "controller-1" }),
                json!({ "id": "e2", "source": "ghost", "target": "route-1", "type": "smoothstep" }),
            ],
        )
    }

    #[test]
    fn test_import_requires_both_arrays() {
        assert!(GraphDocument::from_json(r#"{ "nodes": [], "edges": [] }"#).is_ok());
        assert_eq!(
            GraphDocument::from_json(r#"{ "nodes": [] }"#),
            Err(DocumentError::MissingArrays {
                missing: "edges".to_string()
            })
        );
        assert_eq!(
            GraphDocument::from_json(r#"{ "nodes": {}, "edges": [] }"#),
            Err(DocumentError::MissingArrays {
                missing: "nodes".to_string()
            })
        );
        assert!(matches!(
            GraphDocument::from_json("not json"),
            Err(DocumentError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_export_uses_two_space_indentation() {
        let doc = GraphDocument::new(vec![json!({ "id": "a" })], vec![]);
        let json = doc.to_json_pretty().unwrap();
        assert!(json.contains("\n  \"nodes\": [\n    {\n      \"id\": \"a\""));
        assert_eq!(GraphDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_snapshot_construction_matches_editor() {
        let snapshot = sample_document().to_snapshot(Some("t0".to_string()));

        assert_eq!(snapshot.timestamp.as_deref(), Some("t0"));
        assert_eq!(snapshot.nodes[0].label, "List users");
        assert_eq!(snapshot.nodes[0].position, Position { x: 10.0, y: -2.0 });
        assert_eq!(snapshot.nodes[1].label, "controller");
        assert_eq!(snapshot.nodes[1].kind(), NodeKind::Controller);

        let connections = snapshot.connections.as_ref().unwrap();
        assert_eq!(connections.len(), 2);
        assert_eq!(connections["route-1"], vec!["controller-1".to_string()]);
        assert!(connections["controller-1"].is_empty());
        assert!(!connections.contains_key("ghost"));

        assert_eq!(snapshot.edges.len(), 2);
        assert_eq!(snapshot.edges[1].edge_type.as_deref(), Some("smoothstep"));
        assert_eq!(snapshot.edge_count, 2);
        assert_eq!(snapshot.node_count.route, 1);
        assert_eq!(snapshot.node_count.controller, 1);
        assert_eq!(snapshot.node_count.total, 2);
    }
}
