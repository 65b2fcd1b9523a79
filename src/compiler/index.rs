use crate::canvas::{CanvasEdge, CanvasNode, CanvasSnapshot, NodeKind};
use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Node id -> ordered ids of the nodes it points at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionIndex {
    adjacency: IndexMap<String, Vec<String>>,
}

impl ConnectionIndex {
    /// Uses the snapshot's precomputed adjacency, or rebuilds it from the edges.
    pub fn for_snapshot(snapshot: &CanvasSnapshot) -> Self {
        match &snapshot.connections {
            Some(connections) => Self::from_connections(connections.clone()),
            None => Self::from_edges(&snapshot.nodes, &snapshot.edges),
        }
    }

    pub fn from_connections(adjacency: IndexMap<String, Vec<String>>) -> Self {
        Self { adjacency }
    }

    /// Builds adjacency in edge order. Edges leaving unknown nodes are not indexed.
    pub fn from_edges(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Self {
        let mut adjacency: IndexMap<String, Vec<String>> = nodes
            .iter()
            .map(|n| (n.id.clone(), Vec::new()))
            .collect();
        for edge in edges {
            match adjacency.get_mut(&edge.source) {
                Some(targets) => targets.push(edge.target.clone()),
                None => tracing::trace!(
                    "Edge '{}' leaves unknown node '{}'; not indexed",
                    edge.id,
                    edge.source
                ),
            }
        }
        Self { adjacency }
    }

    /// Direct targets of `id`, in edge order.
    pub fn targets(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Read-only view over one snapshot: the id lookup table plus adjacency.
pub struct GraphView<'a> {
    nodes: AHashMap<&'a str, &'a CanvasNode>,
    connections: ConnectionIndex,
}

impl<'a> GraphView<'a> {
    pub fn new(snapshot: &'a CanvasSnapshot) -> Self {
        // Later duplicates overwrite earlier ones.
        let nodes = snapshot
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n))
            .collect();
        Self {
            nodes,
            connections: ConnectionIndex::for_snapshot(snapshot),
        }
    }

    pub fn node(&self, id: &str) -> Option<&'a CanvasNode> {
        self.nodes.get(id).copied()
    }

    /// Single-hop lookup.
    ///
    /// With a filter, returns the first direct target of that kind. Without
    /// one, returns the first direct target only, which may be `None` if that
    /// edge dangles.
    pub fn first_connected(&self, id: &str, filter: Option<NodeKind>) -> Option<&'a CanvasNode> {
        let targets = self.connections.targets(id);
        match filter {
            None => targets.first().and_then(|t| self.node(t)),
            Some(kind) => targets
                .iter()
                .filter_map(|t| self.node(t))
                .find(|n| n.kind() == kind),
        }
    }

    /// Breadth-first search along outgoing edges for the nearest node of
    /// `kind` at most `max_hops` away. Within a level, edge order decides.
    ///
    /// `max_hops == 1` is exactly `first_connected(id, Some(kind))`. Cycles
    /// and self-loops are visited once.
    pub fn nearest_within(&self, id: &str, kind: NodeKind, max_hops: usize) -> Option<&'a CanvasNode> {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        visited.insert(id);
        queue.push_back((id, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_hops {
                continue;
            }
            for target in self.connections.targets(current) {
                let Some(node) = self.node(target) else {
                    continue;
                };
                if node.kind() == kind {
                    return Some(node);
                }
                if visited.insert(node.id.as_str()) {
                    queue.push_back((node.id.as_str(), depth + 1));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{NodeConfig, Position, RawConfig};

    fn node(id: &str, node_type: &str) -> CanvasNode {
        CanvasNode {
            id: id.to_string(),
            label: String::new(),
            position: Position::default(),
            config: NodeConfig::from_raw(node_type, &RawConfig::new()),
        }
    }

    fn edge(source: &str, target: &str) -> CanvasEdge {
        CanvasEdge {
            id: format!("{}->{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: None,
        }
    }

    fn snapshot(nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> CanvasSnapshot {
        CanvasSnapshot::from_parts(nodes, edges)
    }

    #[test]
    fn test_unfiltered_lookup_only_checks_first_target() {
        let snap = snapshot(
            vec![node("r", "route"), node("c", "controller")],
            vec![edge("r", "missing"), edge("r", "c")],
        );
        let view = GraphView::new(&snap);
        assert!(view.first_connected("r", None).is_none());
        assert_eq!(
            view.first_connected("r", Some(NodeKind::Controller)).map(|n| n.id.as_str()),
            Some("c")
        );
    }

    #[test]
    fn test_edges_from_unknown_sources_are_dropped() {
        let nodes = vec![node("a", "route")];
        let index = ConnectionIndex::from_edges(&nodes, &[edge("ghost", "a"), edge("a", "a")]);
        assert!(index.targets("ghost").is_empty());
        assert_eq!(index.targets("a"), ["a".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_resolve_to_last_node() {
        let snap = snapshot(vec![node("x", "route"), node("x", "model")], vec![]);
        let view = GraphView::new(&snap);
        assert_eq!(view.node("x").map(CanvasNode::kind), Some(NodeKind::Model));
    }

    #[test]
    fn test_bounded_search_respects_hop_limit_and_cycles() {
        let snap = snapshot(
            vec![
                node("c", "controller"),
                node("m1", "middleware"),
                node("m2", "middleware"),
                node("db", "model"),
            ],
            vec![
                edge("c", "m1"),
                edge("m1", "c"),
                edge("m1", "m2"),
                edge("m2", "m2"),
                edge("m2", "db"),
            ],
        );
        let view = GraphView::new(&snap);
        assert!(view.nearest_within("c", NodeKind::Model, 1).is_none());
        assert!(view.nearest_within("c", NodeKind::Model, 2).is_none());
        assert_eq!(
            view.nearest_within("c", NodeKind::Model, 3).map(|n| n.id.as_str()),
            Some("db")
        );
        assert!(view.nearest_within("c", NodeKind::Server, 10).is_none());
    }
}
