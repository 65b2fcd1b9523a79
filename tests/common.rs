//! Common test utilities for building canvas states.
use fraxon::prelude::*;
use serde_json::{Value, json};

/// Builds a canvas node in the snapshot shape the editor reports.
#[allow(dead_code)]
pub fn node(id: &str, node_type: &str, label: &str, config: Value) -> Value {
    json!({
        "id": id,
        "type": node_type,
        "label": label,
        "position": { "x": 0, "y": 0 },
        "config": config,
    })
}

/// Builds an edge; the id is derived from its endpoints.
#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> Value {
    json!({
        "id": format!("{}-{}", source, target),
        "source": source,
        "target": target,
    })
}

/// Builds canvas state JSON with adjacency precomputed from `edges`, the
/// way the editor does before handing state over.
#[allow(dead_code)]
pub fn state(nodes: Vec<Value>, edges: Vec<Value>) -> Value {
    let mut connections = serde_json::Map::new();
    for n in &nodes {
        connections.insert(n["id"].as_str().unwrap().to_string(), json!([]));
    }
    for e in &edges {
        let source = e["source"].as_str().unwrap();
        if let Some(Value::Array(targets)) = connections.get_mut(source) {
            targets.push(e["target"].clone());
        }
    }
    json!({
        "timestamp": "2024-05-01T12:00:00.000Z",
        "nodes": nodes,
        "edges": edges,
        "connections": connections,
        "edgeCount": edges.len(),
    })
}

/// Builds canvas state without `connections`, so adjacency comes from edges.
#[allow(dead_code)]
pub fn state_without_connections(nodes: Vec<Value>, edges: Vec<Value>) -> Value {
    json!({ "nodes": nodes, "edges": edges })
}

/// The shop scenario: server -> model, controller -> model, route -> controller.
///
/// Expected: project "shop", schema `Product` with two fields, a single
/// `getAllProducts` action and one `GET /api/products` route.
#[allow(dead_code)]
pub fn create_shop_state() -> Value {
    state(
        vec![
            node("server-1", "server", "Server", json!({ "projectName": "shop" })),
            node(
                "model-1",
                "model",
                "Product",
                json!({ "modelName": "Product", "schema": "name: string\nprice: number" }),
            ),
            node(
                "controller-1",
                "controller",
                "Products",
                json!({ "name": "ProductController", "actions": "" }),
            ),
            node(
                "route-1",
                "route",
                "",
                json!({ "path": "/api/products", "method": "get" }),
            ),
        ],
        vec![edge("controller-1", "model-1"), edge("route-1", "controller-1")],
    )
}

/// A user-management graph with two routes under `/api/users`.
#[allow(dead_code)]
pub fn create_users_state() -> Value {
    state(
        vec![
            node(
                "model-1",
                "model",
                "User",
                json!({ "modelName": "User", "schema": "username: string\nemail: string\npassword: string" }),
            ),
            node(
                "controller-1",
                "controller",
                "Users",
                json!({ "name": "createUserController", "actions": "createUserController" }),
            ),
            node("route-1", "route", "Create user", json!({ "path": "/api/users", "method": "post" })),
            node("route-2", "route", "", json!({ "path": "/api/users/:id", "method": "GET" })),
        ],
        vec![
            edge("controller-1", "model-1"),
            edge("route-1", "controller-1"),
            edge("route-2", "controller-1"),
        ],
    )
}

#[allow(dead_code)]
pub fn compile(state: &Value) -> BackendSpecification {
    Compiler::default()
        .compile_value(state)
        .expect("Failed to compile canvas state")
}
