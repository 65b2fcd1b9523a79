//! # Fraxon - Canvas to Backend Specification Compiler
//!
//! **Fraxon** turns a backend architecture drawn on a node canvas (servers,
//! routes, controllers, middleware, databases, models) into a normalized
//! backend specification: data models, controller actions and route
//! bindings, ready to hand to a code generator.
//!
//! ## Core Workflow
//!
//! 1.  **Load the canvas**: parse the editor's state JSON with
//!     [`CanvasSnapshot::from_json`](canvas::CanvasSnapshot::from_json), or load
//!     a saved [`GraphDocument`](canvas::GraphDocument) and build a snapshot from
//!     it. Custom editor formats can implement [`IntoCanvas`](canvas::IntoCanvas).
//! 2.  **Configure**: use [`Compiler::builder`](compiler::Compiler::builder) to
//!     pick the field type policy, the relationship lookup depth and the
//!     conventions to apply.
//! 3.  **Compile**: [`Compiler::compile`](compiler::Compiler::compile) is a pure
//!     function of the snapshot. Only a structurally broken state (absent, or
//!     `nodes` not an array) is an error; missing config, dangling edges and
//!     unparseable schema lines fall back to defaults.
//! 4.  **Submit**: wrap the result in a
//!     [`GenerationRequest`](payload::GenerationRequest) and post it with the
//!     HTTP client of your choice.
//!
//! ## Quick Start
//!
//! ```rust
//! use fraxon::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let state = json!({
//!         "nodes": [
//!             { "id": "server-1", "type": "server", "label": "API",
//!               "config": { "projectName": "shop" } },
//!             { "id": "model-1", "type": "model", "label": "Product",
//!               "config": { "modelName": "Product", "schema": "name: string\nprice: number" } },
//!             { "id": "controller-1", "type": "controller", "label": "Products",
//!               "config": { "name": "ProductController", "actions": "" } },
//!             { "id": "route-1", "type": "route", "label": "",
//!               "config": { "path": "/api/products", "method": "get" } }
//!         ],
//!         "edges": [
//!             { "id": "e1", "source": "controller-1", "target": "model-1" },
//!             { "id": "e2", "source": "route-1", "target": "controller-1" }
//!         ]
//!     });
//!
//!     let compiler = Compiler::default();
//!     let spec = compiler.compile_value(&state)?;
//!
//!     assert_eq!(spec.project_name, "shop");
//!     assert_eq!(spec.controllers[0].name, "getAllProducts");
//!     assert_eq!(spec.routes[0].controller, "ProductController");
//!     assert_eq!(spec.routes[0].schema, "Product");
//!
//!     let body = serde_json::to_string(&GenerationRequest::new(spec))?;
//!     println!("POST {}\n{}", ServiceConfig::from_env().generate_url(), body);
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod compiler;
pub mod error;
pub mod payload;
pub mod prelude;
pub mod spec;
