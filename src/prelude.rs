//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to turn canvas state into a
//! backend specification.
//!
//! # Example
//!
//! ```rust,no_run
//! use fraxon::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = GraphDocument::from_file("path/to/graph.json")?;
//! let snapshot = document.to_snapshot(None);
//!
//! let compiler = Compiler::default();
//! let spec = compiler.compile(&snapshot);
//!
//! println!("{}", spec.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{Compiler, CompilerBuilder, Convention, FieldTypePolicy};

// Canvas model
pub use crate::canvas::{
    CanvasEdge, CanvasNode, CanvasSnapshot, GraphDocument, IntoCanvas, NodeConfig, NodeKind,
    Position, RawConfig,
};

// Output model
pub use crate::spec::{
    BackendSpecification, ControllerActionSpec, FieldSpec, FieldType, HttpMethod, RouteSpec,
    SchemaSpec,
};

// Request payloads
pub use crate::payload::{DeployRequest, GenerationRequest, ServiceConfig};

// Error types
pub use crate::error::{CanvasConversionError, CompileError, DocumentError};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
