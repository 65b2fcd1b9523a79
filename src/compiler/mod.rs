use crate::canvas::CanvasSnapshot;
use crate::error::CompileError;
use crate::spec::BackendSpecification;
use itertools::Itertools;
use serde_json::Value;

mod builder;
pub mod conventions;
pub mod index;
pub mod parsing;

use builder::SpecBuilder;
pub use conventions::{Convention, default_conventions};
pub use index::{ConnectionIndex, GraphView};
pub use parsing::{FieldTypePolicy, parse_schema_text};

/// Compiles canvas snapshots into backend specifications.
///
/// A `Compiler` holds configuration only. `compile` borrows it immutably,
/// so one instance can serve any number of snapshots, from any thread.
pub struct Compiler {
    conventions: Vec<Box<dyn Convention>>,
    field_type_policy: FieldTypePolicy,
    max_hops: usize,
}

pub struct CompilerBuilder {
    conventions: Vec<Box<dyn Convention>>,
    field_type_policy: FieldTypePolicy,
    max_hops: usize,
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            conventions: default_conventions(),
            field_type_policy: FieldTypePolicy::default(),
            max_hops: 1,
        }
    }

    /// Appends a convention after the ones already registered.
    pub fn with_convention(mut self, convention: Box<dyn Convention>) -> Self {
        self.conventions.push(convention);
        self
    }

    /// Drops every registered convention, including the defaults.
    pub fn without_conventions(mut self) -> Self {
        self.conventions.clear();
        self
    }

    pub fn with_field_type_policy(mut self, policy: FieldTypePolicy) -> Self {
        self.field_type_policy = policy;
        self
    }

    /// How far relationship lookups (route -> controller, controller -> model)
    /// may travel. `1` means direct connections only. Zero is treated as one.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops.max(1);
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            conventions: self.conventions,
            field_type_policy: self.field_type_policy,
            max_hops: self.max_hops,
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Names of the registered conventions, in evaluation order.
    pub fn convention_names(&self) -> Vec<&str> {
        self.conventions.iter().map(|c| c.name()).collect()
    }

    /// Compiles canvas state JSON.
    pub fn compile_json(&self, json: &str) -> Result<BackendSpecification, CompileError> {
        let snapshot = CanvasSnapshot::from_json(json)?;
        Ok(self.compile(&snapshot))
    }

    /// Compiles canvas state given as a JSON value.
    ///
    /// Fails with [`CompileError::InvalidGraph`] when the state is absent or
    /// its `nodes` entry is not an array. Everything else degrades to defaults.
    pub fn compile_value(&self, state: &Value) -> Result<BackendSpecification, CompileError> {
        let snapshot = CanvasSnapshot::from_value(state)?;
        Ok(self.compile(&snapshot))
    }

    /// Compiles a snapshot. Pure: the same snapshot always yields the same
    /// specification.
    pub fn compile(&self, snapshot: &CanvasSnapshot) -> BackendSpecification {
        tracing::debug!(
            "Compiling canvas snapshot ({} nodes, {} edges)",
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        let builder = SpecBuilder::new(snapshot, self.field_type_policy, self.max_hops);

        let project_name = builder.project_name();
        let schemas = builder.build_schemas();
        let controllers = builder.build_controllers(&schemas);
        let routes = builder.build_routes(&schemas, &controllers);

        let mut spec = BackendSpecification {
            project_name,
            schemas,
            controllers,
            routes,
        };

        for convention in &self.conventions {
            if convention.applies(&spec) {
                tracing::debug!("Applying convention '{}'", convention.name());
                convention.apply(&mut spec);
            }
        }

        tracing::debug!(
            "Compiled '{}': schemas [{}], {} controller actions, {} routes",
            spec.project_name,
            spec.schemas.iter().map(|s| s.name.as_str()).join(", "),
            spec.controllers.len(),
            spec.routes.len()
        );
        spec
    }
}
