use super::index::GraphView;
use super::parsing::{FieldTypePolicy, parse_schema_text};
use crate::canvas::{CanvasNode, CanvasSnapshot, NodeConfig, NodeKind};
use crate::spec::{ControllerActionSpec, HttpMethod, RouteSpec, SchemaSpec};

pub(super) const DEFAULT_PROJECT_NAME: &str = "generated-api";
const DEFAULT_MODEL_NAME: &str = "Model";
const DEFAULT_CONTROLLER_NAME: &str = "Controller";
const DEFAULT_SCHEMA_NAME: &str = "User";
const DEFAULT_ROUTE_PATH: &str = "/api/resource";
const DEFAULT_ACTION_NAME: &str = "getAll";

/// Runs the primary derivation pass over one snapshot.
///
/// Each phase reads the output of the earlier ones: controllers fall back to
/// the first schema, routes fall back to the first schema and controller.
pub(super) struct SpecBuilder<'a> {
    snapshot: &'a CanvasSnapshot,
    graph: GraphView<'a>,
    policy: FieldTypePolicy,
    max_hops: usize,
}

impl<'a> SpecBuilder<'a> {
    pub(super) fn new(snapshot: &'a CanvasSnapshot, policy: FieldTypePolicy, max_hops: usize) -> Self {
        Self {
            snapshot,
            graph: GraphView::new(snapshot),
            policy,
            max_hops,
        }
    }

    fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &'a CanvasNode> + 'a {
        self.snapshot.nodes.iter().filter(move |n| n.kind() == kind)
    }

    pub(super) fn project_name(&self) -> String {
        let configured = self.nodes_of(NodeKind::Server).next().and_then(|n| match &n.config {
            NodeConfig::Server(c) => c.project_name.clone(),
            _ => None,
        });
        configured.unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
    }

    pub(super) fn build_schemas(&self) -> Vec<SchemaSpec> {
        self.nodes_of(NodeKind::Model)
            .map(|node| {
                let name = node
                    .config
                    .model_name()
                    .or(node.label())
                    .unwrap_or(DEFAULT_MODEL_NAME);
                let fields = match &node.config {
                    NodeConfig::Model(c) => c
                        .schema
                        .as_deref()
                        .map(|text| parse_schema_text(text, self.policy))
                        .unwrap_or_default(),
                    _ => Default::default(),
                };
                SchemaSpec::new(name, fields)
            })
            .collect()
    }

    pub(super) fn build_controllers(&self, schemas: &[SchemaSpec]) -> Vec<ControllerActionSpec> {
        self.nodes_of(NodeKind::Controller)
            .flat_map(|node| {
                let schema = self
                    .model_name_near(node)
                    .or_else(|| schemas.first().map(|s| s.name.as_str()))
                    .unwrap_or(DEFAULT_SCHEMA_NAME)
                    .to_string();
                let actions: &[String] = match &node.config {
                    NodeConfig::Controller(c) => c.actions.as_slice(),
                    _ => &[],
                };
                tracing::trace!(
                    "Controller '{}' resolves to schema '{}'",
                    node.config.name().or(node.label()).unwrap_or(DEFAULT_CONTROLLER_NAME),
                    schema
                );

                if actions.is_empty() {
                    vec![ControllerActionSpec {
                        name: format!("getAll{}s", schema),
                        schema,
                        logic: "Retrieve all records.".to_string(),
                    }]
                } else {
                    actions
                        .iter()
                        .map(|action| ControllerActionSpec {
                            name: action.clone(),
                            logic: format!("Implement {} using {} model.", action, schema),
                            schema: schema.clone(),
                        })
                        .collect()
                }
            })
            .collect()
    }

    pub(super) fn build_routes(
        &self,
        schemas: &[SchemaSpec],
        controllers: &[ControllerActionSpec],
    ) -> Vec<RouteSpec> {
        let fallback_schema = schemas
            .first()
            .map_or(DEFAULT_SCHEMA_NAME, |s| s.name.as_str());
        let fallback_controller = controllers
            .first()
            .map_or(DEFAULT_ACTION_NAME, |c| c.name.as_str());

        self.nodes_of(NodeKind::Route)
            .map(|node| {
                let (path, method) = match &node.config {
                    NodeConfig::Route(c) => (c.path.as_deref(), c.method.as_deref()),
                    _ => (None, None),
                };
                let path = path.unwrap_or(DEFAULT_ROUTE_PATH).to_string();
                let method = method.map(HttpMethod::parse).unwrap_or_default();

                let handler = self
                    .graph
                    .nearest_within(&node.id, NodeKind::Controller, self.max_hops)
                    .or_else(|| self.graph.first_connected(&node.id, None));
                let controller = handler
                    .and_then(|h| h.config.name())
                    .unwrap_or(fallback_controller)
                    .to_string();
                let schema = handler
                    .and_then(|h| self.model_name_near(h))
                    .unwrap_or(fallback_schema)
                    .to_string();
                if handler.is_none() {
                    tracing::trace!("Route '{}' has no connected handler; using fallbacks", node.id);
                }

                let description = node
                    .label()
                    .map_or_else(|| format!("{} {}", method, path), str::to_string);
                RouteSpec {
                    path,
                    method,
                    schema,
                    controller,
                    description,
                }
            })
            .collect()
    }

    /// Name of the model reachable from `node`: its `modelName`, else its label.
    fn model_name_near(&self, node: &CanvasNode) -> Option<&'a str> {
        self.graph
            .nearest_within(&node.id, NodeKind::Model, self.max_hops)
            .and_then(|model| model.config.model_name().or(model.label()))
    }
}
