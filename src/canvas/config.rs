//! Typed per-node configuration.
//!
//! The canvas forms emit a free-form key/value object for every node. It is
//! read once, here, into a variant keyed by node type so the compiler never
//! looks up configuration by string key.

use super::definition::NodeKind;
use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;

/// Configuration object exactly as the canvas stores it.
pub type RawConfig = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
    pub name: Option<String>,
    pub project_name: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteConfig {
    pub name: Option<String>,
    pub path: Option<String>,
    /// HTTP method as typed into the form. Case is normalized at compile time.
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerConfig {
    pub name: Option<String>,
    /// Action names from the comma-separated `actions` field, trimmed, blanks removed.
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiddlewareConfig {
    pub name: Option<String>,
    /// One of `auth`, `validation`, `logging`, `error`, `custom` in practice; kept as text.
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseConfig {
    pub name: Option<String>,
    pub db_name: Option<String>,
    pub db_type: Option<String>,
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    pub name: Option<String>,
    pub model_name: Option<String>,
    /// Newline-delimited `name: type` declarations.
    pub schema: Option<String>,
}

/// Configuration of a node, tagged by the node's type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Server(ServerConfig),
    Route(RouteConfig),
    Controller(ControllerConfig),
    Middleware(MiddlewareConfig),
    Database(DatabaseConfig),
    Model(ModelConfig),
    Other {
        node_type: String,
        fields: IndexMap<String, String>,
    },
}

impl NodeConfig {
    /// Reads a raw config object for a node of the given type name.
    pub fn from_raw(node_type: &str, raw: &RawConfig) -> Self {
        let text = |key: &str| raw.get(key).and_then(config_text);
        match NodeKind::from_type_name(node_type) {
            NodeKind::Server => NodeConfig::Server(ServerConfig {
                name: text("name"),
                project_name: text("projectName"),
                host: text("host"),
                port: text("port"),
            }),
            NodeKind::Route => NodeConfig::Route(RouteConfig {
                name: text("name"),
                path: text("path"),
                method: text("method"),
            }),
            NodeKind::Controller => NodeConfig::Controller(ControllerConfig {
                name: text("name"),
                actions: text("actions")
                    .map(|list| split_actions(&list))
                    .unwrap_or_default(),
            }),
            NodeKind::Middleware => NodeConfig::Middleware(MiddlewareConfig {
                name: text("name"),
                kind: text("type"),
            }),
            NodeKind::Database => NodeConfig::Database(DatabaseConfig {
                name: text("name"),
                db_name: text("dbName"),
                db_type: text("dbType"),
                connection_string: text("connectionString"),
            }),
            NodeKind::Model => NodeConfig::Model(ModelConfig {
                name: text("name"),
                model_name: text("modelName"),
                schema: text("schema"),
            }),
            NodeKind::Other => NodeConfig::Other {
                node_type: node_type.to_string(),
                fields: raw
                    .iter()
                    .filter_map(|(key, value)| config_text(value).map(|v| (key.clone(), v)))
                    .collect(),
            },
        }
    }

    /// Writes the configuration back into the canvas' key/value shape.
    pub fn to_raw(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        let mut put = |key: &str, value: &Option<String>| {
            if let Some(v) = value {
                raw.insert(key.to_string(), Value::String(v.clone()));
            }
        };
        match self {
            NodeConfig::Server(c) => {
                put("name", &c.name);
                put("projectName", &c.project_name);
                put("host", &c.host);
                put("port", &c.port);
            }
            NodeConfig::Route(c) => {
                put("name", &c.name);
                put("path", &c.path);
                put("method", &c.method);
            }
            NodeConfig::Controller(c) => {
                put("name", &c.name);
                let actions = (!c.actions.is_empty()).then(|| c.actions.iter().join(", "));
                put("actions", &actions);
            }
            NodeConfig::Middleware(c) => {
                put("name", &c.name);
                put("type", &c.kind);
            }
            NodeConfig::Database(c) => {
                put("name", &c.name);
                put("dbName", &c.db_name);
                put("dbType", &c.db_type);
                put("connectionString", &c.connection_string);
            }
            NodeConfig::Model(c) => {
                put("name", &c.name);
                put("modelName", &c.model_name);
                put("schema", &c.schema);
            }
            NodeConfig::Other { fields, .. } => {
                for (key, value) in fields {
                    put(key, &Some(value.clone()));
                }
            }
        }
        raw
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Server(_) => NodeKind::Server,
            NodeConfig::Route(_) => NodeKind::Route,
            NodeConfig::Controller(_) => NodeKind::Controller,
            NodeConfig::Middleware(_) => NodeKind::Middleware,
            NodeConfig::Database(_) => NodeKind::Database,
            NodeConfig::Model(_) => NodeKind::Model,
            NodeConfig::Other { .. } => NodeKind::Other,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            NodeConfig::Other { node_type, .. } => node_type,
            typed => typed.kind().as_str(),
        }
    }

    /// The `name` field. Any node type may carry one, whether or not its
    /// form shows it; a route handler is named by it whatever its type.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeConfig::Server(c) => c.name.as_deref(),
            NodeConfig::Route(c) => c.name.as_deref(),
            NodeConfig::Controller(c) => c.name.as_deref(),
            NodeConfig::Middleware(c) => c.name.as_deref(),
            NodeConfig::Database(c) => c.name.as_deref(),
            NodeConfig::Model(c) => c.name.as_deref(),
            NodeConfig::Other { fields, .. } => fields.get("name").map(String::as_str),
        }
    }

    /// The configured model name, for model nodes.
    pub fn model_name(&self) -> Option<&str> {
        match self {
            NodeConfig::Model(c) => c.model_name.as_deref(),
            _ => None,
        }
    }
}

/// Converts a raw config value to text, treating falsy values as absent.
///
/// Empty strings, `false`, `0`, `null` and objects are absent. Numbers and
/// `true` are stringified; arrays are joined with commas.
pub(crate) fn config_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| config_text(item).unwrap_or_default())
            .join(","),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn split_actions(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|action| !action.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_controller_actions_are_split_and_trimmed() {
        let config = NodeConfig::from_raw(
            "controller",
            &raw(json!({ "name": "UserController", "actions": " getUsers, ,createUser ,  " })),
        );
        match config {
            NodeConfig::Controller(c) => {
                assert_eq!(c.name.as_deref(), Some("UserController"));
                assert_eq!(c.actions, vec!["getUsers", "createUser"]);
            }
            other => panic!("Expected controller config, got {:?}", other),
        }
    }

    #[test]
    fn test_falsy_values_are_absent() {
        assert_eq!(config_text(&json!("")), None);
        assert_eq!(config_text(&json!(null)), None);
        assert_eq!(config_text(&json!(false)), None);
        assert_eq!(config_text(&json!(0)), None);
        assert_eq!(config_text(&json!({ "a": 1 })), None);
        assert_eq!(config_text(&json!(3000)).as_deref(), Some("3000"));
        assert_eq!(config_text(&json!(["a", "b"])).as_deref(), Some("a,b"));
    }

    #[test]
    fn test_unknown_type_keeps_fields() {
        let config = NodeConfig::from_raw("queue", &raw(json!({ "name": "jobs", "depth": 4 })));
        assert_eq!(config.kind(), NodeKind::Other);
        assert_eq!(config.type_name(), "queue");
        assert_eq!(config.name(), Some("jobs"));
        assert_eq!(config.to_raw().get("depth"), Some(&json!("4")));
    }

    #[test]
    fn test_name_is_kept_for_every_type() {
        for node_type in ["server", "route", "controller", "middleware", "database", "model", "queue"] {
            let config = NodeConfig::from_raw(node_type, &raw(json!({ "name": "handler" })));
            assert_eq!(config.name(), Some("handler"), "name lost for {}", node_type);
            assert_eq!(config.to_raw().get("name"), Some(&json!("handler")));
        }
    }

    #[test]
    fn test_middleware_type_key_round_trips() {
        let original = raw(json!({ "name": "Authentication", "type": "auth" }));
        let config = NodeConfig::from_raw("middleware", &original);
        assert_eq!(config.name(), Some("Authentication"));
        assert_eq!(config.to_raw(), original);
    }
}
