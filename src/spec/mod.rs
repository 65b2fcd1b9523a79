pub mod endpoint;
pub mod schema;

pub use endpoint::*;
pub use schema::*;

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The normalized backend description handed to the external generator.
///
/// Every sequence keeps the order in which the source nodes appeared on the
/// canvas, so compiling the same snapshot twice yields identical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSpecification {
    pub project_name: String,
    pub schemas: Vec<SchemaSpec>,
    pub controllers: Vec<ControllerActionSpec>,
    pub routes: Vec<RouteSpec>,
}

impl BackendSpecification {
    pub fn schema(&self, name: &str) -> Option<&SchemaSpec> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn controller(&self, name: &str) -> Option<&ControllerActionSpec> {
        self.controllers.iter().find(|c| c.name == name)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::SerializeError(e.to_string()))
    }

    /// Saves the specification as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads a previously saved specification.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| DocumentError::JsonParseError(e.to_string()))
    }
}
