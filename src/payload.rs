//! Request bodies for the external generation and deployment service.
//!
//! This module only shapes the payloads and endpoint URLs; sending them is
//! up to the caller's HTTP client.

use crate::canvas::CanvasSnapshot;
use crate::compiler::Compiler;
use crate::error::CompileError;
use crate::spec::BackendSpecification;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const BACKEND_URL_ENV: &str = "FRAXON_BACKEND_URL";
pub const PROJECT_NAME_ENV: &str = "FRAXON_PROJECT_NAME";

pub const GENERATE_PATH: &str = "/api/generate";
pub const DEPLOY_PATH: &str = "/api/deploy/render";

/// Where the remote service lives and which project to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub backend_url: String,
    pub project_name: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL, None)
    }
}

impl ServiceConfig {
    /// Trailing slashes are stripped from the URL; an empty project name is absent.
    pub fn new(backend_url: impl Into<String>, project_name: Option<String>) -> Self {
        let backend_url: String = backend_url.into();
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            project_name: project_name.filter(|name| !name.trim().is_empty()),
        }
    }

    /// Reads `FRAXON_BACKEND_URL` and `FRAXON_PROJECT_NAME`.
    pub fn from_env() -> Self {
        let backend_url = env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self::new(backend_url, env::var(PROJECT_NAME_ENV).ok())
    }

    pub fn generate_url(&self) -> String {
        format!("{}{}", self.backend_url, GENERATE_PATH)
    }

    pub fn deploy_url(&self) -> String {
        format!("{}{}", self.backend_url, DEPLOY_PATH)
    }

    pub fn deploy_request(&self) -> DeployRequest {
        DeployRequest {
            project_name: self.project_name.clone(),
        }
    }
}

/// Body of the generation request: `{ "graphState": <specification> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub graph_state: BackendSpecification,
}

impl GenerationRequest {
    pub fn new(graph_state: BackendSpecification) -> Self {
        Self { graph_state }
    }

    /// Compiles `snapshot` and wraps the result.
    pub fn from_snapshot(compiler: &Compiler, snapshot: &CanvasSnapshot) -> Self {
        Self::new(compiler.compile(snapshot))
    }

    /// Compiles raw canvas state and wraps the result. A structural failure
    /// means there is nothing to submit.
    pub fn from_state(compiler: &Compiler, state: &serde_json::Value) -> Result<Self, CompileError> {
        compiler.compile_value(state).map(Self::new)
    }
}

/// Body of the deploy trigger. `projectName` is omitted when not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let config = ServiceConfig::new("https://gen.example.com/", None);
        assert_eq!(config.generate_url(), "https://gen.example.com/api/generate");
        assert_eq!(config.deploy_url(), "https://gen.example.com/api/deploy/render");
    }

    #[test]
    fn test_deploy_request_omits_missing_project_name() {
        let empty = ServiceConfig::new(DEFAULT_BACKEND_URL, Some("  ".to_string()));
        assert_eq!(serde_json::to_value(empty.deploy_request()).unwrap(), json!({}));

        let named = ServiceConfig::new(DEFAULT_BACKEND_URL, Some("shop".to_string()));
        assert_eq!(
            serde_json::to_value(named.deploy_request()).unwrap(),
            json!({ "projectName": "shop" })
        );
    }

    #[test]
    fn test_generation_request_wraps_graph_state() {
        let compiler = Compiler::default();
        let request = GenerationRequest::from_state(&compiler, &json!({ "nodes": [], "edges": [] })).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "graphState": {
                    "projectName": "generated-api",
                    "schemas": [],
                    "controllers": [],
                    "routes": []
                }
            })
        );
    }

    #[test]
    fn test_structural_failure_blocks_request() {
        let compiler = Compiler::default();
        assert!(GenerationRequest::from_state(&compiler, &json!(null)).is_err());
    }
}
