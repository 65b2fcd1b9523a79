use serde::{Deserialize, Serialize};
use std::fmt;

/// One controller action the generator should implement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerActionSpec {
    pub name: String,
    /// Name of the `SchemaSpec` this action operates on.
    pub schema: String,
    /// Natural-language description of the intended behavior.
    pub logic: String,
}

/// HTTP method of a route. Unknown methods are kept, uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Other(String),
}

impl HttpMethod {
    /// Parses a method name in any case.
    pub fn parse(method: &str) -> Self {
        match method.to_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Other(method) => method,
        }
    }
}

impl From<String> for HttpMethod {
    fn from(method: String) -> Self {
        HttpMethod::parse(&method)
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A route binding derived from a `route` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub path: String,
    pub method: HttpMethod,
    pub schema: String,
    /// Name of the controller (or controller action) handling this route.
    pub controller: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("Patch"), HttpMethod::Patch);
        assert_eq!(HttpMethod::parse("options"), HttpMethod::Other("OPTIONS".to_string()));
        assert_eq!(HttpMethod::parse("options").to_string(), "OPTIONS");
    }

    #[test]
    fn test_method_serializes_as_uppercase_text() {
        let json = serde_json::to_string(&HttpMethod::Delete).unwrap();
        assert_eq!(json, "\"DELETE\"");
        let back: HttpMethod = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(back, HttpMethod::Delete);
    }
}
