use serde::{Deserialize, Serialize};
use serde_json::Value;

const PERSISTED_QUERY_NOT_FOUND: &str = "PersistedQueryNotFound";
const PERSISTED_QUERY_NOT_FOUND_CODE: &str = "PERSISTED_QUERY_NOT_FOUND";
const PERSISTED_QUERY_NOT_SUPPORTED: &str = "PersistedQueryNotSupported";
const PERSISTED_QUERY_NOT_SUPPORTED_CODE: &str = "PERSISTED_QUERY_NOT_SUPPORTED";

/// A GraphQL error entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.extensions = Some(serde_json::json!({"code": code.into()}));
        self
    }

    /// `extensions.code`, if the server sent one
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|extensions| extensions.get("code"))
            .and_then(Value::as_str)
    }

    /// The server has no document registered for the hash it was sent
    pub fn is_persisted_query_not_found(&self) -> bool {
        self.message.eq_ignore_ascii_case(PERSISTED_QUERY_NOT_FOUND)
            || self.code() == Some(PERSISTED_QUERY_NOT_FOUND_CODE)
    }

    /// The server does not implement persisted queries at all
    pub fn is_persisted_query_not_supported(&self) -> bool {
        self.message.eq_ignore_ascii_case(PERSISTED_QUERY_NOT_SUPPORTED)
            || self.code() == Some(PERSISTED_QUERY_NOT_SUPPORTED_CODE)
    }
}

/// A GraphQL response as delivered by a transport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlResponse {
    pub fn new(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn from_errors(errors: impl IntoIterator<Item = GraphqlError>) -> Self {
        Self {
            errors: errors.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_error(mut self, error: GraphqlError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors present and no data: the request as a whole was rejected
    pub fn is_request_error(&self) -> bool {
        !self.errors.is_empty() && self.data.as_ref().map_or(true, Value::is_null)
    }

    pub fn is_persisted_query_not_found(&self) -> bool {
        self.errors.iter().any(GraphqlError::is_persisted_query_not_found)
    }

    pub fn is_persisted_query_not_supported(&self) -> bool {
        self.errors
            .iter()
            .any(GraphqlError::is_persisted_query_not_supported)
    }
}
