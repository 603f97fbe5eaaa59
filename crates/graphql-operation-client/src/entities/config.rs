use serde::{Deserialize, Serialize};

use super::{ExecutionOptionValues, ExecutionOptions, HttpMethod};
use crate::error::ClientError;

/// HTTP methods used by the two APQ attempts.
///
/// `None` keeps the method resolved from the execution options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApqConfig {
    /// Method for the hash-only attempt
    pub http_method_for_hashed_queries: Option<HttpMethod>,
    /// Method for the hash + document attempt
    pub http_method_for_document_queries: Option<HttpMethod>,
}

/// Client-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub server_url: String,
    #[serde(default)]
    pub defaults: ExecutionOptionValues,
    #[serde(default)]
    pub apq: ApqConfig,
    /// Request timeout applied by the transport, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            defaults: ExecutionOptionValues::new(),
            apq: ApqConfig::default(),
            timeout_ms: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        let config: ClientConfig = serde_json::from_str(json)
            .map_err(|e| ClientError::ConfigurationError(e.to_string()))?;
        if config.server_url.trim().is_empty() {
            return Err(ClientError::ConfigurationError(
                "serverUrl must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

impl ExecutionOptions for ClientConfig {
    fn execution_options(&self) -> &ExecutionOptionValues {
        &self.defaults
    }
}
