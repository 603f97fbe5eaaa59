use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::entities::{ClientConfig, GraphqlResponse, HttpMethod, HttpRequest};
use crate::error::{ClientError, TransportError};
use crate::use_cases::ports::HttpTransport;

const MAX_ERROR_BODY_LEN: usize = 4096;

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network {
            message: err.to_string(),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_ERROR_BODY_LEN {
        let mut end = MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push('…');
    }
    body
}

/// Reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Build a reqwest client honoring `timeout_ms`
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::ConfigurationError(e.to_string()))?;
        Ok(Self::new(http))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<GraphqlResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.http.request(method, &request.url);
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "received GraphQL response");

        match serde_json::from_slice::<GraphqlResponse>(&bytes) {
            Ok(parsed) if status.is_success() || !parsed.errors.is_empty() => Ok(parsed),
            Ok(_) => Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&bytes),
            }),
            Err(_) if !status.is_success() => Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&bytes),
            }),
            Err(e) => Err(TransportError::Decode(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(truncate_body(b"bad gateway"), "bad gateway");
    }

    #[test]
    fn test_truncate_body_long() {
        let long = vec![b'a'; MAX_ERROR_BODY_LEN + 10];
        let body = truncate_body(&long);
        assert!(body.ends_with('…'));
        assert_eq!(body.chars().count(), MAX_ERROR_BODY_LEN + 1);
    }

    #[test]
    fn test_from_config_with_timeout() {
        let mut config = ClientConfig::new("http://localhost/graphql");
        config.timeout_ms = Some(250);
        assert!(ReqwestTransport::from_config(&config).is_ok());
    }
}
