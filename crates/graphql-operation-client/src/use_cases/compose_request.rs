use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::entities::{
    HttpMethod, HttpRequest, Operation, ResolvedOptions, CAN_BE_BATCHED, CAN_BE_BATCHED_VALUE,
};
use crate::error::ClientError;
use crate::use_cases::ports::HttpRequestComposer;

/// Version of the persisted query protocol sent in the extension
pub const APQ_PROTOCOL_VERSION: u32 = 1;

pub const HEADER_OPERATION_ID: &str = "X-APOLLO-OPERATION-ID";
pub const HEADER_OPERATION_NAME: &str = "X-APOLLO-OPERATION-NAME";
pub const HEADER_REQUIRE_PREFLIGHT: &str = "apollo-require-preflight";

#[derive(Serialize)]
struct PersistedQuery<'a> {
    version: u32,
    #[serde(rename = "sha256Hash")]
    sha256_hash: &'a str,
}

#[derive(Serialize)]
struct Extensions<'a> {
    #[serde(rename = "persistedQuery")]
    persisted_query: PersistedQuery<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    operation_name: &'a str,
    variables: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<Extensions<'a>>,
}

impl Payload<'_> {
    /// Query parameters in a fixed order, JSON values serialized to strings
    fn query_params(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut params = vec![
            ("operationName", self.operation_name.to_string()),
            ("variables", serde_json::to_string(&self.variables)?),
        ];
        if let Some(query) = self.query {
            params.push(("query", query.to_string()));
        }
        if let Some(extensions) = &self.extensions {
            params.push(("extensions", serde_json::to_string(extensions)?));
        }
        Ok(params)
    }
}

/// Composer building GET or POST requests against a single GraphQL endpoint
#[derive(Debug, Clone)]
pub struct DefaultHttpRequestComposer {
    server_url: String,
}

impl DefaultHttpRequestComposer {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn check_conflicts(
        &self,
        operation: &dyn Operation,
        id: &str,
        options: &ResolvedOptions,
    ) -> Result<(), ClientError> {
        if !options.send_document && !options.send_apq_extensions {
            return Err(ClientError::ConfigurationConflict(format!(
                "operation '{}' would send neither its document nor its persisted query hash",
                operation.name()
            )));
        }
        if options.send_apq_extensions && id.is_empty() {
            return Err(ClientError::ConfigurationConflict(format!(
                "operation '{}' has no id to send as a persisted query hash",
                operation.name()
            )));
        }
        if options.send_document && operation.document().trim().is_empty() {
            return Err(ClientError::ConfigurationConflict(format!(
                "operation '{}' has an empty document",
                operation.name()
            )));
        }
        Ok(())
    }

    fn get_url(&self, params: &[(&str, String)]) -> String {
        let mut url = self.server_url.clone();
        if !url.contains('?') {
            url.push('?');
        } else if !url.ends_with('?') && !url.ends_with('&') {
            url.push('&');
        }
        let encoded = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push_str(&encoded);
        url
    }
}

impl HttpRequestComposer for DefaultHttpRequestComposer {
    fn compose(
        &self,
        operation: &dyn Operation,
        options: &ResolvedOptions,
    ) -> Result<HttpRequest, ClientError> {
        let id = operation.id();
        self.check_conflicts(operation, &id, options)?;

        let payload = Payload {
            operation_name: operation.name(),
            variables: operation.variables()?,
            query: options.send_document.then(|| operation.document()),
            extensions: options.send_apq_extensions.then(|| Extensions {
                persisted_query: PersistedQuery {
                    version: APQ_PROTOCOL_VERSION,
                    sha256_hash: &id,
                },
            }),
        };

        let mut request = match options.http_method {
            HttpMethod::Get => HttpRequest::new(HttpMethod::Get, self.get_url(&payload.query_params()?))
                .with_header(HEADER_OPERATION_ID, id.as_str())
                .with_header(HEADER_OPERATION_NAME, operation.name())
                .with_header("Accept", "application/json")
                .with_header(HEADER_REQUIRE_PREFLIGHT, "true"),
            HttpMethod::Post => HttpRequest::new(HttpMethod::Post, self.server_url.as_str())
                .with_header(HEADER_OPERATION_ID, id.as_str())
                .with_header(HEADER_OPERATION_NAME, operation.name())
                .with_header("Accept", "application/json")
                .with_header("Content-Type", "application/json")
                .with_body(serde_json::to_vec(&payload)?),
        };

        request = request.with_headers(options.http_headers.iter().cloned());
        if options.can_be_batched {
            request = request.with_header(CAN_BE_BATCHED, CAN_BE_BATCHED_VALUE);
        }

        debug!(
            operation = operation.name(),
            method = %request.method,
            send_document = options.send_document,
            send_apq_extensions = options.send_apq_extensions,
            "composed GraphQL request"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        sha256_hex, ExecutionOptionValues, HttpHeader, MutableExecutionOptions, OperationDescriptor,
    };

    const URL: &str = "http://localhost:4000/graphql";
    const DOCUMENT: &str = "query User($id: ID!) { user(id: $id) { name } }";

    fn user() -> OperationDescriptor {
        OperationDescriptor::query("User", DOCUMENT).with_variables(serde_json::json!({"id": "42"}))
    }

    fn resolve(options: ExecutionOptionValues) -> ResolvedOptions {
        ResolvedOptions::resolve(&options, &ExecutionOptionValues::new())
    }

    fn body_json(request: &HttpRequest) -> Value {
        serde_json::from_slice(request.body.as_ref().unwrap()).unwrap()
    }

    #[test]
    fn test_default_post_sends_document_without_extensions() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let request = composer.compose(&user(), &ResolvedOptions::default()).unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, URL);
        assert_eq!(request.header("content-type"), Some("application/json"));
        let body = body_json(&request);
        assert_eq!(body["operationName"], "User");
        assert_eq!(body["query"], DOCUMENT);
        assert_eq!(body["variables"]["id"], "42");
        assert!(body.get("extensions").is_none());
    }

    #[test]
    fn test_operation_id_header_always_present() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let request = composer.compose(&user(), &ResolvedOptions::default()).unwrap();
        assert_eq!(request.header(HEADER_OPERATION_ID), Some(sha256_hex(DOCUMENT).as_str()));
        assert_eq!(request.header(HEADER_OPERATION_NAME), Some("User"));
    }

    #[test]
    fn test_apq_extension_shape() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = resolve(ExecutionOptionValues::new().with_send_apq_extensions(true));
        let body = body_json(&composer.compose(&user(), &options).unwrap());
        assert_eq!(
            body["extensions"],
            serde_json::json!({"persistedQuery": {"version": 1, "sha256Hash": sha256_hex(DOCUMENT)}})
        );
        assert_eq!(body["query"], DOCUMENT);
    }

    #[test]
    fn test_hash_only_omits_document() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = ResolvedOptions::default().for_attempt(false, true);
        let body = body_json(&composer.compose(&user(), &options).unwrap());
        assert!(body.get("query").is_none());
        assert!(body["extensions"]["persistedQuery"].is_object());
        assert_eq!(body["variables"]["id"], "42");
    }

    #[test]
    fn test_no_document_and_no_hash_is_conflict() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = resolve(
            ExecutionOptionValues::new()
                .with_send_document(false)
                .with_send_apq_extensions(false),
        );
        let result = composer.compose(&user(), &options);
        assert!(matches!(result, Err(ClientError::ConfigurationConflict(_))));
    }

    #[test]
    fn test_hash_without_id_is_conflict() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = ResolvedOptions::default().for_attempt(false, true);
        let result = composer.compose(&user().with_id(""), &options);
        assert!(matches!(result, Err(ClientError::ConfigurationConflict(_))));
    }

    #[test]
    fn test_empty_document_is_conflict() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let result = composer.compose(&OperationDescriptor::query("Empty", "  "), &ResolvedOptions::default());
        assert!(matches!(result, Err(ClientError::ConfigurationConflict(_))));
    }

    #[test]
    fn test_get_encodes_payload_as_query_params() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = resolve(ExecutionOptionValues::new().with_http_method(HttpMethod::Get));
        let request = composer.compose(&user(), &options).unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.body.is_none());
        assert_eq!(request.header(HEADER_REQUIRE_PREFLIGHT), Some("true"));
        assert!(request.url.starts_with("http://localhost:4000/graphql?operationName=User&variables="));
        assert!(request.url.contains(&format!("query={}", urlencoding::encode(DOCUMENT))));
        assert!(request.url.contains("%7B%22id%22%3A%2242%22%7D"));
        assert!(!request.url.contains("extensions="));
    }

    #[test]
    fn test_get_hash_only_carries_extensions() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = ResolvedOptions::default()
            .for_attempt(false, true)
            .with_http_method(HttpMethod::Get);
        let request = composer.compose(&user(), &options).unwrap();
        assert!(!request.url.contains("query="));
        assert!(request.url.contains("extensions="));
        assert!(request.url.contains(&sha256_hex(DOCUMENT)));
    }

    #[test]
    fn test_get_appends_to_existing_query_string() {
        let composer = DefaultHttpRequestComposer::new("http://localhost/graphql?tenant=a");
        let options = resolve(ExecutionOptionValues::new().with_http_method(HttpMethod::Get));
        let request = composer.compose(&user(), &options).unwrap();
        assert!(request.url.starts_with("http://localhost/graphql?tenant=a&operationName=User"));
    }

    #[test]
    fn test_configured_headers_kept_in_order_with_duplicates() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = resolve(
            ExecutionOptionValues::new()
                .add_http_header("X-Tag", "first")
                .add_http_header("X-Tag", "second"),
        );
        let request = composer.compose(&user(), &options).unwrap();
        assert_eq!(request.header_values("X-Tag").collect::<Vec<_>>(), vec!["first", "second"]);
        let position = request.headers.iter().position(|h| h.is("X-Tag")).unwrap();
        assert_eq!(request.headers[position], HttpHeader::new("X-Tag", "first"));
    }

    #[test]
    fn test_batching_header_when_batchable() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = resolve(ExecutionOptionValues::new().with_can_be_batched(true));
        let request = composer.compose(&user(), &options).unwrap();
        assert_eq!(request.header("X-APOLLO-CAN-BE-BATCHED"), Some("true"));
        assert!(request
            .headers
            .iter()
            .any(|h| h.name == "X-APOLLO-CAN-BE-BATCHED" && h.value == "true"));
    }

    #[test]
    fn test_batching_header_absent_when_false_or_unset() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let unset = composer.compose(&user(), &ResolvedOptions::default()).unwrap();
        assert_eq!(unset.header(CAN_BE_BATCHED), None);
        let explicit = resolve(ExecutionOptionValues::new().with_can_be_batched(false));
        let request = composer.compose(&user(), &explicit).unwrap();
        assert_eq!(request.header(CAN_BE_BATCHED), None);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = DefaultHttpRequestComposer::new(URL);
        let options = ResolvedOptions::default();
        assert_eq!(
            composer.compose(&user(), &options).unwrap(),
            composer.compose(&user(), &options).unwrap()
        );
    }
}
