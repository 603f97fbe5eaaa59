use serde::{Deserialize, Serialize};

use super::{ExecutionContext, HttpHeader, HttpMethod};

/// Header marking a request as eligible for batching.
///
/// Batching interceptors match on this exact name, it must not be changed.
pub const CAN_BE_BATCHED: &str = "X-APOLLO-CAN-BE-BATCHED";

/// Value sent with [`CAN_BE_BATCHED`] when a request may be batched
pub const CAN_BE_BATCHED_VALUE: &str = "true";

/// The per-request knobs, every one of them optional.
///
/// `None` means "not configured here", which lets a request override a
/// client-level default without knowing it. `Some(false)` and
/// `Some(vec![])` are explicit values and are kept distinct from `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionOptionValues {
    #[serde(skip)]
    pub execution_context: ExecutionContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<HttpMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_headers: Option<Vec<HttpHeader>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_apq_extensions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_document: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_auto_persisted_queries: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_be_batched: Option<bool>,
}

impl ExecutionOptionValues {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read-only view of the execution options.
///
/// Implementors embed an [`ExecutionOptionValues`] and expose it through
/// [`ExecutionOptions::execution_options`]; the accessors are provided.
pub trait ExecutionOptions {
    fn execution_options(&self) -> &ExecutionOptionValues;

    fn execution_context(&self) -> &ExecutionContext {
        &self.execution_options().execution_context
    }

    /// The HTTP method to use for the request
    fn http_method(&self) -> Option<HttpMethod> {
        self.execution_options().http_method
    }

    /// HTTP headers to send, in order
    fn http_headers(&self) -> Option<&[HttpHeader]> {
        self.execution_options().http_headers.as_deref()
    }

    /// Whether to send the persisted query extension
    fn send_apq_extensions(&self) -> Option<bool> {
        self.execution_options().send_apq_extensions
    }

    /// Whether to send the document
    fn send_document(&self) -> Option<bool> {
        self.execution_options().send_document
    }

    /// Whether to try a hash-only request first
    fn enable_auto_persisted_queries(&self) -> Option<bool> {
        self.execution_options().enable_auto_persisted_queries
    }

    fn can_be_batched(&self) -> Option<bool> {
        self.execution_options().can_be_batched
    }
}

/// Fluent configuration of execution options.
///
/// Every mutator consumes and returns `Self`, so a chain of calls keeps the
/// caller's concrete type: configuring a `ClientBuilder` yields a
/// `ClientBuilder`, configuring an `OperationCall` yields an `OperationCall`.
/// Passing `None` resets a field to "not configured".
pub trait MutableExecutionOptions: ExecutionOptions + Sized {
    fn execution_options_mut(&mut self) -> &mut ExecutionOptionValues;

    /// Merge `execution_context` into the current context
    fn add_execution_context(mut self, execution_context: ExecutionContext) -> Self {
        let options = self.execution_options_mut();
        options.execution_context = options.execution_context.merge(&execution_context);
        self
    }

    /// Use GET or POST. GET requests are easier to cache, POST requests can
    /// carry bigger documents.
    fn with_http_method(mut self, http_method: impl Into<Option<HttpMethod>>) -> Self {
        self.execution_options_mut().http_method = http_method.into();
        self
    }

    /// Replace the configured headers
    fn with_http_headers(mut self, http_headers: impl Into<Option<Vec<HttpHeader>>>) -> Self {
        self.execution_options_mut().http_headers = http_headers.into();
        self
    }

    /// Append one header, keeping the ones already configured
    fn add_http_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.execution_options_mut()
            .http_headers
            .get_or_insert_with(Vec::new)
            .push(HttpHeader::new(name, value));
        self
    }

    fn with_send_apq_extensions(mut self, send_apq_extensions: impl Into<Option<bool>>) -> Self {
        self.execution_options_mut().send_apq_extensions = send_apq_extensions.into();
        self
    }

    fn with_send_document(mut self, send_document: impl Into<Option<bool>>) -> Self {
        self.execution_options_mut().send_document = send_document.into();
        self
    }

    fn with_enable_auto_persisted_queries(mut self, enable: impl Into<Option<bool>>) -> Self {
        self.execution_options_mut().enable_auto_persisted_queries = enable.into();
        self
    }

    fn with_can_be_batched(mut self, can_be_batched: impl Into<Option<bool>>) -> Self {
        self.execution_options_mut().can_be_batched = can_be_batched.into();
        self
    }
}

impl ExecutionOptions for ExecutionOptionValues {
    fn execution_options(&self) -> &ExecutionOptionValues {
        self
    }
}

impl MutableExecutionOptions for ExecutionOptionValues {
    fn execution_options_mut(&mut self) -> &mut ExecutionOptionValues {
        self
    }
}

/// Options with every default applied.
///
/// Precedence is request value, then client default, then the built-in
/// default listed on each constant.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub execution_context: ExecutionContext,
    pub http_method: HttpMethod,
    pub http_headers: Vec<HttpHeader>,
    pub send_apq_extensions: bool,
    pub send_document: bool,
    pub enable_auto_persisted_queries: bool,
    pub can_be_batched: bool,
}

impl ResolvedOptions {
    pub const DEFAULT_HTTP_METHOD: HttpMethod = HttpMethod::Post;
    pub const DEFAULT_SEND_APQ_EXTENSIONS: bool = false;
    pub const DEFAULT_SEND_DOCUMENT: bool = true;
    pub const DEFAULT_ENABLE_AUTO_PERSISTED_QUERIES: bool = false;
    pub const DEFAULT_CAN_BE_BATCHED: bool = false;

    /// Resolve `request` against the client-level `defaults`.
    ///
    /// A request header list, even an empty one, replaces the client headers.
    /// Execution contexts are merged with the request context winning.
    pub fn resolve(request: &dyn ExecutionOptions, defaults: &dyn ExecutionOptions) -> Self {
        let http_headers = request
            .http_headers()
            .or(defaults.http_headers())
            .unwrap_or_default()
            .to_vec();

        Self {
            execution_context: defaults.execution_context().merge(request.execution_context()),
            http_method: request
                .http_method()
                .or(defaults.http_method())
                .unwrap_or(Self::DEFAULT_HTTP_METHOD),
            http_headers,
            send_apq_extensions: request
                .send_apq_extensions()
                .or(defaults.send_apq_extensions())
                .unwrap_or(Self::DEFAULT_SEND_APQ_EXTENSIONS),
            send_document: request
                .send_document()
                .or(defaults.send_document())
                .unwrap_or(Self::DEFAULT_SEND_DOCUMENT),
            enable_auto_persisted_queries: request
                .enable_auto_persisted_queries()
                .or(defaults.enable_auto_persisted_queries())
                .unwrap_or(Self::DEFAULT_ENABLE_AUTO_PERSISTED_QUERIES),
            can_be_batched: request
                .can_be_batched()
                .or(defaults.can_be_batched())
                .unwrap_or(Self::DEFAULT_CAN_BE_BATCHED),
        }
    }

    /// Override the document and extension toggles for one APQ attempt
    pub fn for_attempt(&self, send_document: bool, send_apq_extensions: bool) -> Self {
        Self {
            send_document,
            send_apq_extensions,
            ..self.clone()
        }
    }

    pub fn with_http_method(mut self, http_method: HttpMethod) -> Self {
        self.http_method = http_method;
        self
    }
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self::resolve(&ExecutionOptionValues::new(), &ExecutionOptionValues::new())
    }
}
