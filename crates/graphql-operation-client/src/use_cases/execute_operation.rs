use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::entities::{
    ApqConfig, ClientConfig, ExecutionOptionValues, ExecutionOptions, GraphqlResponse, HttpMethod,
    HttpRequest, MutableExecutionOptions, Operation, OperationRequest, ResolvedOptions,
};
use crate::error::ClientError;
use crate::use_cases::negotiate_apq::{negotiate, ApqNegotiator};
use crate::use_cases::ports::{HttpRequestComposer, HttpTransport};
use crate::use_cases::DefaultHttpRequestComposer;

/// Builder for creating clients with a fluent API.
///
/// Client-level defaults are configured with the same calls as per-request
/// options since the builder implements [`MutableExecutionOptions`].
pub struct ClientBuilder<T> {
    transport: Option<T>,
    config: ClientConfig,
}

impl ClientBuilder<()> {
    pub fn new() -> Self {
        Self {
            transport: None,
            config: ClientConfig::new(String::new()),
        }
    }
}

impl Default for ClientBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClientBuilder<T> {
    /// Set the transport implementation to use
    pub fn transport<NewT: HttpTransport>(self, transport: NewT) -> ClientBuilder<NewT> {
        ClientBuilder {
            transport: Some(transport),
            config: self.config,
        }
    }

    pub fn server_url(mut self, server_url: impl Into<String>) -> Self {
        self.config.server_url = server_url.into();
        self
    }

    /// Replace the whole configuration, defaults included
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn apq_config(mut self, apq: ApqConfig) -> Self {
        self.config.apq = apq;
        self
    }

    pub fn http_method_for_hashed_queries(mut self, method: impl Into<Option<HttpMethod>>) -> Self {
        self.config.apq.http_method_for_hashed_queries = method.into();
        self
    }

    pub fn http_method_for_document_queries(mut self, method: impl Into<Option<HttpMethod>>) -> Self {
        self.config.apq.http_method_for_document_queries = method.into();
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: impl Into<Option<u64>>) -> Self {
        self.config.timeout_ms = timeout_ms.into();
        self
    }

    fn validated_config(&self) -> Result<ClientConfig, ClientError> {
        if self.config.server_url.trim().is_empty() {
            return Err(ClientError::ConfigurationError(
                "server url is required".to_string(),
            ));
        }
        Ok(self.config.clone())
    }
}

impl<T: HttpTransport + 'static> ClientBuilder<T> {
    pub fn build(self) -> Result<GraphqlClient<T>, ClientError> {
        let config = self.validated_config()?;
        let transport = self
            .transport
            .ok_or_else(|| ClientError::ConfigurationError("transport is required".to_string()))?;
        Ok(GraphqlClient::new(transport, config))
    }
}

#[cfg(feature = "reqwest")]
impl ClientBuilder<()> {
    /// Build a client sending requests with reqwest
    pub fn build_with_reqwest(
        self,
    ) -> Result<GraphqlClient<crate::adapters::gateways::ReqwestTransport>, ClientError> {
        let config = self.validated_config()?;
        let transport = crate::adapters::gateways::ReqwestTransport::from_config(&config)?;
        Ok(GraphqlClient::new(transport, config))
    }
}

impl<T> ExecutionOptions for ClientBuilder<T> {
    fn execution_options(&self) -> &ExecutionOptionValues {
        &self.config.defaults
    }
}

impl<T> MutableExecutionOptions for ClientBuilder<T> {
    fn execution_options_mut(&mut self) -> &mut ExecutionOptionValues {
        &mut self.config.defaults
    }
}

/// GraphQL client composing requests and negotiating persisted queries.
///
/// The configuration is frozen at build time, every execution reads the same
/// snapshot. Executions share no mutable state and may run concurrently.
pub struct GraphqlClient<T> {
    transport: Arc<T>,
    composer: DefaultHttpRequestComposer,
    config: Arc<ClientConfig>,
}

impl<T> Clone for GraphqlClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            composer: self.composer.clone(),
            config: self.config.clone(),
        }
    }
}

impl GraphqlClient<()> {
    pub fn builder() -> ClientBuilder<()> {
        ClientBuilder::new()
    }
}

impl<T: HttpTransport + 'static> GraphqlClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            composer: DefaultHttpRequestComposer::new(config.server_url.clone()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start configuring a call for `operation`
    pub fn operation<O: Operation>(&self, operation: O) -> OperationCall<'_, O, T> {
        OperationCall {
            client: self,
            request: OperationRequest::new(operation),
        }
    }

    /// Resolve the request options against the client defaults
    pub fn resolve<O: Operation>(&self, request: &OperationRequest<O>) -> ResolvedOptions {
        ResolvedOptions::resolve(request, self.config.as_ref())
    }

    /// Compose the first request an execution of `request` would send
    pub fn compose<O: Operation>(&self, request: &OperationRequest<O>) -> Result<HttpRequest, ClientError> {
        let options = self.resolve(request);
        let plan = ApqNegotiator::new(&options).start().ok_or_else(|| {
            ClientError::ConfigurationError("no request to compose".to_string())
        })?;
        let attempt_options = plan.options(&options, &self.config.apq, request.operation.operation_type());
        self.composer.compose(&request.operation, &attempt_options)
    }

    pub async fn execute<O: Operation>(
        &self,
        request: OperationRequest<O>,
    ) -> Result<GraphqlResponse, ClientError> {
        self.execute_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// Execute, giving up as soon as `cancellation` fires
    pub async fn execute_with_cancellation<O: Operation>(
        &self,
        request: OperationRequest<O>,
        cancellation: &CancellationToken,
    ) -> Result<GraphqlResponse, ClientError> {
        let options = self.resolve(&request);
        negotiate(
            self.transport.as_ref(),
            &self.composer,
            &request.operation,
            &options,
            &self.config.apq,
            cancellation,
        )
        .await
    }
}

/// A configurable call bound to a client
pub struct OperationCall<'a, O, T> {
    client: &'a GraphqlClient<T>,
    request: OperationRequest<O>,
}

impl<'a, O: Operation, T: HttpTransport + 'static> OperationCall<'a, O, T> {
    pub fn into_request(self) -> OperationRequest<O> {
        self.request
    }

    pub fn compose(&self) -> Result<HttpRequest, ClientError> {
        self.client.compose(&self.request)
    }

    pub async fn execute(self) -> Result<GraphqlResponse, ClientError> {
        self.client.execute(self.request).await
    }

    pub async fn execute_with_cancellation(
        self,
        cancellation: &CancellationToken,
    ) -> Result<GraphqlResponse, ClientError> {
        self.client
            .execute_with_cancellation(self.request, cancellation)
            .await
    }
}

impl<O, T> ExecutionOptions for OperationCall<'_, O, T> {
    fn execution_options(&self) -> &ExecutionOptionValues {
        self.request.execution_options()
    }
}

impl<O, T> MutableExecutionOptions for OperationCall<'_, O, T> {
    fn execution_options_mut(&mut self) -> &mut ExecutionOptionValues {
        self.request.execution_options_mut()
    }
}
