use async_trait::async_trait;

use crate::entities::{GraphqlResponse, HttpRequest};
use crate::error::TransportError;

/// Trait for HTTP transports that carry composed requests to a GraphQL server
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and decode the GraphQL response.
    ///
    /// A body carrying GraphQL errors is returned as `Ok` even when the HTTP
    /// status is not 2xx, so protocol errors can be told apart from failures.
    async fn execute(&self, request: HttpRequest) -> Result<GraphqlResponse, TransportError>;
}
