use crate::entities::{HttpRequest, Operation, ResolvedOptions};
use crate::error::ClientError;

/// Trait for turning an operation and its resolved options into an HTTP request
pub trait HttpRequestComposer: Send + Sync {
    fn compose(
        &self,
        operation: &dyn Operation,
        options: &ResolvedOptions,
    ) -> Result<HttpRequest, ClientError>;
}
