//! GraphQL Operation Client
//!
//! Turns GraphQL operations and their per-request options into HTTP requests,
//! and negotiates Automatic Persisted Queries: a hash-only request first, the
//! full document only when the server does not know the hash yet.
//!
//! # Example
//!
//! ```rust,no_run
//! use graphql_operation_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClientError> {
//!     let client = GraphqlClient::builder()
//!         .server_url("http://localhost:4000/graphql")
//!         .with_enable_auto_persisted_queries(true)
//!         .build_with_reqwest()?;
//!
//!     let response = client
//!         .operation(
//!             OperationDescriptor::query("User", "query User($id: ID!) { user(id: $id) { name } }")
//!                 .with_variables(json!({"id": "42"})),
//!         )
//!         .add_http_header("Authorization", "Bearer token")
//!         .with_can_be_batched(true)
//!         .execute()
//!         .await?;
//!
//!     println!("{:?}", response.data);
//!     Ok(())
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod use_cases;

pub use error::{ClientError, TransportError};

#[cfg(feature = "reqwest")]
pub use adapters::gateways::ReqwestTransport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{
        ApqConfig, ClientConfig, ExecutionContext, ExecutionOptionValues, ExecutionOptions,
        GraphqlError, GraphqlResponse, HttpHeader, HttpMethod, HttpRequest,
        MutableExecutionOptions, Operation, OperationDescriptor, OperationRequest, OperationType,
        ResolvedOptions, CAN_BE_BATCHED,
    };
    pub use crate::error::{ClientError, TransportError};
    pub use crate::use_cases::ports::{HttpRequestComposer, HttpTransport};
    pub use crate::use_cases::{
        ApqNegotiator, ApqState, Attempt, ClientBuilder, DefaultHttpRequestComposer,
        GraphqlClient, OperationCall,
    };
    pub use serde_json::json;
    pub use tokio_util::sync::CancellationToken;

    #[cfg(feature = "reqwest")]
    pub use crate::ReqwestTransport;
}
