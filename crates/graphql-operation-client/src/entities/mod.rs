mod config;
mod execution_context;
mod execution_options;
mod graphql_response;
mod header;
mod http_request;
mod method;
mod operation;
mod operation_request;

pub use config::{ApqConfig, ClientConfig};
pub use execution_context::ExecutionContext;
pub use execution_options::{
    ExecutionOptionValues, ExecutionOptions, MutableExecutionOptions, ResolvedOptions,
    CAN_BE_BATCHED, CAN_BE_BATCHED_VALUE,
};
pub use graphql_response::{GraphqlError, GraphqlResponse};
pub use header::HttpHeader;
pub use http_request::HttpRequest;
pub use method::HttpMethod;
pub use operation::{sha256_hex, Operation, OperationDescriptor, OperationType};
pub use operation_request::OperationRequest;
