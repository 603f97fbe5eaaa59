mod compose_request;
mod execute_operation;
mod negotiate_apq;
pub mod ports;
#[cfg(test)]
pub(crate) mod testing;

pub use compose_request::{
    DefaultHttpRequestComposer, APQ_PROTOCOL_VERSION, HEADER_OPERATION_ID, HEADER_OPERATION_NAME,
    HEADER_REQUIRE_PREFLIGHT,
};
pub use execute_operation::{ClientBuilder, GraphqlClient, OperationCall};
pub use negotiate_apq::{
    negotiate, ApqNegotiator, ApqState, Attempt, AttemptOutcome, AttemptPlan,
};
