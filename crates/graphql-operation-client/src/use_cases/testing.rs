use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::entities::{GraphqlResponse, HttpRequest};
use crate::error::TransportError;
use crate::use_cases::ports::HttpTransport;

/// Transport replaying canned results and recording every request it sees
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<GraphqlResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    pending_when_exhausted: bool,
}

impl ScriptedTransport {
    pub(crate) fn new(
        responses: impl IntoIterator<Item = Result<GraphqlResponse, TransportError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            pending_when_exhausted: false,
        }
    }

    /// A transport whose requests never complete
    pub(crate) fn pending() -> Self {
        Self::then_pending([])
    }

    /// Replay `responses`, then leave every further request pending
    pub(crate) fn then_pending(
        responses: impl IntoIterator<Item = Result<GraphqlResponse, TransportError>>,
    ) -> Self {
        Self {
            pending_when_exhausted: true,
            ..Self::new(responses)
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<GraphqlResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None if self.pending_when_exhausted => std::future::pending().await,
            None => Err(TransportError::Decode("no scripted response left".to_string())),
        }
    }
}
