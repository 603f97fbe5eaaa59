use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::entities::{
    ApqConfig, GraphqlResponse, HttpMethod, Operation, OperationType, ResolvedOptions,
};
use crate::error::{ClientError, TransportError};
use crate::use_cases::ports::{HttpRequestComposer, HttpTransport};

/// Which request of an operation execution produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attempt {
    /// The only request sent when persisted queries are disabled
    Single,
    /// Hash-only request
    Optimistic,
    /// Hash + document request after a miss
    Fallback,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attempt::Single => write!(f, "single"),
            Attempt::Optimistic => write!(f, "optimistic"),
            Attempt::Fallback => write!(f, "fallback"),
        }
    }
}

/// States of one operation execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApqState {
    Init,
    /// Persisted queries disabled, one request with the configured options
    Direct,
    Optimistic,
    Fallback,
    Done,
    Failed,
    Cancelled,
}

impl ApqState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ApqState::Done | ApqState::Failed | ApqState::Cancelled)
    }
}

/// How an attempt ended, as seen by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    PersistedQueryNotFound,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Start { apq_enabled: bool },
    Outcome(AttemptOutcome),
    Cancel,
}

fn transition(state: ApqState, event: Event) -> ApqState {
    use ApqState::*;
    use AttemptOutcome::*;

    match (state, event) {
        (Init, Event::Start { apq_enabled: true }) => Optimistic,
        (Init, Event::Start { apq_enabled: false }) => Direct,
        (Direct | Optimistic | Fallback, Event::Outcome(Success)) => Done,
        (Optimistic, Event::Outcome(PersistedQueryNotFound)) => Fallback,
        (Direct | Optimistic | Fallback, Event::Outcome(_)) => Failed,
        (Init | Direct | Optimistic | Fallback, Event::Cancel) => Cancelled,
        (state, _) => state,
    }
}

/// The request to send for one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPlan {
    pub attempt: Attempt,
    pub send_document: bool,
    pub send_apq_extensions: bool,
}

impl AttemptPlan {
    /// Options for this attempt.
    ///
    /// APQ attempts use the per-phase method from `apq` when set. Mutations
    /// are always POSTed while negotiating.
    pub fn options(
        &self,
        base: &ResolvedOptions,
        apq: &ApqConfig,
        operation_type: OperationType,
    ) -> ResolvedOptions {
        let phase_method = match self.attempt {
            Attempt::Single => return base.clone(),
            Attempt::Optimistic => apq.http_method_for_hashed_queries,
            Attempt::Fallback => apq.http_method_for_document_queries,
        };
        let method = if operation_type == OperationType::Mutation {
            HttpMethod::Post
        } else {
            phase_method.unwrap_or(base.http_method)
        };
        base.for_attempt(self.send_document, self.send_apq_extensions)
            .with_http_method(method)
    }
}

/// State machine for a single operation execution.
///
/// Issues at most two attempts: the optimistic one and, after a
/// "not found" answer, one fallback.
#[derive(Debug, Clone)]
pub struct ApqNegotiator {
    state: ApqState,
    apq_enabled: bool,
    send_document: bool,
    send_apq_extensions: bool,
    attempts: Vec<Attempt>,
}

impl ApqNegotiator {
    pub fn new(options: &ResolvedOptions) -> Self {
        Self {
            state: ApqState::Init,
            apq_enabled: options.enable_auto_persisted_queries,
            send_document: options.send_document,
            send_apq_extensions: options.send_apq_extensions,
            attempts: Vec::with_capacity(2),
        }
    }

    pub fn state(&self) -> ApqState {
        self.state
    }

    /// Attempts issued so far, in order
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Leave `Init` and return the first attempt
    pub fn start(&mut self) -> Option<AttemptPlan> {
        self.apply(Event::Start {
            apq_enabled: self.apq_enabled,
        })
    }

    /// Feed the outcome of the current attempt, returning the next one if any
    pub fn on_outcome(&mut self, outcome: AttemptOutcome) -> Option<AttemptPlan> {
        self.apply(Event::Outcome(outcome))
    }

    pub fn cancel(&mut self) {
        self.apply(Event::Cancel);
    }

    /// The attempt currently in flight, if any
    pub fn current_attempt(&self) -> Option<Attempt> {
        match self.state {
            ApqState::Direct => Some(Attempt::Single),
            ApqState::Optimistic => Some(Attempt::Optimistic),
            ApqState::Fallback => Some(Attempt::Fallback),
            _ => None,
        }
    }

    fn apply(&mut self, event: Event) -> Option<AttemptPlan> {
        let previous = self.state;
        self.state = transition(previous, event);
        if previous == self.state {
            return None;
        }
        debug!(from = ?previous, to = ?self.state, "apq state transition");

        let plan = match self.state {
            ApqState::Direct => AttemptPlan {
                attempt: Attempt::Single,
                send_document: self.send_document,
                send_apq_extensions: self.send_apq_extensions,
            },
            ApqState::Optimistic => AttemptPlan {
                attempt: Attempt::Optimistic,
                send_document: false,
                send_apq_extensions: true,
            },
            ApqState::Fallback => AttemptPlan {
                attempt: Attempt::Fallback,
                send_document: true,
                send_apq_extensions: true,
            },
            _ => return None,
        };
        self.attempts.push(plan.attempt);
        Some(plan)
    }
}

fn classify(
    attempt: Attempt,
    result: Result<GraphqlResponse, TransportError>,
) -> (AttemptOutcome, Result<GraphqlResponse, ClientError>) {
    match result {
        Err(source) => (
            AttemptOutcome::Failure,
            Err(ClientError::Transport { attempt, source }),
        ),
        Ok(response) if response.is_persisted_query_not_supported() => (
            AttemptOutcome::Failure,
            Err(ClientError::PersistedQueriesNotSupported { attempt }),
        ),
        Ok(response) if response.is_persisted_query_not_found() => (
            AttemptOutcome::PersistedQueryNotFound,
            Err(ClientError::PersistedQueryNotFound { attempt }),
        ),
        Ok(response) if response.is_request_error() => (
            AttemptOutcome::Failure,
            Err(ClientError::Graphql {
                attempt,
                errors: response.errors,
            }),
        ),
        Ok(response) => (AttemptOutcome::Success, Ok(response)),
    }
}

/// Run one operation execution to a terminal state.
///
/// Returns the response of the last attempt, or the error that ended the
/// execution tagged with the attempt that produced it.
pub async fn negotiate<T, C>(
    transport: &T,
    composer: &C,
    operation: &dyn Operation,
    options: &ResolvedOptions,
    apq: &ApqConfig,
    cancellation: &CancellationToken,
) -> Result<GraphqlResponse, ClientError>
where
    T: HttpTransport + ?Sized,
    C: HttpRequestComposer + ?Sized,
{
    let mut negotiator = ApqNegotiator::new(options);
    let mut next = negotiator.start();

    while let Some(plan) = next {
        let attempt_options = plan.options(options, apq, operation.operation_type());
        let request = composer.compose(operation, &attempt_options)?;

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                negotiator.cancel();
                debug!(operation = operation.name(), attempt = %plan.attempt, "operation cancelled");
                return Err(ClientError::Cancelled { attempt: plan.attempt });
            }
            result = transport.execute(request) => result,
        };

        let (outcome, result) = classify(plan.attempt, result);
        if matches!(result, Err(ClientError::PersistedQueriesNotSupported { .. })) {
            warn!(operation = operation.name(), "server does not support persisted queries");
        }
        next = negotiator.on_outcome(outcome);
        match next {
            Some(fallback) => {
                warn!(
                    operation = operation.name(),
                    attempt = %fallback.attempt,
                    "persisted query not found, resending with document"
                );
            }
            None => return result,
        }
    }

    // `start` only yields `None` from a terminal state, which a fresh negotiator never is.
    Err(ClientError::ConfigurationError(format!(
        "negotiation for '{}' ended in {:?} without sending a request",
        operation.name(),
        negotiator.state()
    )))
}
